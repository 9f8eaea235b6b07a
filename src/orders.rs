//! Orders
//!
//! An order is a snapshot of a submitted cart. Line items copy the product
//! name, price, quantity and unit by value so later product edits never change
//! historical orders.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::Cart,
    forms::CheckoutDetails,
    growers::GrowerId,
    ids::TypedId,
    products::{ProductId, Unit},
};

/// Order Id
pub type OrderId = TypedId<Order>;

/// Order Line Id
pub type OrderLineId = TypedId<OrderLine>;

/// Errors building or changing orders.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Not one of the four statuses.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// The status cannot change in this direction.
    #[error("cannot change order status from {from} to {to}")]
    IllegalTransition {
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },
}

/// Order lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted, not yet seen by the grower
    #[default]
    Nova,

    /// Being prepared
    Zpracovana,

    /// Handed over
    Dokoncena,

    /// Cancelled
    Zrusena,
}

impl OrderStatus {
    /// Store representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nova => "nova",
            Self::Zpracovana => "zpracovana",
            Self::Dokoncena => "dokoncena",
            Self::Zrusena => "zrusena",
        }
    }

    /// Completed and cancelled orders are final.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Dokoncena | Self::Zrusena)
    }

    /// Checks a status change requested by the grower.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::IllegalTransition`] when leaving a final status,
    /// going back to `nova`, or "changing" to the same status.
    pub fn transition_to(self, to: Self) -> Result<Self, OrderError> {
        let allowed = match self {
            Self::Nova => matches!(to, Self::Zpracovana | Self::Dokoncena | Self::Zrusena),
            Self::Zpracovana => matches!(to, Self::Dokoncena | Self::Zrusena),
            Self::Dokoncena | Self::Zrusena => false,
        };

        if allowed {
            Ok(to)
        } else {
            Err(OrderError::IllegalTransition { from: self, to })
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "nova" => Ok(Self::Nova),
            "zpracovana" => Ok(Self::Zpracovana),
            "dokoncena" => Ok(Self::Dokoncena),
            "zrusena" => Ok(Self::Zrusena),
            other => Err(OrderError::UnknownStatus(other.to_string())),
        }
    }
}

/// A stored order (`objednavky` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order id
    pub id: OrderId,

    /// Grower the order was placed with
    #[serde(rename = "pestitel_id")]
    pub grower_id: GrowerId,

    /// Customer name
    #[serde(rename = "zakaznik_jmeno")]
    pub customer_name: String,

    /// Customer phone
    #[serde(rename = "zakaznik_telefon")]
    pub customer_phone: String,

    /// Free-text note
    #[serde(rename = "poznamka", default)]
    pub note: Option<String>,

    /// Total price at submission
    #[serde(rename = "celkova_cena")]
    pub total_price: Decimal,

    /// Lifecycle status
    #[serde(rename = "stav")]
    pub status: OrderStatus,

    /// Creation time
    pub created_at: Timestamp,

    /// Last change
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// A stored order line (`objednavky_polozky` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Line id
    pub id: OrderLineId,

    /// Parent order
    #[serde(rename = "objednavka_id")]
    pub order_id: OrderId,

    /// Product at submission time; the product may since have been deleted
    #[serde(rename = "produkt_id", default)]
    pub product_id: Option<ProductId>,

    /// Product name at submission time
    #[serde(rename = "nazev_produktu")]
    pub product_name: String,

    /// Unit price at submission time
    #[serde(rename = "cena")]
    pub unit_price: Decimal,

    /// Quantity
    #[serde(rename = "mnozstvi")]
    pub quantity: u32,

    /// Unit of measure
    #[serde(rename = "jednotka")]
    pub unit: Unit,
}

/// Insert payload for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    /// Client-generated id so lines can reference it
    pub id: OrderId,

    /// Grower
    #[serde(rename = "pestitel_id")]
    pub grower_id: GrowerId,

    /// Customer name
    #[serde(rename = "zakaznik_jmeno")]
    pub customer_name: String,

    /// Customer phone
    #[serde(rename = "zakaznik_telefon")]
    pub customer_phone: String,

    /// Note
    #[serde(rename = "poznamka")]
    pub note: Option<String>,

    /// Total price
    #[serde(rename = "celkova_cena")]
    pub total_price: Decimal,

    /// Always `nova` on submission
    #[serde(rename = "stav")]
    pub status: OrderStatus,
}

/// Insert payload for one order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderLine {
    /// Parent order
    #[serde(rename = "objednavka_id")]
    pub order_id: OrderId,

    /// Product
    #[serde(rename = "produkt_id")]
    pub product_id: ProductId,

    /// Product name
    #[serde(rename = "nazev_produktu")]
    pub product_name: String,

    /// Unit price
    #[serde(rename = "cena")]
    pub unit_price: Decimal,

    /// Quantity
    #[serde(rename = "mnozstvi")]
    pub quantity: u32,

    /// Unit
    #[serde(rename = "jednotka")]
    pub unit: Unit,
}

/// Everything written to the store for one checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshot {
    /// The order row
    pub order: NewOrder,

    /// One row per cart line
    pub lines: Vec<NewOrderLine>,
}

impl OrderSnapshot {
    /// Copies the cart into insert payloads.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] when there is nothing to order.
    pub fn capture(cart: &Cart, customer: &CheckoutDetails) -> Result<Self, OrderError> {
        let grower = cart.grower().ok_or(OrderError::EmptyCart)?;
        let id = OrderId::new();

        let lines = cart
            .lines()
            .iter()
            .map(|line| NewOrderLine {
                order_id: id,
                product_id: line.product_id,
                product_name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                unit: line.unit,
            })
            .collect();

        Ok(Self {
            order: NewOrder {
                id,
                grower_id: grower.id,
                customer_name: customer.name.clone(),
                customer_phone: customer.phone.clone(),
                note: customer.note.clone(),
                total_price: cart.totals().total_price,
                status: OrderStatus::Nova,
            },
            lines,
        })
    }
}

/// A stored order with its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWithLines {
    /// The order
    pub order: Order,

    /// Its lines
    pub lines: Vec<OrderLine>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{cart::CartItem, growers::GrowerRef};

    use super::*;

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            name: "Karel".to_string(),
            phone: "777123456".to_string(),
            note: Some("Vyzvednu v sobotu".to_string()),
        }
    }

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("zpracovana".parse(), Ok(OrderStatus::Zpracovana));
        assert_eq!(
            "odeslana".parse::<OrderStatus>(),
            Err(OrderError::UnknownStatus("odeslana".to_string()))
        );
    }

    #[test]
    fn status_serializes_lowercase() -> TestResult {
        assert_eq!(serde_json::to_string(&OrderStatus::Dokoncena)?, "\"dokoncena\"");

        Ok(())
    }

    #[test]
    fn final_statuses_cannot_change() {
        assert!(OrderStatus::Nova.transition_to(OrderStatus::Zpracovana).is_ok());
        assert!(OrderStatus::Zpracovana.transition_to(OrderStatus::Zrusena).is_ok());
        assert_eq!(
            OrderStatus::Zrusena.transition_to(OrderStatus::Nova),
            Err(OrderError::IllegalTransition {
                from: OrderStatus::Zrusena,
                to: OrderStatus::Nova,
            })
        );
        assert!(OrderStatus::Dokoncena.transition_to(OrderStatus::Zrusena).is_err());
        assert!(OrderStatus::Zpracovana.transition_to(OrderStatus::Nova).is_err());
    }

    #[test]
    fn empty_cart_cannot_be_captured() {
        assert_eq!(
            OrderSnapshot::capture(&Cart::new(), &details()),
            Err(OrderError::EmptyCart)
        );
    }

    #[test]
    fn snapshot_copies_lines_by_value() -> TestResult {
        let grower = GrowerRef {
            id: GrowerId::new(),
            name: "A".to_string(),
            phone: None,
            city: None,
        };
        let mut item = CartItem {
            product_id: ProductId::new(),
            name: "Rajčata".to_string(),
            unit_price: Decimal::from(30),
            unit: Unit::Kilogram,
            grower: grower.clone(),
        };
        let mut cart = Cart::new();
        cart.add(item.clone())?;
        cart.add(item.clone())?;

        let snapshot = OrderSnapshot::capture(&cart, &details())?;

        item.unit_price = Decimal::from(45);
        cart.clear();

        assert_eq!(snapshot.order.grower_id, grower.id);
        assert_eq!(snapshot.order.total_price, Decimal::from(60));
        assert_eq!(snapshot.order.status, OrderStatus::Nova);
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].unit_price, Decimal::from(30));
        assert_eq!(snapshot.lines[0].quantity, 2);
        assert_eq!(snapshot.lines[0].order_id, snapshot.order.id);

        Ok(())
    }
}
