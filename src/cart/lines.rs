//! Line Items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    growers::GrowerRef,
    products::{Product, ProductId, Unit},
};

/// A product being put into a cart or shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id
    pub product_id: ProductId,

    /// Product name at the time it was added
    pub name: String,

    /// Unit price at the time it was added
    pub unit_price: Decimal,

    /// Unit of measure
    pub unit: Unit,

    /// Grower selling the product
    pub grower: GrowerRef,
}

impl CartItem {
    /// Captures the product's current name, price and unit.
    pub fn from_product(product: &Product, grower: GrowerRef) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            unit: product.unit,
            grower,
        }
    }
}

/// A product with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product id
    pub product_id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    pub unit_price: Decimal,

    /// Unit of measure
    pub unit: Unit,

    /// Number of units, always at least one
    pub quantity: u32,

    /// Grower selling the product
    pub grower: GrowerRef,
}

impl CartLine {
    fn new(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            unit_price: item.unit_price,
            unit: item.unit,
            quantity: 1,
            grower: item.grower,
        }
    }

    /// `unit_price × quantity`
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Price and unit count of a set of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Σ unit price × quantity
    pub total_price: Decimal,

    /// Σ quantity (units, not distinct lines)
    pub item_count: u64,
}

impl CartTotals {
    /// Recomputes totals from scratch.
    pub fn of<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Self {
        lines.into_iter().fold(Self::default(), |acc, line| Self {
            total_price: acc.total_price + line.line_total(),
            item_count: acc.item_count + u64::from(line.quantity),
        })
    }
}

/// Ordered line storage shared by the cart and the shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Lines {
    lines: Vec<CartLine>,
}

impl Lines {
    pub(crate) fn as_slice(&self) -> &[CartLine] {
        &self.lines
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn first(&self) -> Option<&CartLine> {
        self.lines.first()
    }

    pub(crate) fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Bumps an existing line by one or appends a new one, returning the
    /// line's quantity afterwards.
    pub(crate) fn increment(&mut self, item: CartItem) -> u32 {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(CartLine::new(item));

        1
    }

    /// Sets the quantity exactly, removing the line when `quantity <= 0`.
    /// Returns `false` when no line holds the product.
    pub(crate) fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };

        if quantity <= 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }

        true
    }

    pub(crate) fn remove(&mut self, product_id: ProductId) -> Option<CartLine> {
        self.position(product_id).map(|index| self.lines.remove(index))
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&CartLine) -> bool) {
        self.lines.retain(keep);
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }
}
