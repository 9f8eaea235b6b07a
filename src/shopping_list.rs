//! Shopping list
//!
//! A wishlist spanning many growers. It groups lines per grower so the
//! customer can call or text each grower directly; there is no checkout.

use std::fmt::Write;

use crate::{
    cart::{CartItem, CartLine, CartTotals, Lines},
    contact::{ContactAction, ContactError},
    growers::{GrowerId, GrowerRef},
    products::ProductId,
};

/// Multi-grower wishlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    lines: Lines,
}

impl ShoppingList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit, returning the line's quantity afterwards.
    pub fn add(&mut self, item: CartItem) -> u32 {
        self.lines.increment(item)
    }

    /// Sets a line's quantity exactly; zero or less removes the line.
    /// Returns `false` if the product is not on the list.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        self.lines.set_quantity(product_id, quantity)
    }

    /// Removes a line.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartLine> {
        self.lines.remove(product_id)
    }

    /// Drops every line of one grower, e.g. after the customer contacted them.
    pub fn remove_grower(&mut self, grower: GrowerId) {
        self.lines.retain(|line| line.grower.id != grower);
    }

    /// Empties the list.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// All lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.lines.as_slice()
    }

    /// Totals across every grower.
    pub fn totals(&self) -> CartTotals {
        CartTotals::of(self.lines.as_slice())
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines grouped per grower, in the order each grower first appears.
    pub fn groups(&self) -> Vec<GrowerGroup<'_>> {
        let mut groups: Vec<GrowerGroup<'_>> = Vec::new();

        for line in self.lines.as_slice() {
            match groups.iter_mut().find(|group| group.grower.id == line.grower.id) {
                Some(group) => group.lines.push(line),
                None => groups.push(GrowerGroup {
                    grower: &line.grower,
                    lines: vec![line],
                }),
            }
        }

        groups
    }
}

/// One grower's share of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowerGroup<'a> {
    /// The grower
    pub grower: &'a GrowerRef,

    /// Their lines
    pub lines: Vec<&'a CartLine>,
}

impl GrowerGroup<'_> {
    /// Totals for this grower only.
    pub fn totals(&self) -> CartTotals {
        CartTotals::of(self.lines.iter().copied())
    }

    /// Prefilled order message for the grower.
    pub fn sms_body(&self) -> String {
        let mut body = String::from("Dobrý den, rád(a) bych si objednal(a):\n");

        for line in &self.lines {
            _ = writeln!(body, "- {}: {} {}", line.name, line.quantity, line.unit);
        }

        _ = write!(body, "Celkem: {} Kč", self.totals().total_price);

        body
    }

    /// Call and SMS intents for the grower.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingPhone`] if the grower has no phone.
    pub fn contact_actions(&self) -> Result<[ContactAction; 2], ContactError> {
        let phone = self.grower.phone.as_deref().unwrap_or_default();

        Ok([
            ContactAction::call(phone)?,
            ContactAction::sms(phone, &self.sms_body())?,
        ])
    }
}
