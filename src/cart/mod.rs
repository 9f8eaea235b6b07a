//! Cart
//!
//! The checkout-bound basket. Every line in a cart belongs to the same grower;
//! adding a product from another grower yields a [`GrowerConflict`] which the
//! caller either resolves (replacing the cart) or drops (keeping it).

use thiserror::Error;

use crate::{
    growers::{GrowerId, GrowerRef},
    products::ProductId,
};

mod lines;

pub(crate) use lines::Lines;
pub use lines::{CartItem, CartLine, CartTotals};

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The item belongs to a different grower than the cart.
    #[error("cart holds products from {}, cannot add from {}", .0.current().name, .0.pending().grower.name)]
    GrowerConflict(Box<GrowerConflict>),

    /// No line holds the product.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// An add that would mix two growers in one cart.
///
/// Dropping the value cancels the add and leaves the cart unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowerConflict {
    current: GrowerRef,
    pending: CartItem,
}

impl GrowerConflict {
    /// The grower whose products are in the cart now.
    pub fn current(&self) -> &GrowerRef {
        &self.current
    }

    /// The item the customer tried to add.
    pub fn pending(&self) -> &CartItem {
        &self.pending
    }
}

/// Which grower, if any, the cart is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    /// No lines
    Empty,

    /// Lines from exactly one grower
    SingleGrower(GrowerId),
}

/// Single-grower cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Lines,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of the item.
    ///
    /// Returns the line's quantity after the add.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::GrowerConflict`] without touching the cart when
    /// the item's grower differs from the cart's grower.
    pub fn add(&mut self, item: CartItem) -> Result<u32, CartError> {
        if let Some(current) = self.grower()
            && current.id != item.grower.id
        {
            return Err(CartError::GrowerConflict(Box::new(GrowerConflict {
                current: current.clone(),
                pending: item,
            })));
        }

        Ok(self.lines.increment(item))
    }

    /// Confirms a conflicting add: empties the cart and adds the pending item.
    ///
    /// Returns the grower that was replaced so the caller can remember them
    /// as a favorite.
    pub fn resolve_conflict(&mut self, conflict: GrowerConflict) -> GrowerRef {
        let GrowerConflict { current, pending } = conflict;

        self.lines.clear();
        self.lines.increment(pending);

        current
    }

    /// Sets a line's quantity exactly; zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when no line holds the product.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        if self.lines.set_quantity(product_id, quantity) {
            Ok(())
        } else {
            Err(CartError::NotInCart(product_id))
        }
    }

    /// Removes a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when no line holds the product.
    pub fn remove(&mut self, product_id: ProductId) -> Result<CartLine, CartError> {
        self.lines
            .remove(product_id)
            .ok_or(CartError::NotInCart(product_id))
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        self.lines.as_slice()
    }

    /// Looks up the line for a product.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.get(product_id)
    }

    /// Total price and unit count.
    pub fn totals(&self) -> CartTotals {
        CartTotals::of(self.lines.as_slice())
    }

    /// The grower every line belongs to.
    pub fn grower(&self) -> Option<&GrowerRef> {
        self.lines.first().map(|line| &line.grower)
    }

    /// Current state of the single-grower invariant.
    pub fn state(&self) -> CartState {
        self.grower()
            .map_or(CartState::Empty, |grower| CartState::SingleGrower(grower.id))
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
