//! Checkout service.
//!
//! Turns the cart into an order: the order row, one line per cart line and a
//! favorite for the grower. The cart is cleared only once all three writes
//! succeeded; any failure leaves it as it was so the customer can retry.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use mockall::automock;
use pestitele::{
    cart::{Cart, GrowerConflict},
    favorites::CustomerId,
    forms::CheckoutDraft,
    growers::GrowerRef,
    orders::{Order, OrderSnapshot},
};
use tracing::{info, warn};

use crate::{
    domain::{checkout::errors::CheckoutError, favorites::FavoritesService},
    store::{DataStore, Table, decode_first, encode},
};

/// Held while a submission is outstanding.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct StoreCheckoutService {
    store: Arc<dyn DataStore>,
    favorites: Arc<dyn FavoritesService>,
    in_flight: AtomicBool,
}

impl StoreCheckoutService {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, favorites: Arc<dyn FavoritesService>) -> Self {
        Self {
            store,
            favorites,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a submission is outstanding; the submit control is disabled meanwhile.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

#[async_trait]
impl CheckoutService for StoreCheckoutService {
    #[tracing::instrument(skip_all)]
    async fn submit_order(
        &self,
        cart: &mut Cart,
        draft: CheckoutDraft,
    ) -> Result<Order, CheckoutError> {
        let details = draft.validate().map_err(CheckoutError::Invalid)?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let _guard = InFlight::acquire(&self.in_flight).ok_or(CheckoutError::AlreadySubmitting)?;

        let snapshot = OrderSnapshot::capture(cart, &details)?;

        let order: Order = decode_first(
            self.store
                .insert(Table::Orders, vec![encode(&snapshot.order)?])
                .await?,
        )?;

        let lines = snapshot
            .lines
            .iter()
            .map(encode)
            .collect::<Result<Vec<_>, _>>()?;

        self.store.insert(Table::OrderLines, lines).await?;

        if let Some(customer) = CustomerId::from_stored(&details.phone) {
            self.favorites
                .add_favorite(customer, order.grower_id)
                .await?;
        }

        cart.clear();

        info!(
            order_id = %order.id,
            grower_id = %order.grower_id,
            total = %order.total_price,
            lines = snapshot.lines.len(),
            "submitted order"
        );

        Ok(order)
    }

    #[tracing::instrument(skip_all, fields(customer_id = %customer))]
    async fn switch_grower(
        &self,
        cart: &mut Cart,
        conflict: GrowerConflict,
        customer: CustomerId,
    ) -> GrowerRef {
        let previous = conflict.current().id;

        if let Err(error) = self.favorites.add_favorite(customer, previous).await {
            warn!(%error, grower_id = %previous, "failed to favorite replaced grower");
        }

        let replaced = cart.resolve_conflict(conflict);

        info!(from = %replaced.id, "switched cart grower");

        replaced
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Validates the form and submits the cart as an order.
    async fn submit_order(
        &self,
        cart: &mut Cart,
        draft: CheckoutDraft,
    ) -> Result<Order, CheckoutError>;

    /// Confirms a grower switch: remembers the replaced grower as a favorite,
    /// then replaces the cart contents with the pending item.
    async fn switch_grower(
        &self,
        cart: &mut Cart,
        conflict: GrowerConflict,
        customer: CustomerId,
    ) -> GrowerRef;
}
