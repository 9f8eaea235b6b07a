//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pestitele::{
    growers::GrowerId,
    orders::{Order, OrderId, OrderLine, OrderStatus, OrderWithLines},
};
use serde_json::json;
use tracing::info;

use crate::{
    domain::orders::errors::OrdersServiceError,
    store::{DataStore, Direction, Query, Table, decode_first, decode_rows},
};

pub struct StoreOrdersService {
    store: Arc<dyn DataStore>,
}

impl StoreOrdersService {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    async fn lines(&self, order: OrderId) -> Result<Vec<OrderLine>, OrdersServiceError> {
        let rows = self
            .store
            .select(Table::OrderLines, Query::all().eq("objednavka_id", order))
            .await?;

        Ok(decode_rows(rows)?)
    }
}

#[async_trait]
impl OrdersService for StoreOrdersService {
    async fn list_orders(&self, grower: GrowerId) -> Result<Vec<OrderWithLines>, OrdersServiceError> {
        let rows = self
            .store
            .select(
                Table::Orders,
                Query::all()
                    .eq("pestitel_id", grower)
                    .order_by("created_at", Direction::Descending),
            )
            .await?;

        let orders: Vec<Order> = decode_rows(rows)?;
        let mut found = Vec::with_capacity(orders.len());

        for order in orders {
            let lines = self.lines(order.id).await?;

            found.push(OrderWithLines { order, lines });
        }

        Ok(found)
    }

    #[tracing::instrument(skip_all, fields(grower_id = %owner, order_id = %order, status = %status))]
    async fn change_status(
        &self,
        owner: GrowerId,
        order: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let owned = Query::all().eq("id", order).eq("pestitel_id", owner);

        let current: Order = decode_first(self.store.select(Table::Orders, owned.clone()).await?)?;
        let next = current.status.transition_to(status)?;

        let rows = self
            .store
            .update(
                Table::Orders,
                owned,
                json!({ "stav": next, "updated_at": Timestamp::now() }),
            )
            .await?;

        let updated = decode_first(rows)?;

        info!(from = %current.status, "changed order status");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// The grower's orders, newest first, each with its line snapshots.
    async fn list_orders(&self, grower: GrowerId) -> Result<Vec<OrderWithLines>, OrdersServiceError>;

    /// Moves an order along its lifecycle. Only the owning grower can.
    async fn change_status(
        &self,
        owner: GrowerId,
        order: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}
