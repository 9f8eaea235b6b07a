//! Stalls service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Zoned, civil::DateTime};
use mockall::automock;
use pestitele::{
    forms::StallInput,
    growers::GrowerId,
    stalls::{Stall, StallId, StallView},
};
use serde::Serialize;
use tracing::info;

use crate::{
    domain::stalls::errors::StallsServiceError,
    store::{DataStore, Direction, Query, Table, decode_first, decode_rows, encode},
};

#[derive(Debug, Serialize)]
struct NewStallRow<'a> {
    pestitel_id: GrowerId,

    #[serde(flatten)]
    input: &'a StallInput,
}

/// Local wall-clock time, used to derive `aktivni`.
pub type Clock = fn() -> DateTime;

fn local_now() -> DateTime {
    Zoned::now().datetime()
}

pub struct StoreStallsService {
    store: Arc<dyn DataStore>,
    clock: Clock,
}

impl StoreStallsService {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            clock: local_now,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    async fn views(&self, query: Query) -> Result<Vec<StallView>, StallsServiceError> {
        let stalls: Vec<Stall> = decode_rows(
            self.store
                .select(Table::Stalls, query.order_by("datum_od", Direction::Ascending))
                .await?,
        )?;
        let now = (self.clock)();

        Ok(stalls
            .into_iter()
            .map(|stall| StallView::at(stall, now))
            .collect())
    }
}

#[async_trait]
impl StallsService for StoreStallsService {
    async fn list_stalls(&self) -> Result<Vec<StallView>, StallsServiceError> {
        self.views(Query::all()).await
    }

    async fn list_grower_stalls(
        &self,
        grower: GrowerId,
    ) -> Result<Vec<StallView>, StallsServiceError> {
        self.views(Query::all().eq("pestitel_id", grower)).await
    }

    #[tracing::instrument(skip_all, fields(grower_id = %owner))]
    async fn create_stall(
        &self,
        owner: GrowerId,
        input: StallInput,
    ) -> Result<StallView, StallsServiceError> {
        let row = encode(&NewStallRow {
            pestitel_id: owner,
            input: &input,
        })?;

        let stall: Stall = decode_first(self.store.insert(Table::Stalls, vec![row]).await?)?;

        info!(stall_id = %stall.id, "created stall");

        Ok(StallView::at(stall, (self.clock)()))
    }

    #[tracing::instrument(skip_all, fields(grower_id = %owner, stall_id = %stall))]
    async fn delete_stall(&self, owner: GrowerId, stall: StallId) -> Result<(), StallsServiceError> {
        let removed = self
            .store
            .delete(
                Table::Stalls,
                Query::all().eq("id", stall).eq("pestitel_id", owner),
            )
            .await?;

        if removed == 0 {
            return Err(StallsServiceError::NotFound);
        }

        info!("deleted stall");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait StallsService: Send + Sync {
    /// Every stall, soonest first, with `aktivni` derived now.
    async fn list_stalls(&self) -> Result<Vec<StallView>, StallsServiceError>;

    /// One grower's stalls.
    async fn list_grower_stalls(&self, grower: GrowerId)
    -> Result<Vec<StallView>, StallsServiceError>;

    /// Publishes a stall from a validated form.
    async fn create_stall(
        &self,
        owner: GrowerId,
        input: StallInput,
    ) -> Result<StallView, StallsServiceError>;

    /// Removes a stall. Only the owning grower can.
    async fn delete_stall(&self, owner: GrowerId, stall: StallId) -> Result<(), StallsServiceError>;
}
