//! Favorites service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use pestitele::{
    favorites::{CustomerId, Favorite, NewFavorite},
    growers::{Grower, GrowerId},
};
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::{
    domain::favorites::errors::FavoritesServiceError,
    store::{DataStore, Query, StoreError, Table, decode_rows, encode},
};

pub struct StoreFavoritesService {
    store: Arc<dyn DataStore>,
}

impl StoreFavoritesService {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    fn query(customer: &CustomerId) -> Query {
        Query::all().eq("zakaznik_id", customer)
    }

    async fn favorites(&self, customer: &CustomerId) -> Result<Vec<Favorite>, StoreError> {
        decode_rows(self.store.select(Table::Favorites, Self::query(customer)).await?)
    }
}

#[async_trait]
impl FavoritesService for StoreFavoritesService {
    #[tracing::instrument(skip_all, fields(customer_id = %customer, grower_id = %grower))]
    async fn add_favorite(
        &self,
        customer: CustomerId,
        grower: GrowerId,
    ) -> Result<(), FavoritesServiceError> {
        let row = encode(&NewFavorite {
            customer_id: customer,
            grower_id: grower,
        })?;

        match self.store.insert(Table::Favorites, vec![row]).await {
            Ok(_) => {
                info!("added favorite");
                Ok(())
            }
            Err(StoreError::UniqueViolation) => {
                debug!("favorite already present");
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    #[tracing::instrument(skip_all, fields(customer_id = %customer, grower_id = %grower))]
    async fn remove_favorite(
        &self,
        customer: CustomerId,
        grower: GrowerId,
    ) -> Result<(), FavoritesServiceError> {
        let removed = self
            .store
            .delete(
                Table::Favorites,
                Self::query(&customer).eq("pestitel_id", grower),
            )
            .await?;

        if removed == 0 {
            return Err(FavoritesServiceError::NotFound);
        }

        info!("removed favorite");

        Ok(())
    }

    async fn list_favorites(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<Grower>, FavoritesServiceError> {
        let favorites: FxHashSet<GrowerId> = self
            .favorites(&customer)
            .await?
            .into_iter()
            .map(|favorite| favorite.grower_id)
            .collect();

        if favorites.is_empty() {
            return Ok(Vec::new());
        }

        let growers: Vec<Grower> =
            decode_rows(
                self.store
                    .select(Table::Growers, Query::all().columns(Grower::COLUMNS))
                    .await?,
            )?;

        Ok(growers
            .into_iter()
            .filter(|grower| favorites.contains(&grower.id))
            .collect())
    }

    async fn count_favorites(&self, customer: CustomerId) -> Result<usize, FavoritesServiceError> {
        Ok(self.favorites(&customer).await?.len())
    }

    async fn is_favorite(
        &self,
        customer: CustomerId,
        grower: GrowerId,
    ) -> Result<bool, FavoritesServiceError> {
        let rows = self
            .store
            .select(
                Table::Favorites,
                Self::query(&customer).eq("pestitel_id", grower).limit(1),
            )
            .await?;

        Ok(!rows.is_empty())
    }
}

#[automock]
#[async_trait]
pub trait FavoritesService: Send + Sync {
    /// Marks a grower as favorite. Adding an existing favorite succeeds.
    async fn add_favorite(
        &self,
        customer: CustomerId,
        grower: GrowerId,
    ) -> Result<(), FavoritesServiceError>;

    /// Removes a favorite.
    async fn remove_favorite(
        &self,
        customer: CustomerId,
        grower: GrowerId,
    ) -> Result<(), FavoritesServiceError>;

    /// The customer's favorite growers.
    async fn list_favorites(&self, customer: CustomerId)
    -> Result<Vec<Grower>, FavoritesServiceError>;

    /// How many favorites the customer has.
    async fn count_favorites(&self, customer: CustomerId) -> Result<usize, FavoritesServiceError>;

    /// Whether one grower is a favorite.
    async fn is_favorite(
        &self,
        customer: CustomerId,
        grower: GrowerId,
    ) -> Result<bool, FavoritesServiceError>;
}
