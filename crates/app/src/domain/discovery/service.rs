//! Discovery service.
//!
//! Loads growers, their products and the catalog, then runs the pure filter.
//! Nothing here fails: a denied location means no distances, a failed load
//! means fewer (or no) growers.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use pestitele::{
    discovery::{DiscoveredGrower, DiscoveryFilter, discover, join_products_to_growers},
    geo::Coordinates,
    growers::Grower,
    products::{PredefinedProduct, Product},
};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::{
    device::{LocationError, LocationProvider},
    store::{DataStore, Direction, Query, StoreError, Table, decode_rows_lenient},
};

pub struct StoreDiscoveryService {
    store: Arc<dyn DataStore>,
    location: Arc<dyn LocationProvider>,
    user_location: OnceCell<Option<Coordinates>>,
}

impl StoreDiscoveryService {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, location: Arc<dyn LocationProvider>) -> Self {
        Self {
            store,
            location,
            user_location: OnceCell::new(),
        }
    }

    async fn load<T: serde::de::DeserializeOwned>(
        &self,
        table: Table,
        query: Query,
    ) -> Result<Vec<T>, StoreError> {
        Ok(decode_rows_lenient(table, self.store.select(table, query).await?))
    }

    async fn growers(&self) -> Vec<Grower> {
        self.load(
            Table::Growers,
            Query::all()
                .columns(Grower::COLUMNS)
                .order_by("jmeno", Direction::Ascending),
        )
            .await
            .unwrap_or_else(|error| {
                warn!(%error, "failed to load growers");
                Vec::new()
            })
    }

    async fn products(&self) -> Vec<Product> {
        self.load(Table::Products, Query::all().eq("dostupnost", true))
            .await
            .unwrap_or_else(|error| {
                warn!(%error, "failed to load products");
                Vec::new()
            })
    }
}

#[async_trait]
impl DiscoveryService for StoreDiscoveryService {
    async fn user_location(&self) -> Option<Coordinates> {
        *self
            .user_location
            .get_or_init(|| async {
                match self.location.current_location().await {
                    Ok(at) => Some(at),
                    Err(LocationError::PermissionDenied) => {
                        warn!("location permission denied, distances disabled");
                        None
                    }
                    Err(error) => {
                        warn!(%error, "location lookup failed, distances disabled");
                        None
                    }
                }
            })
            .await
    }

    async fn catalog(&self) -> Vec<PredefinedProduct> {
        self.load(
            Table::PredefinedProducts,
            Query::all().order_by("nazev", Direction::Ascending),
        )
        .await
        .unwrap_or_else(|error| {
            warn!(%error, "failed to load product catalog");
            Vec::new()
        })
    }

    #[tracing::instrument(skip_all, fields(query = %filter.query, max_distance = ?filter.max_distance))]
    async fn search(&self, filter: DiscoveryFilter) -> Vec<DiscoveredGrower> {
        let growers = self.growers().await;

        if growers.is_empty() {
            return Vec::new();
        }

        let products = self.products().await;
        let catalog = if filter.selected_categories.is_empty() {
            Vec::new()
        } else {
            self.catalog().await
        };
        let user_location = self.user_location().await;

        let found = discover(
            join_products_to_growers(growers, &products),
            user_location,
            &filter,
            &catalog,
        );

        debug!(found = found.len(), "search finished");

        found
    }
}

#[automock]
#[async_trait]
pub trait DiscoveryService: Send + Sync {
    /// The customer's position, looked up once per service.
    async fn user_location(&self) -> Option<Coordinates>;

    /// Predefined products offered as category checkboxes.
    async fn catalog(&self) -> Vec<PredefinedProduct>;

    /// Growers matching the filter, nearest first.
    async fn search(&self, filter: DiscoveryFilter) -> Vec<DiscoveredGrower>;
}

#[cfg(test)]
mod tests {
    use pestitele::{discovery::DistanceLimit, growers::GrowerId, products::ProductId};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::{device::MockLocationProvider, store::MockDataStore};

    use super::*;

    fn grower(id: GrowerId, name: &str, at: Option<(f64, f64)>) -> Value {
        json!({
            "id": id.to_string(),
            "jmeno": name,
            "mesto": "Praha",
            "gps_lat": at.map(|(lat, _)| lat),
            "gps_lng": at.map(|(_, lng)| lng),
        })
    }

    fn product(grower: GrowerId, name: &str) -> Value {
        json!({
            "id": ProductId::new().to_string(),
            "pestitel_id": grower.to_string(),
            "nazev": name,
            "cena": "30",
            "jednotka": "kg",
            "dostupnost": true,
            "kategorie": "Zelenina",
        })
    }

    fn store_with_growers() -> MockDataStore {
        let a = GrowerId::new();
        let b = GrowerId::new();
        let mut store = MockDataStore::new();

        store
            .expect_select()
            .withf(|table, _| *table == Table::Growers)
            .returning(move |_, _| {
                Ok(vec![
                    grower(b, "B", None),
                    grower(a, "A", Some((50.08, 14.44))),
                ])
            });
        store
            .expect_select()
            .withf(|table, _| *table == Table::Products)
            .returning(move |_, _| Ok(vec![product(a, "Rajčata"), product(b, "Mrkev")]));

        store
    }

    #[tokio::test]
    async fn searches_with_distance() -> TestResult {
        let mut location = MockLocationProvider::new();
        location
            .expect_current_location()
            .once()
            .returning(|| Ok(Coordinates::new(50.09, 14.45)));

        let service = StoreDiscoveryService::new(Arc::new(store_with_growers()), Arc::new(location));

        let found = service
            .search(
                DiscoveryFilter::new()
                    .with_query("rajč")
                    .with_max_distance(DistanceLimit::Km10),
            )
            .await;

        assert_eq!(found.len(), 1);
        assert!(found.first().and_then(|found| found.distance_km).is_some());

        // Location is asked for only once.
        service.search(DiscoveryFilter::new()).await;

        Ok(())
    }

    #[tokio::test]
    async fn denied_location_still_lists_everyone() {
        let mut location = MockLocationProvider::new();
        location
            .expect_current_location()
            .returning(|| Err(LocationError::PermissionDenied));

        let service = StoreDiscoveryService::new(Arc::new(store_with_growers()), Arc::new(location));

        let found = service.search(DiscoveryFilter::new()).await;

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|found| found.distance_km.is_none()));
    }

    #[tokio::test]
    async fn failed_grower_load_is_an_empty_result() {
        let mut store = MockDataStore::new();
        store
            .expect_select()
            .returning(|_, _| Err(StoreError::UnexpectedResponse("offline".to_string())));
        let mut location = MockLocationProvider::new();
        location.expect_current_location().never();

        let service = StoreDiscoveryService::new(Arc::new(store), Arc::new(location));

        assert!(service.search(DiscoveryFilter::new()).await.is_empty());
    }

    #[tokio::test]
    async fn failed_product_load_keeps_growers() {
        let mut store = MockDataStore::new();
        store
            .expect_select()
            .withf(|table, _| *table == Table::Growers)
            .returning(|_, _| Ok(vec![grower(GrowerId::new(), "A", None)]));
        store
            .expect_select()
            .withf(|table, _| *table == Table::Products)
            .returning(|_, _| Err(StoreError::UnexpectedResponse("offline".to_string())));
        let mut location = MockLocationProvider::new();
        location
            .expect_current_location()
            .returning(|| Err(LocationError::Unavailable("no fix".to_string())));

        let service = StoreDiscoveryService::new(Arc::new(store), Arc::new(location));

        let found = service.search(DiscoveryFilter::new()).await;

        assert_eq!(found.len(), 1);
        assert!(found.iter().all(|found| found.grower.product_names.is_empty()));
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped_not_fatal() {
        let a = GrowerId::new();
        let b = GrowerId::new();
        let mut store = MockDataStore::new();
        store
            .expect_select()
            .withf(|table, query| *table == Table::Growers && query.select_list() != "*")
            .returning(move |_, _| {
                let mut without_city = grower(b, "B", None);
                without_city["mesto"] = Value::Null;
                without_city["telefon"] = Value::Null;

                Ok(vec![
                    grower(a, "A", None),
                    without_city,
                    json!({ "id": "not-a-uuid", "jmeno": "C" }),
                ])
            });
        store
            .expect_select()
            .withf(|table, _| *table == Table::Products)
            .returning(move |_, _| {
                let mut odd = product(b, "Mrkev");
                odd["kategorie"] = json!("Houby");

                Ok(vec![product(a, "Rajčata"), odd, product(b, "Med")])
            });
        let mut location = MockLocationProvider::new();
        location
            .expect_current_location()
            .returning(|| Err(LocationError::PermissionDenied));

        let service = StoreDiscoveryService::new(Arc::new(store), Arc::new(location));

        let found = service.search(DiscoveryFilter::new()).await;
        let names = |id: GrowerId| {
            found
                .iter()
                .find(|found| found.grower.grower.id == id)
                .map(|found| found.grower.product_names.to_vec())
        };

        assert_eq!(found.len(), 2);
        assert_eq!(names(a), Some(vec!["Rajčata".to_string()]));
        assert_eq!(names(b), Some(vec!["Med".to_string()]));
    }
}
