//! App Context

use std::sync::Arc;

use tracing::info;

use crate::{
    config::AppConfig,
    device::{FileKeyValueStore, FixedLocation, KeyValueStore, Launcher, LocationProvider, LoggingLauncher},
    domain::{
        auth::{AuthService, StoreAuthService},
        checkout::{CheckoutService, StoreCheckoutService},
        contact::{ContactService, LauncherContactService},
        discovery::{DiscoveryService, StoreDiscoveryService},
        favorites::{FavoritesService, StoreFavoritesService},
        orders::{OrdersService, StoreOrdersService},
        products::{ProductsService, StoreProductsService},
        stalls::{StallsService, StoreStallsService},
    },
    session::SessionStore,
    store::{DataStore, SupabaseStore},
};

#[derive(Clone)]
pub struct AppContext {
    pub session: SessionStore,
    pub auth: Arc<dyn AuthService>,
    pub discovery: Arc<dyn DiscoveryService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub contact: Arc<dyn ContactService>,
    pub favorites: Arc<dyn FavoritesService>,
    pub products: Arc<dyn ProductsService>,
    pub orders: Arc<dyn OrdersService>,
    pub stalls: Arc<dyn StallsService>,
}

impl AppContext {
    /// Wires every service onto one backend and one device.
    #[must_use]
    pub fn new(
        store: Arc<dyn DataStore>,
        location: Arc<dyn LocationProvider>,
        storage: Arc<dyn KeyValueStore>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        let session = SessionStore::new(storage);
        let favorites: Arc<dyn FavoritesService> = Arc::new(StoreFavoritesService::new(store.clone()));

        Self {
            auth: Arc::new(StoreAuthService::new(store.clone(), session.clone())),
            discovery: Arc::new(StoreDiscoveryService::new(store.clone(), location)),
            checkout: Arc::new(StoreCheckoutService::new(store.clone(), favorites.clone())),
            contact: Arc::new(LauncherContactService::new(launcher)),
            products: Arc::new(StoreProductsService::new(store.clone())),
            orders: Arc::new(StoreOrdersService::new(store.clone())),
            stalls: Arc::new(StoreStallsService::new(store)),
            favorites,
            session,
        }
    }

    /// Build application context from configuration, for headless runs
    /// without GPS or OS launchers.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        info!(
            backend = %config.backend.supabase_url,
            storage = %config.device.storage_path.display(),
            "building app context"
        );

        Self::new(
            Arc::new(SupabaseStore::new(config.backend.supabase())),
            Arc::new(FixedLocation::default()),
            Arc::new(FileKeyValueStore::new(&config.device.storage_path)),
            Arc::new(LoggingLauncher),
        )
    }
}
