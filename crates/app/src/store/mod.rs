//! Data store
//!
//! The backend is a hosted Postgres behind a REST gateway plus a blob store
//! for photos. Services only ever see rows as JSON values: fetch by equality
//! filters with ordering, insert, update by filter, delete by filter.

use async_trait::async_trait;
use mockall::automock;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

mod errors;
mod query;
mod supabase;

pub use errors::StoreError;
pub use query::{Direction, Query};
pub use supabase::{SupabaseConfig, SupabaseStore};

/// Tables the app reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `pestitele`
    Growers,
    /// `produkty`
    Products,
    /// `predefinovane_produkty`
    PredefinedProducts,
    /// `objednavky`
    Orders,
    /// `objednavky_polozky`
    OrderLines,
    /// `stanky`
    Stalls,
    /// `oblibeni_farmari`
    Favorites,
    /// `sms_codes`
    SmsCodes,
}

impl Table {
    /// Table name on the backend.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Growers => "pestitele",
            Self::Products => "produkty",
            Self::PredefinedProducts => "predefinovane_produkty",
            Self::Orders => "objednavky",
            Self::OrderLines => "objednavky_polozky",
            Self::Stalls => "stanky",
            Self::Favorites => "oblibeni_farmari",
            Self::SmsCodes => "sms_codes",
        }
    }
}

#[automock]
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Rows matching every filter of the query, in the requested order.
    async fn select(&self, table: Table, query: Query) -> Result<Vec<Value>, StoreError>;

    /// Inserts rows and returns them as stored.
    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<Vec<Value>, StoreError>;

    /// Patches every matching row and returns them as stored.
    async fn update(
        &self,
        table: Table,
        query: Query,
        patch: Value,
    ) -> Result<Vec<Value>, StoreError>;

    /// Deletes every matching row and returns how many were removed.
    async fn delete(&self, table: Table, query: Query) -> Result<usize, StoreError>;

    /// Uploads a blob and returns its public URL.
    async fn upload(
        &self,
        path: String,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError>;
}

/// Serialises an insert or update payload.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] if the value cannot be represented as JSON.
pub fn encode<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(value)?)
}

/// Decodes every row.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] on the first row that does not fit `T`.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

/// Decodes every row that fits `T`, skipping the rest with a warning.
pub fn decode_rows_lenient<T: DeserializeOwned>(table: Table, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| {
            serde_json::from_value(row)
                .inspect_err(|error| warn!(table = table.name(), %error, "skipping malformed row"))
                .ok()
        })
        .collect()
}

/// Decodes the first row.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when there are no rows.
pub fn decode_first<T: DeserializeOwned>(rows: Vec<Value>) -> Result<T, StoreError> {
    let row = rows.into_iter().next().ok_or(StoreError::NotFound)?;

    Ok(serde_json::from_value(row)?)
}
