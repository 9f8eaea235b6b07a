//! Favorite growers
//!
//! Customers have no account. A random id is generated once per device and
//! persisted there; favorites hang off that pseudo-identity.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::{growers::GrowerId, ids::TypedId};

/// Favorite Id
pub type FavoriteId = TypedId<Favorite>;

/// Per-device customer pseudo-identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Generates a fresh identity.
    pub fn generate() -> Self {
        Self(format!("zakaznik-{}", uuid::Uuid::now_v7().simple()))
    }

    /// Restores a persisted identity; blank values are rejected.
    pub fn from_stored(value: &str) -> Option<Self> {
        let value = value.trim();

        (!value.is_empty()).then(|| Self(value.to_string()))
    }

    /// The identity as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// A stored favorite (`oblibeni_farmari` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Row id
    pub id: FavoriteId,

    /// Customer
    #[serde(rename = "zakaznik_id")]
    pub customer_id: CustomerId,

    /// Grower
    #[serde(rename = "pestitel_id")]
    pub grower_id: GrowerId,
}

/// Insert payload for a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFavorite {
    /// Customer
    #[serde(rename = "zakaznik_id")]
    pub customer_id: CustomerId,

    /// Grower
    #[serde(rename = "pestitel_id")]
    pub grower_id: GrowerId,
}
