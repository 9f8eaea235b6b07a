//! Growers

use serde::{Deserialize, Deserializer, Serialize};

use crate::{geo::Coordinates, ids::TypedId};

/// Grower Id
pub type GrowerId = TypedId<Grower>;

/// A seller offering self-grown products (`pestitele` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grower {
    /// Grower id
    pub id: GrowerId,

    /// Display name
    #[serde(rename = "jmeno")]
    pub name: String,

    /// Home city
    #[serde(rename = "mesto", default, deserialize_with = "null_as_empty")]
    pub city: String,

    /// Free-text description
    #[serde(rename = "popis", default)]
    pub description: Option<String>,

    /// Contact phone
    #[serde(rename = "telefon", default, deserialize_with = "null_as_empty")]
    pub phone: String,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,

    /// Stored latitude, `0` or null when unknown
    #[serde(default)]
    pub gps_lat: Option<f64>,

    /// Stored longitude, `0` or null when unknown
    #[serde(default)]
    pub gps_lng: Option<f64>,
}

impl Grower {
    /// Columns of the public grower record. Reads on behalf of customers
    /// select only these, never the stored PIN hash.
    pub const COLUMNS: &'static [&'static str] = &[
        "id", "jmeno", "mesto", "popis", "telefon", "email", "gps_lat", "gps_lng",
    ];

    /// The grower's location, if one is actually known.
    pub fn location(&self) -> Option<Coordinates> {
        Coordinates::known(self.gps_lat, self.gps_lng)
    }

    /// A by-value reference suitable for cart lines.
    pub fn to_ref(&self) -> GrowerRef {
        GrowerRef {
            id: self.id,
            name: self.name.clone(),
            phone: Some(self.phone.clone()).filter(|phone| !phone.is_empty()),
            city: Some(self.city.clone()).filter(|city| !city.is_empty()),
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Grower details carried on cart and shopping-list lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowerRef {
    /// Grower id
    pub id: GrowerId,

    /// Display name
    pub name: String,

    /// Contact phone
    pub phone: Option<String>,

    /// Home city
    pub city: Option<String>,
}
