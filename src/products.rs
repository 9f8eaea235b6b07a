//! Products

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{growers::GrowerId, ids::TypedId};

/// Product Id
pub type ProductId = TypedId<Product>;

/// Predefined Product Id
pub type PredefinedProductId = TypedId<PredefinedProduct>;

/// Unknown unit or category text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductParseError {
    /// Not one of the supported units.
    #[error("unknown unit: {0}")]
    Unit(String),

    /// Not one of the supported categories.
    #[error("unknown category: {0}")]
    Category(String),
}

/// Unit of measure a product is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Kilogram
    #[serde(rename = "kg")]
    Kilogram,

    /// Piece
    #[serde(rename = "ks")]
    Piece,

    /// Litre
    #[serde(rename = "l")]
    Litre,

    /// Package
    #[serde(rename = "balení")]
    Package,
}

impl Unit {
    /// All units in display order.
    pub const ALL: [Self; 4] = [Self::Kilogram, Self::Piece, Self::Litre, Self::Package];

    /// Store representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kilogram => "kg",
            Self::Piece => "ks",
            Self::Litre => "l",
            Self::Package => "balení",
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ProductParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str() == value.trim())
            .ok_or_else(|| ProductParseError::Unit(value.to_string()))
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Vegetables
    #[serde(rename = "Zelenina")]
    Vegetables,

    /// Fruit
    #[serde(rename = "Ovoce")]
    Fruit,

    /// Eggs
    #[serde(rename = "Vejce")]
    Eggs,

    /// Dairy
    #[serde(rename = "Mléčné výrobky")]
    Dairy,

    /// Honey
    #[serde(rename = "Med")]
    Honey,

    /// Anything else
    #[serde(rename = "Ostatní")]
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 6] = [
        Self::Vegetables,
        Self::Fruit,
        Self::Eggs,
        Self::Dairy,
        Self::Honey,
        Self::Other,
    ];

    /// Store representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vegetables => "Zelenina",
            Self::Fruit => "Ovoce",
            Self::Eggs => "Vejce",
            Self::Dairy => "Mléčné výrobky",
            Self::Honey => "Med",
            Self::Other => "Ostatní",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ProductParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value.trim())
            .ok_or_else(|| ProductParseError::Category(value.to_string()))
    }
}

/// A product listed by a grower (`produkty` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Owning grower
    #[serde(rename = "pestitel_id")]
    pub grower_id: GrowerId,

    /// Product name
    #[serde(rename = "nazev")]
    pub name: String,

    /// Optional description
    #[serde(rename = "popis", default)]
    pub description: Option<String>,

    /// Unit price
    #[serde(rename = "cena")]
    pub price: Decimal,

    /// Unit of measure
    #[serde(rename = "jednotka")]
    pub unit: Unit,

    /// Currently on offer
    #[serde(rename = "dostupnost", default)]
    pub available: bool,

    /// Public photo URL
    #[serde(rename = "foto", default)]
    pub photo: Option<String>,

    /// Category
    #[serde(rename = "kategorie")]
    pub category: Category,
}

/// Catalog template offered while creating a product
/// (`predefinovane_produkty` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredefinedProduct {
    /// Template id
    pub id: PredefinedProductId,

    /// Standardised product name
    #[serde(rename = "nazev")]
    pub name: String,

    /// Emoji shown next to the name
    #[serde(default)]
    pub emoji: String,

    /// Category
    #[serde(rename = "kategorie")]
    pub category: Category,
}

impl PredefinedProduct {
    /// Name prefixed by the emoji, as listed in pickers.
    pub fn label(&self) -> String {
        if self.emoji.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.emoji, self.name)
        }
    }
}
