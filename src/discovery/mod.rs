//! Grower discovery
//!
//! Turns the raw grower list plus the customer's search state into the ranked
//! list shown on the map screen. Everything here is pure; loading the inputs
//! from the store and the device is the app crate's job.

use std::cmp::Ordering;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    geo::Coordinates,
    growers::{Grower, GrowerId},
    products::{PredefinedProduct, PredefinedProductId, Product},
};

mod predicates;

use predicates::{matches_categories, matches_distance, matches_query};

/// A grower annotated with the names of the products they currently offer.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedGrower {
    /// The grower row
    pub grower: Grower,

    /// Names of available products, in store order
    pub product_names: SmallVec<[String; 4]>,
}

/// Groups available product names by grower id and attaches them to the
/// growers, keeping the grower order.
pub fn join_products_to_growers(
    growers: impl IntoIterator<Item = Grower>,
    products: &[Product],
) -> Vec<EnrichedGrower> {
    let mut by_grower: FxHashMap<GrowerId, SmallVec<[String; 4]>> = FxHashMap::default();

    for product in products.iter().filter(|product| product.available) {
        by_grower
            .entry(product.grower_id)
            .or_default()
            .push(product.name.clone());
    }

    growers
        .into_iter()
        .map(|grower| EnrichedGrower {
            product_names: by_grower.remove(&grower.id).unwrap_or_default(),
            grower,
        })
        .collect()
}

/// Maximum distance a customer can pick on the map screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceLimit {
    /// Within 5 km
    Km5,

    /// Within 10 km
    Km10,

    /// Within 20 km
    Km20,

    /// Within 30 km
    Km30,

    /// No constraint
    #[default]
    Unlimited,
}

impl DistanceLimit {
    /// All choices in the order they are offered.
    pub const ALL: [Self; 5] = [Self::Km5, Self::Km10, Self::Km20, Self::Km30, Self::Unlimited];

    /// The bound in kilometres, `None` when unlimited.
    pub const fn km(self) -> Option<f64> {
        match self {
            Self::Km5 => Some(5.0),
            Self::Km10 => Some(10.0),
            Self::Km20 => Some(20.0),
            Self::Km30 => Some(30.0),
            Self::Unlimited => None,
        }
    }

    /// Maps a picker value back to a limit; unsupported values yield `None`.
    pub const fn from_km(km: Option<u32>) -> Option<Self> {
        match km {
            Some(5) => Some(Self::Km5),
            Some(10) => Some(Self::Km10),
            Some(20) => Some(Self::Km20),
            Some(30) => Some(Self::Km30),
            None => Some(Self::Unlimited),
            Some(_) => None,
        }
    }
}

/// Search state of the map screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryFilter {
    /// Free-text query
    pub query: String,

    /// Distance bound
    pub max_distance: DistanceLimit,

    /// Checked catalog templates
    pub selected_categories: FxHashSet<PredefinedProductId>,
}

impl DiscoveryFilter {
    /// Filter that matches every grower.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the distance bound.
    #[must_use]
    pub fn with_max_distance(mut self, limit: DistanceLimit) -> Self {
        self.max_distance = limit;
        self
    }

    /// Check a catalog template.
    #[must_use]
    pub fn with_category(mut self, template: PredefinedProductId) -> Self {
        self.selected_categories.insert(template);
        self
    }

    /// Toggle a catalog template on or off.
    pub fn toggle_category(&mut self, template: PredefinedProductId) {
        if !self.selected_categories.remove(&template) {
            self.selected_categories.insert(template);
        }
    }

    fn selected_template_names(&self, catalog: &[PredefinedProduct]) -> Option<Vec<String>> {
        if self.selected_categories.is_empty() {
            return None;
        }

        Some(
            catalog
                .iter()
                .filter(|template| self.selected_categories.contains(&template.id))
                .map(|template| template.name.trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }
}

/// A grower that passed the filter, with its distance from the customer.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredGrower {
    /// The grower and their offered product names
    pub grower: EnrichedGrower,

    /// Kilometres from the customer when both locations are known
    pub distance_km: Option<f64>,
}

/// Computes distances, applies the active predicates and ranks the result.
///
/// The sort is stable: nearer growers first, then every grower without a
/// distance in their original order.
pub fn discover(
    growers: impl IntoIterator<Item = EnrichedGrower>,
    user_location: Option<Coordinates>,
    filter: &DiscoveryFilter,
    catalog: &[PredefinedProduct],
) -> Vec<DiscoveredGrower> {
    let needle = filter.query.trim().to_lowercase();
    let templates = filter.selected_template_names(catalog);

    let mut found: Vec<DiscoveredGrower> = growers
        .into_iter()
        .map(|grower| {
            let distance_km = user_location
                .zip(grower.grower.location())
                .map(|(user, at)| user.distance_km(&at));

            DiscoveredGrower {
                grower,
                distance_km,
            }
        })
        .filter(|found| {
            matches_query(&found.grower, &needle)
                && matches_distance(found.distance_km, filter.max_distance)
                && matches_categories(&found.grower, templates.as_deref())
        })
        .collect();

    found.sort_by(|a, b| by_distance(a.distance_km, b.distance_km));

    found
}

fn by_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::products::{Category, ProductId, Unit};

    use super::*;

    fn grower(name: &str, at: Option<(f64, f64)>) -> Grower {
        Grower {
            id: GrowerId::new(),
            name: name.to_string(),
            city: "Praha".to_string(),
            description: None,
            phone: "777000111".to_string(),
            email: None,
            gps_lat: at.map(|(lat, _)| lat),
            gps_lng: at.map(|(_, lng)| lng),
        }
    }

    fn product(grower: &Grower, name: &str, available: bool) -> Product {
        Product {
            id: ProductId::new(),
            grower_id: grower.id,
            name: name.to_string(),
            description: None,
            price: Decimal::from(10),
            unit: Unit::Kilogram,
            available,
            photo: None,
            category: Category::Vegetables,
        }
    }

    fn template(name: &str) -> PredefinedProduct {
        PredefinedProduct {
            id: PredefinedProductId::new(),
            name: name.to_string(),
            emoji: String::new(),
            category: Category::Vegetables,
        }
    }

    fn names(found: &[DiscoveredGrower]) -> Vec<&str> {
        found.iter().map(|f| f.grower.grower.name.as_str()).collect()
    }

    #[test]
    fn join_keeps_grower_order_and_skips_unavailable_products() {
        let a = grower("A", None);
        let b = grower("B", None);
        let products = [
            product(&b, "Med", true),
            product(&a, "Rajčata", true),
            product(&a, "Okurky", false),
            product(&a, "Papriky", true),
        ];

        let joined = join_products_to_growers([a, b], &products);

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].grower.name, "A");
        assert_eq!(joined[0].product_names.as_slice(), ["Rajčata", "Papriky"]);
        assert_eq!(joined[1].product_names.as_slice(), ["Med"]);
    }

    #[test]
    fn join_gives_growers_without_products_an_empty_list() {
        let joined = join_products_to_growers([grower("A", None)], &[]);

        assert!(joined[0].product_names.is_empty());
    }

    #[test]
    fn default_filter_keeps_everyone() {
        let growers = join_products_to_growers([grower("A", None), grower("B", None)], &[]);

        let found = discover(growers, None, &DiscoveryFilter::new(), &[]);

        assert_eq!(names(&found), ["A", "B"]);
    }

    #[test]
    fn sorts_by_distance_and_keeps_unknown_locations_last_in_order() {
        let user = Coordinates::new(50.09, 14.45);
        let growers = join_products_to_growers(
            [
                grower("Unknown 1", None),
                grower("Far", Some((50.30, 14.80))),
                grower("Zero", Some((0.0, 0.0))),
                grower("Near", Some((50.08, 14.44))),
                grower("Unknown 2", None),
            ],
            &[],
        );

        let found = discover(growers, Some(user), &DiscoveryFilter::new(), &[]);

        assert_eq!(names(&found), ["Near", "Far", "Unknown 1", "Zero", "Unknown 2"]);
        assert_eq!(found[2].distance_km, None);
        assert_eq!(found[3].distance_km, None);
    }

    #[test]
    fn without_user_location_nobody_gets_a_distance() {
        let growers = join_products_to_growers([grower("Near", Some((50.08, 14.44)))], &[]);

        let found = discover(growers, None, &DiscoveryFilter::new(), &[]);

        assert_eq!(found[0].distance_km, None);
    }

    #[test]
    fn distance_bound_drops_far_growers() {
        let user = Coordinates::new(50.09, 14.45);
        let growers = join_products_to_growers(
            [grower("Near", Some((50.08, 14.44))), grower("Far", Some((50.30, 14.80)))],
            &[],
        );
        let filter = DiscoveryFilter::new().with_max_distance(DistanceLimit::Km10);

        let found = discover(growers, Some(user), &filter, &[]);

        assert_eq!(names(&found), ["Near"]);
    }

    #[test]
    fn category_filter_uses_template_names() {
        let a = grower("A", None);
        let b = grower("B", None);
        let products = [product(&a, "Cherry rajčata", true), product(&b, "Mrkev", true)];
        let tomatoes = template("Rajčata");
        let honey = template("Med");
        let filter = DiscoveryFilter::new().with_category(tomatoes.id);

        let found = discover(
            join_products_to_growers([a, b], &products),
            None,
            &filter,
            &[tomatoes, honey],
        );

        assert_eq!(names(&found), ["A"]);
    }

    #[test]
    fn selected_category_missing_from_catalog_matches_nobody() {
        let a = grower("A", None);
        let products = [product(&a, "Rajčata", true)];
        let filter = DiscoveryFilter::new().with_category(PredefinedProductId::new());

        let found = discover(join_products_to_growers([a], &products), None, &filter, &[]);

        assert!(found.is_empty());
    }

    #[test]
    fn toggle_category_adds_then_removes() {
        let id = PredefinedProductId::new();
        let mut filter = DiscoveryFilter::new();

        filter.toggle_category(id);
        assert!(filter.selected_categories.contains(&id));

        filter.toggle_category(id);
        assert!(filter.selected_categories.is_empty());
    }

    #[test]
    fn distance_limit_maps_picker_values() {
        assert_eq!(DistanceLimit::from_km(Some(20)), Some(DistanceLimit::Km20));
        assert_eq!(DistanceLimit::from_km(None), Some(DistanceLimit::Unlimited));
        assert_eq!(DistanceLimit::from_km(Some(15)), None);
    }
}
