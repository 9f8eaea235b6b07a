//! Discovery Predicates

use crate::discovery::{DistanceLimit, EnrichedGrower};

/// Case-insensitive substring match over the grower's searchable text.
///
/// `needle` must already be lowercased; an empty needle matches everyone.
pub(crate) fn matches_query(grower: &EnrichedGrower, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let inner = &grower.grower;

    [Some(inner.name.as_str()), Some(inner.city.as_str()), inner.description.as_deref()]
        .into_iter()
        .flatten()
        .chain(grower.product_names.iter().map(String::as_str))
        .any(|haystack| haystack.to_lowercase().contains(needle))
}

/// Growers without a computed distance are never rejected by the bound.
pub(crate) fn matches_distance(distance_km: Option<f64>, limit: DistanceLimit) -> bool {
    match (limit.km(), distance_km) {
        (Some(max), Some(distance)) => distance <= max,
        _ => true,
    }
}

/// At least one offered product name contains, or is contained in, one of the
/// selected template names. `templates` must already be lowercased; `None`
/// means no category constraint is active.
pub(crate) fn matches_categories(grower: &EnrichedGrower, templates: Option<&[String]>) -> bool {
    let Some(templates) = templates else {
        return true;
    };

    grower
        .product_names
        .iter()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .any(|name| {
            templates
                .iter()
                .any(|template| name.contains(template.as_str()) || template.contains(&name))
        })
}
