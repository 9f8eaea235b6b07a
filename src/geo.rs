//! Geo

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude
    pub lat: f64,

    /// Longitude
    pub lng: f64,
}

impl Coordinates {
    /// Creates coordinates without any "unknown location" interpretation.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds coordinates from optionally stored GPS columns.
    ///
    /// Missing values and the exact `(0, 0)` placeholder both mean the
    /// location is unknown.
    pub fn known(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng))
                if lat.is_finite() && lng.is_finite() && !(lat == 0.0 && lng == 0.0) =>
            {
                Some(Self { lat, lng })
            }
            _ => None,
        }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(self, other)
    }
}

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRAGUE: Coordinates = Coordinates::new(50.0755, 14.4378);
    const BRNO: Coordinates = Coordinates::new(49.1951, 16.6068);

    #[test]
    fn distance_to_self_is_zero() {
        assert!(haversine_km(&PRAGUE, &PRAGUE).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(&PRAGUE, &BRNO);
        let back = haversine_km(&BRNO, &PRAGUE);

        assert!((there - back).abs() < 1e-9, "{there} != {back}");
    }

    #[test]
    fn prague_to_brno_is_roughly_185_km() {
        let km = PRAGUE.distance_km(&BRNO);

        assert!((km - 185.0).abs() < 5.0, "got {km}");
    }

    #[test]
    fn zero_zero_is_unknown() {
        assert_eq!(Coordinates::known(Some(0.0), Some(0.0)), None);
    }

    #[test]
    fn missing_component_is_unknown() {
        assert_eq!(Coordinates::known(Some(50.0), None), None);
        assert_eq!(Coordinates::known(None, Some(14.0)), None);
    }

    #[test]
    fn single_zero_component_is_still_known() {
        assert_eq!(
            Coordinates::known(Some(0.0), Some(14.0)),
            Some(Coordinates::new(0.0, 14.0))
        );
    }

    #[test]
    fn non_finite_is_unknown() {
        assert_eq!(Coordinates::known(Some(f64::NAN), Some(14.0)), None);
    }
}
