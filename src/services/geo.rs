//! Great-circle distance math.
//!
//! Pure Haversine kernel with no dependencies on the rest of the crate.
//! Coordinate extraction and validation live in the address service; this
//! module only does the arithmetic.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers to statute miles.
const KM_TO_MI: f64 = 0.621371;

/// Requested output unit. Anything the client sends that is not a known
/// unit deserializes to neither variant and falls back to both units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Km,
    Mi,
}

impl DistanceUnit {
    /// Parse a unit string. Unrecognized values are `None`, not an error.
    pub fn parse(unit: &str) -> Option<Self> {
        match unit {
            "km" => Some(DistanceUnit::Km),
            "mi" => Some(DistanceUnit::Mi),
            _ => None,
        }
    }
}

/// Distance in the requested unit(s), rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mi: Option<f64>,
}

/// Haversine great-circle distance between two points, in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Compute the distance between two points, selecting output units.
///
/// `unit == Some(Km)` or `Some(Mi)` restricts the result to that unit;
/// `None` returns both.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, unit: Option<DistanceUnit>) -> Distance {
    let km = haversine_km(lat1, lon1, lat2, lon2);
    let mi = km * KM_TO_MI;

    match unit {
        Some(DistanceUnit::Km) => Distance {
            km: Some(round2(km)),
            mi: None,
        },
        Some(DistanceUnit::Mi) => Distance {
            km: None,
            mi: Some(round2(mi)),
        },
        None => Distance {
            km: Some(round2(km)),
            mi: Some(round2(mi)),
        },
    }
}

/// Round to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Rochester (RIT) → New York City, pinned from a reference Haversine
    // implementation: 402.10 km / 249.85 mi.
    const RIT: (f64, f64) = (43.084847, -77.674194);
    const NYC: (f64, f64) = (40.712776, -74.005974);

    #[test]
    fn test_reference_distance_both_units() {
        let d = distance(RIT.0, RIT.1, NYC.0, NYC.1, None);
        assert_eq!(d.km, Some(402.10));
        assert_eq!(d.mi, Some(249.85));
    }

    #[test]
    fn test_symmetry() {
        let forward = distance(RIT.0, RIT.1, NYC.0, NYC.1, None);
        let backward = distance(NYC.0, NYC.1, RIT.0, RIT.1, None);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_mi_tracks_km_within_rounding() {
        // London → Paris
        let d = distance(51.5074, -0.1278, 48.8566, 2.3522, None);
        let km = d.km.unwrap();
        let mi = d.mi.unwrap();
        assert!((mi - km * KM_TO_MI).abs() < 0.01);
    }

    #[test]
    fn test_unit_km_only() {
        let d = distance(RIT.0, RIT.1, NYC.0, NYC.1, Some(DistanceUnit::Km));
        assert_eq!(d.km, Some(402.10));
        assert_eq!(d.mi, None);
    }

    #[test]
    fn test_unit_mi_only() {
        let d = distance(RIT.0, RIT.1, NYC.0, NYC.1, Some(DistanceUnit::Mi));
        assert_eq!(d.km, None);
        assert_eq!(d.mi, Some(249.85));
    }

    #[test]
    fn test_unrecognized_unit_parses_to_none() {
        assert_eq!(DistanceUnit::parse("km"), Some(DistanceUnit::Km));
        assert_eq!(DistanceUnit::parse("mi"), Some(DistanceUnit::Mi));
        assert_eq!(DistanceUnit::parse("miles"), None);
        assert_eq!(DistanceUnit::parse("KM"), None);
        assert_eq!(DistanceUnit::parse(""), None);
    }

    #[test]
    fn test_zero_distance() {
        let d = distance(10.0, 20.0, 10.0, 20.0, None);
        assert_eq!(d.km, Some(0.0));
        assert_eq!(d.mi, Some(0.0));
    }
}
