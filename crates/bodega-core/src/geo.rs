//! # Geofence Module
//!
//! Great-circle distance math and the delivery geofence check.
//!
//! ## The Geofence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │        . - ~ ~ ~ - .                                                    │
//! │    , '               ' ,      The store delivers inside a circle of     │
//! │   ,       STORE        ,      `radius_km` around its own coordinates.   │
//! │  ,          ●───────►  ,                                                │
//! │  ,        radius_km    ,      Distance is haversine great-circle on a   │
//! │   ,                   ,       spherical Earth of radius 6371 km.        │
//! │    ,                , '                                                 │
//! │      ' - , _ _ ,  '       ✗ destination outside → OutOfRange            │
//! │                           ✗ destination missing → OutOfRange (explicit) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity
//! `distance_km` and `Geofence::contains` are pure: same inputs, same output,
//! no side effects. That makes the range check trivially idempotent.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers (spherical model).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// Coordinates
// =============================================================================

/// A WGS84-style latitude/longitude pair, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Coordinates { lat, lon }
    }
}

/// Computes the great-circle distance between two coordinates, in km.
///
/// Uses the haversine formula on a spherical Earth of radius 6371 km.
///
/// ## Example
/// ```rust
/// use bodega_core::geo::{distance_km, Coordinates};
///
/// let havana = Coordinates::new(23.1140, -82.3640);
/// let same = distance_km(havana, havana);
/// assert!(same < 1e-9);
/// ```
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

// =============================================================================
// Geofence
// =============================================================================

/// The delivery geofence: a maximum-radius circle around the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    /// The store's own coordinates.
    pub center: Coordinates,
    /// Maximum delivery distance from the store, in kilometers.
    pub radius_km: f64,
}

impl Geofence {
    /// Creates a geofence around `center` with the given radius.
    pub const fn new(center: Coordinates, radius_km: f64) -> Self {
        Geofence { center, radius_km }
    }

    /// Checks whether a destination is within delivery range.
    ///
    /// ## Edge Case: Missing Coordinates
    /// A destination of `None` fails the check. A customer with no recorded
    /// coordinates is never silently treated as "in range" - opting them in
    /// must be an explicit caller decision.
    pub fn contains(&self, destination: Option<Coordinates>) -> bool {
        match destination {
            Some(dest) => distance_km(self.center, dest) <= self.radius_km,
            None => false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: Coordinates = Coordinates::new(23.1140, -82.3640);

    #[test]
    fn test_distance_zero_for_same_point() {
        assert!(distance_km(STORE, STORE) < 1e-9);
    }

    #[test]
    fn test_distance_known_pair() {
        // One degree of latitude is ~111.19 km on the 6371 km sphere.
        let north = Coordinates::new(STORE.lat + 1.0, STORE.lon);
        let d = distance_km(STORE, north);
        assert!((d - 111.19).abs() < 0.5, "got {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let other = Coordinates::new(23.05, -82.40);
        let ab = distance_km(STORE, other);
        let ba = distance_km(other, STORE);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn test_geofence_contains() {
        let fence = Geofence::new(STORE, 10.0);

        // ~5.5 km north: inside
        let near = Coordinates::new(STORE.lat + 0.05, STORE.lon);
        assert!(fence.contains(Some(near)));

        // ~22 km north: outside
        let far = Coordinates::new(STORE.lat + 0.2, STORE.lon);
        assert!(!fence.contains(Some(far)));
    }

    #[test]
    fn test_geofence_missing_coordinates_fail() {
        let fence = Geofence::new(STORE, 10.0);
        assert!(!fence.contains(None));
    }

    #[test]
    fn test_geofence_check_is_idempotent() {
        let fence = Geofence::new(STORE, 10.0);
        let dest = Some(Coordinates::new(23.16, -82.40));
        let first = fence.contains(dest);
        for _ in 0..10 {
            assert_eq!(fence.contains(dest), first);
        }
    }
}
