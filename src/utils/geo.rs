use serde::{Deserialize, Serialize};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in meters
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Point reached by travelling `meters` due north (negative for south) along a meridian.
#[cfg(test)]
pub fn offset_north(origin: Coordinate, meters: f64) -> Coordinate {
    Coordinate::new(origin.lat + (meters / EARTH_RADIUS_M).to_degrees(), origin.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISBON: Coordinate = Coordinate::new(38.7223, -9.1393);
    const PORTO: Coordinate = Coordinate::new(41.1579, -8.6291);

    #[test]
    fn test_haversine_lisbon_porto() {
        let distance = distance_meters(LISBON, PORTO);
        // Should be approximately 270-280 km
        assert!(distance > 270_000.0 && distance < 280_000.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = distance_meters(LISBON, PORTO);
        let back = distance_meters(PORTO, LISBON);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert!(distance_meters(LISBON, LISBON).abs() < 1e-9);
    }

    #[test]
    fn test_offset_north_round_trips_distance() {
        let moved = offset_north(LISBON, 45_000.0);
        assert!((distance_meters(LISBON, moved) - 45_000.0).abs() < 1e-3);

        let south = offset_north(LISBON, -12_345.0);
        assert!((distance_meters(south, LISBON) - 12_345.0).abs() < 1e-3);
    }

    #[test]
    fn test_nan_propagates() {
        let broken = Coordinate::new(f64::NAN, 0.0);
        assert!(distance_meters(broken, LISBON).is_nan());
    }
}
