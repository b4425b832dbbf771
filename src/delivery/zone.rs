use serde::Serialize;

use crate::delivery::stations::{Station, StationRegistry};
use crate::utils::geo::{distance_meters, Coordinate};

/// Free-radius multipliers for the bounded tiers, cheapest first.
/// Anything beyond the last threshold falls into the open-ended tier.
const DEVIATION_LADDER: [(u8, f64); 4] = [(1, 1.0), (2, 2.0), (3, 4.0), (4, 8.0)];

/// Distance tier relative to the nearest station, 1 (free) through 5 (open-ended).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Deviation(u8);

impl Deviation {
    pub const FREE: Deviation = Deviation(1);
    pub const OPEN_ENDED: Deviation = Deviation(5);

    pub fn new(tier: u8) -> Option<Self> {
        (Self::FREE.0..=Self::OPEN_ENDED.0)
            .contains(&tier)
            .then_some(Self(tier))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Map a distance onto the tier ladder. Boundary distances take the lower tier.
    pub fn for_distance(distance_m: f64, free_radius_m: f64) -> Self {
        DEVIATION_LADDER
            .iter()
            .find(|(_, multiplier)| distance_m <= free_radius_m * multiplier)
            .map(|(tier, _)| Self(*tier))
            .unwrap_or(Self::OPEN_ENDED)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DistanceCalculation {
    pub nearest_station: &'static Station,
    pub distance_meters: f64,
    pub deviation: Deviation,
}

impl DistanceCalculation {
    pub fn distance_km(&self) -> f64 {
        (self.distance_meters / 100.0).round() / 10.0
    }

    pub fn rounded_meters(&self) -> f64 {
        self.distance_meters.round()
    }
}

/// Find the nearest station and the customer's deviation tier.
///
/// Equidistant stations resolve to the first one in registry order.
pub fn classify(registry: &StationRegistry, customer: Coordinate) -> DistanceCalculation {
    let stations = registry.stations();
    let mut nearest = &stations[0];
    let mut min_distance = distance_meters(customer, nearest.coordinate);

    for station in &stations[1..] {
        let distance = distance_meters(customer, station.coordinate);
        if distance < min_distance {
            nearest = station;
            min_distance = distance;
        }
    }

    DistanceCalculation {
        nearest_station: nearest,
        distance_meters: min_distance,
        deviation: Deviation::for_distance(min_distance, registry.free_radius_meters()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::stations::STATIONS;
    use crate::utils::geo::offset_north;

    const TWIN_STATIONS: &[Station] = &[
        Station {
            name: "A",
            coordinate: Coordinate::new(0.0, 0.1),
        },
        Station {
            name: "B",
            coordinate: Coordinate::new(0.0, -0.1),
        },
    ];

    #[test]
    fn test_deviation_boundaries() {
        let free = 5_000.0;

        assert_eq!(Deviation::for_distance(0.0, free).get(), 1);
        assert_eq!(Deviation::for_distance(5_000.0, free).get(), 1);
        assert_eq!(Deviation::for_distance(5_000.001, free).get(), 2);
        assert_eq!(Deviation::for_distance(10_000.0, free).get(), 2);
        assert_eq!(Deviation::for_distance(10_001.0, free).get(), 3);
        assert_eq!(Deviation::for_distance(20_000.0, free).get(), 3);
        assert_eq!(Deviation::for_distance(40_000.0, free).get(), 4);
        assert_eq!(Deviation::for_distance(40_000.5, free).get(), 5);
        assert_eq!(Deviation::for_distance(1_000_000.0, free).get(), 5);
    }

    #[test]
    fn test_deviation_is_monotonic() {
        let mut previous = Deviation::FREE;
        for step in 0..200 {
            let tier = Deviation::for_distance(step as f64 * 500.0, 5_000.0);
            assert!(tier >= previous);
            assert!((1..=5).contains(&tier.get()));
            previous = tier;
        }
        assert_eq!(previous, Deviation::OPEN_ENDED);
    }

    #[test]
    fn test_deviation_new() {
        assert!(Deviation::new(0).is_none());
        assert_eq!(Deviation::new(3).map(Deviation::get), Some(3));
        assert!(Deviation::new(6).is_none());
    }

    #[test]
    fn test_classify_at_station() {
        let registry = StationRegistry::default();
        let lis = STATIONS[1];

        let calc = classify(&registry, lis.coordinate);
        assert_eq!(calc.nearest_station.name, "LIS");
        assert!(calc.distance_meters < 1e-6);
        assert_eq!(calc.deviation, Deviation::FREE);
    }

    #[test]
    fn test_classify_picks_nearest() {
        let registry = StationRegistry::default();
        let near_setubal = offset_north(STATIONS[2].coordinate, -15_000.0);

        let calc = classify(&registry, near_setubal);
        assert_eq!(calc.nearest_station.name, "SET");
        assert!((calc.distance_meters - 15_000.0).abs() < 1.0);
        assert_eq!(calc.deviation.get(), 3);
        assert_eq!(calc.distance_km(), 15.0);
    }

    #[test]
    fn test_classify_tie_keeps_registry_order() {
        let registry = StationRegistry::new(TWIN_STATIONS, 5_000.0, "A").unwrap();

        let calc = classify(&registry, Coordinate::new(0.0, 0.0));
        assert_eq!(calc.nearest_station.name, "A");
    }

    #[test]
    fn test_classify_far_away_is_open_ended() {
        let registry = StationRegistry::default();
        let porto = Coordinate::new(41.1579, -8.6291);

        let calc = classify(&registry, porto);
        assert_eq!(calc.nearest_station.name, "LIS");
        assert_eq!(calc.deviation, Deviation::OPEN_ENDED);
    }
}
