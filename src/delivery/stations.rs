use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::utils::geo::Coordinate;

/// Radius around every station inside which home delivery is free.
pub const DEFAULT_FREE_RADIUS_METERS: f64 = 5_000.0;

/// Station whose pickups are ready the next day.
pub const DEFAULT_PRIMARY_HUB: &str = "PG";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Station {
    pub name: &'static str,
    pub coordinate: Coordinate,
}

/// Service stations, in registry order.
pub const STATIONS: &[Station] = &[
    Station {
        name: "PG",
        coordinate: Coordinate::new(38.6617, -9.1711),
    },
    Station {
        name: "LIS",
        coordinate: Coordinate::new(38.7223, -9.1393),
    },
    Station {
        name: "SET",
        coordinate: Coordinate::new(38.5244, -8.8882),
    },
];

#[derive(Debug, Clone)]
pub struct StationRegistry {
    stations: &'static [Station],
    free_radius_m: f64,
    primary_hub: &'static str,
}

impl StationRegistry {
    /// Build a registry over a non-empty station list.
    pub fn new(
        stations: &'static [Station],
        free_radius_m: f64,
        primary_hub: &str,
    ) -> AppResult<Self> {
        if !free_radius_m.is_finite() || free_radius_m <= 0.0 {
            return Err(AppError::InvalidArgument(format!(
                "Free radius must be a positive number of meters, got {}",
                free_radius_m
            )));
        }

        if stations.is_empty() {
            return Err(AppError::InvalidArgument(
                "Station registry cannot be empty".to_string(),
            ));
        }

        let hub = stations
            .iter()
            .find(|s| s.name == primary_hub)
            .ok_or_else(|| {
                AppError::InvalidArgument(format!("Unknown primary hub: {}", primary_hub))
            })?;

        Ok(Self {
            stations,
            free_radius_m,
            primary_hub: hub.name,
        })
    }

    pub fn stations(&self) -> &'static [Station] {
        self.stations
    }

    pub fn free_radius_meters(&self) -> f64 {
        self.free_radius_m
    }

    pub fn primary_hub(&self) -> &'static str {
        self.primary_hub
    }

    pub fn is_primary_hub(&self, station: &Station) -> bool {
        station.name == self.primary_hub
    }

    pub fn find(&self, name: &str) -> AppResult<&'static Station> {
        self.stations
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| AppError::InvalidArgument(format!("Unknown station: {}", name)))
    }
}

impl Default for StationRegistry {
    fn default() -> Self {
        Self {
            stations: STATIONS,
            free_radius_m: DEFAULT_FREE_RADIUS_METERS,
            primary_hub: DEFAULT_PRIMARY_HUB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = StationRegistry::default();
        let names: Vec<_> = registry.stations().iter().map(|s| s.name).collect();

        assert_eq!(names, vec!["PG", "LIS", "SET"]);
        assert_eq!(registry.free_radius_meters(), 5_000.0);
        assert_eq!(registry.primary_hub(), "PG");
    }

    #[test]
    fn test_find_station() {
        let registry = StationRegistry::default();

        assert_eq!(registry.find("LIS").unwrap().name, "LIS");
        assert_eq!(registry.find("lis").unwrap().name, "LIS");
        assert!(matches!(
            registry.find("OPO"),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_new_rejects_unusable_free_radius() {
        for radius in [f64::NAN, f64::INFINITY, 0.0, -1.0] {
            assert!(matches!(
                StationRegistry::new(STATIONS, radius, "PG"),
                Err(AppError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_new_rejects_unknown_hub() {
        assert!(StationRegistry::new(STATIONS, 5_000.0, "OPO").is_err());
        assert!(StationRegistry::new(&[], 5_000.0, "PG").is_err());

        let registry = StationRegistry::new(STATIONS, 2_500.0, "SET").unwrap();
        assert_eq!(registry.free_radius_meters(), 2_500.0);
        assert_eq!(registry.primary_hub(), "SET");
        assert!(registry.is_primary_hub(&STATIONS[2]));
        assert!(!registry.is_primary_hub(&STATIONS[0]));
    }
}
