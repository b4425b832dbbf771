//! Delivery zones, fees and booking windows.
//!
//! Everything here is a pure function of its inputs plus the date handed in
//! as "today"; booking counts are supplied by the caller.

pub mod options;
pub mod pricing;
pub mod schedule;
pub mod stations;
pub mod zone;

use crate::delivery::pricing::MAX_DELIVERY_RADIUS_METERS;
use crate::delivery::schedule::DEFAULT_SLOT_CAPACITY;
use crate::delivery::stations::StationRegistry;

pub use options::{get_delivery_options, quote_option, DeliveryOption, DeliveryOptions};
pub use schedule::{DeliveryKind, ScheduleTarget, Slot, SlotOccupancy};
pub use stations::{Station, STATIONS};
pub use zone::{classify, Deviation, DistanceCalculation};

/// Static delivery configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct DeliveryPolicy {
    pub registry: StationRegistry,
    pub max_delivery_radius_m: f64,
    pub slot_capacity: u32,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            registry: StationRegistry::default(),
            max_delivery_radius_m: MAX_DELIVERY_RADIUS_METERS,
            slot_capacity: DEFAULT_SLOT_CAPACITY,
        }
    }
}
