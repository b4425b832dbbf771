use std::collections::HashMap;

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::delivery::stations::{Station, StationRegistry};
use crate::error::{AppError, AppResult};

/// Last bookable day, counted from today (not from the lead date).
pub const HORIZON_DAYS: i64 = 15;

pub const DEFAULT_SLOT_CAPACITY: u32 = 10;

const PRIMARY_HUB_LEAD_DAYS: i64 = 1;
const STATION_LEAD_DAYS: i64 = 2;
const HOME_DELIVERY_LEAD_DAYS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Pickup,
    Delivery,
}

impl DeliveryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryKind::Pickup => "pickup",
            DeliveryKind::Delivery => "delivery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Afternoon,
}

impl Slot {
    /// Slots offered on every bookable date.
    pub const DAILY: [Slot; 1] = [Slot::Afternoon];

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Afternoon => "afternoon",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "afternoon" => Ok(Slot::Afternoon),
            other => Err(AppError::InvalidArgument(format!("Unknown slot: {}", other))),
        }
    }
}

/// Where a booking is fulfilled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduleTarget {
    Pickup(&'static Station),
    HomeDelivery,
}

impl ScheduleTarget {
    /// Pickups must name a known station; a station given for home delivery is ignored.
    pub fn resolve(
        registry: &StationRegistry,
        kind: DeliveryKind,
        station: Option<&str>,
    ) -> AppResult<Self> {
        match kind {
            DeliveryKind::Pickup => {
                let name = station.ok_or_else(|| {
                    AppError::InvalidArgument("Pickup scheduling requires a station".to_string())
                })?;
                Ok(ScheduleTarget::Pickup(registry.find(name)?))
            }
            DeliveryKind::Delivery => Ok(ScheduleTarget::HomeDelivery),
        }
    }

    pub fn kind(&self) -> DeliveryKind {
        match self {
            ScheduleTarget::Pickup(_) => DeliveryKind::Pickup,
            ScheduleTarget::HomeDelivery => DeliveryKind::Delivery,
        }
    }

    pub fn station_name(&self) -> Option<&'static str> {
        match self {
            ScheduleTarget::Pickup(station) => Some(station.name),
            ScheduleTarget::HomeDelivery => None,
        }
    }

    pub fn lead_days(&self, registry: &StationRegistry) -> i64 {
        match self {
            ScheduleTarget::Pickup(station) if registry.is_primary_hub(station) => {
                PRIMARY_HUB_LEAD_DAYS
            }
            ScheduleTarget::Pickup(_) => STATION_LEAD_DAYS,
            ScheduleTarget::HomeDelivery => HOME_DELIVERY_LEAD_DAYS,
        }
    }

    /// Bookable dates in chronological order.
    pub fn dates(&self, registry: &StationRegistry, today: NaiveDate) -> Vec<NaiveDate> {
        (self.lead_days(registry)..=HORIZON_DAYS)
            .map(|offset| today + Duration::days(offset))
            .filter(|date| match self {
                ScheduleTarget::HomeDelivery => !is_weekend(*date),
                ScheduleTarget::Pickup(_) => true,
            })
            .collect()
    }

    pub fn slot_key(&self, date: NaiveDate, slot: Slot) -> SlotKey {
        SlotKey {
            station: self.station_name().map(str::to_string),
            date,
            slot,
        }
    }
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn available_dates(
    registry: &StationRegistry,
    kind: DeliveryKind,
    station: Option<&str>,
    today: NaiveDate,
) -> AppResult<Vec<NaiveDate>> {
    let target = ScheduleTarget::resolve(registry, kind, station)?;
    Ok(target.dates(registry, today))
}

/// Rejects client-submitted dates outside the booking window.
pub fn is_valid_date(
    registry: &StationRegistry,
    date: NaiveDate,
    kind: DeliveryKind,
    station: Option<&str>,
    today: NaiveDate,
) -> AppResult<bool> {
    Ok(available_dates(registry, kind, station, today)?.contains(&date))
}

/// Capacity bucket: one per station (home delivery uses `None`), date and slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub station: Option<String>,
    pub date: NaiveDate,
    pub slot: Slot,
}

/// Current booking counts, as reported by the booking store.
#[derive(Debug, Clone, Default)]
pub struct SlotOccupancy {
    counts: HashMap<SlotKey, u32>,
}

impl SlotOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: SlotKey, bookings: u32) {
        *self.counts.entry(key).or_insert(0) += bookings;
    }

    pub fn bookings(&self, key: &SlotKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotAvailability {
    pub slot: Slot,
    pub max_capacity: u32,
    pub current_bookings: u32,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledDate {
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailability>,
}

/// Dates with per-slot availability. Full slots stay listed as unavailable.
pub fn schedule(
    registry: &StationRegistry,
    target: &ScheduleTarget,
    today: NaiveDate,
    occupancy: &SlotOccupancy,
    capacity: u32,
) -> Vec<ScheduledDate> {
    target
        .dates(registry, today)
        .into_iter()
        .map(|date| ScheduledDate {
            date,
            slots: Slot::DAILY
                .iter()
                .map(|slot| {
                    let current = occupancy.bookings(&target.slot_key(date, *slot));
                    SlotAvailability {
                        slot: *slot,
                        max_capacity: capacity,
                        current_bookings: current,
                        available: current < capacity,
                    }
                })
                .collect(),
        })
        .collect()
}
