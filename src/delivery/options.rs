use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::delivery::pricing::{is_deliverable_within, price_for_deviation, to_cents};
use crate::delivery::schedule::{
    schedule, DeliveryKind, ScheduleTarget, ScheduledDate, Slot, SlotOccupancy,
};
use crate::delivery::zone::{classify, Deviation, DistanceCalculation};
use crate::delivery::DeliveryPolicy;
use crate::error::{AppError, AppResult};
use crate::utils::geo::Coordinate;

#[derive(Debug, Clone, Serialize)]
pub struct PickupOption {
    pub station: &'static str,
    pub coordinate: Coordinate,
    pub price: Decimal,
    pub description: String,
    pub available_dates: Vec<ScheduledDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeDeliveryOption {
    pub coordinates: Coordinate,
    pub nearest_station: &'static str,
    pub distance_km: f64,
    pub deviation: Deviation,
    pub base_price: Decimal,
    pub description: String,
    pub available_dates: Vec<ScheduledDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryOptions {
    pub address: String,
    pub pickup_options: Vec<PickupOption>,
    pub delivery_options: Option<HomeDeliveryOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A single bookable choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryOption {
    #[serde(rename = "type")]
    pub kind: DeliveryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<&'static str>,
    pub date: NaiveDate,
    pub slot: Slot,
    pub price: Decimal,
    pub description: String,
    pub available: bool,
}

fn pickup_description(station: &str) -> String {
    format!("Pickup at {}", station)
}

fn delivery_description(calc: &DistanceCalculation) -> String {
    if calc.deviation == Deviation::FREE {
        "Free home delivery".to_string()
    } else {
        format!(
            "Home delivery ({} km from {})",
            calc.distance_km(),
            calc.nearest_station.name
        )
    }
}

fn out_of_area_message(calc: &DistanceCalculation, max_radius_m: f64) -> String {
    format!(
        "Address is outside the delivery area: {} km from the nearest station ({}), maximum is {} km",
        calc.distance_km(),
        calc.nearest_station.name,
        max_radius_m / 1000.0
    )
}

/// Pickup options for every station plus home delivery when the address allows it.
///
/// Missing coordinates or an address outside the service area leave
/// `delivery_options` empty with an explanatory `error`; pickups are always returned.
pub fn get_delivery_options(
    policy: &DeliveryPolicy,
    address: &str,
    coordinates: Option<Coordinate>,
    today: NaiveDate,
    occupancy: &SlotOccupancy,
) -> DeliveryOptions {
    let registry = &policy.registry;

    let pickup_options = registry
        .stations()
        .iter()
        .map(|station| {
            let target = ScheduleTarget::Pickup(station);
            PickupOption {
                station: station.name,
                coordinate: station.coordinate,
                price: to_cents(Decimal::ZERO),
                description: pickup_description(station.name),
                available_dates: schedule(registry, &target, today, occupancy, policy.slot_capacity),
            }
        })
        .collect();

    let mut result = DeliveryOptions {
        address: address.to_string(),
        pickup_options,
        delivery_options: None,
        error: None,
    };

    let Some(coordinates) = coordinates else {
        tracing::debug!(address, "No coordinates for address, home delivery unavailable");
        result.error = Some(format!("Could not locate address: {}", address));
        return result;
    };

    let calc = classify(registry, coordinates);
    tracing::debug!(
        address,
        nearest_station = calc.nearest_station.name,
        distance_m = calc.rounded_meters(),
        deviation = calc.deviation.get(),
        "Classified delivery address"
    );

    if !is_deliverable_within(calc.distance_meters, policy.max_delivery_radius_m) {
        result.error = Some(out_of_area_message(&calc, policy.max_delivery_radius_m));
        return result;
    }

    let target = ScheduleTarget::HomeDelivery;
    result.delivery_options = Some(HomeDeliveryOption {
        coordinates,
        nearest_station: calc.nearest_station.name,
        distance_km: calc.distance_km(),
        deviation: calc.deviation,
        base_price: price_for_deviation(calc.deviation, calc.distance_meters),
        description: delivery_description(&calc),
        available_dates: schedule(registry, &target, today, occupancy, policy.slot_capacity),
    });

    result
}

/// Price and validate one chosen option before it is booked.
pub fn quote_option(
    policy: &DeliveryPolicy,
    target: &ScheduleTarget,
    coordinates: Option<Coordinate>,
    date: NaiveDate,
    slot: Slot,
    today: NaiveDate,
    current_bookings: u32,
) -> AppResult<DeliveryOption> {
    let registry = &policy.registry;

    if !target.dates(registry, today).contains(&date) {
        return Err(AppError::BadRequest(format!(
            "{} is not an available {} date",
            date,
            target.kind().as_str()
        )));
    }

    let (price, description) = match target {
        ScheduleTarget::Pickup(station) => {
            (to_cents(Decimal::ZERO), pickup_description(station.name))
        }
        ScheduleTarget::HomeDelivery => {
            let coordinates = coordinates.ok_or_else(|| {
                AppError::InvalidArgument("Home delivery requires coordinates".to_string())
            })?;
            let calc = classify(registry, coordinates);
            if !is_deliverable_within(calc.distance_meters, policy.max_delivery_radius_m) {
                return Err(AppError::BadRequest(out_of_area_message(
                    &calc,
                    policy.max_delivery_radius_m,
                )));
            }
            (
                price_for_deviation(calc.deviation, calc.distance_meters),
                delivery_description(&calc),
            )
        }
    };

    Ok(DeliveryOption {
        kind: target.kind(),
        station: target.station_name(),
        date,
        slot,
        price,
        description,
        available: current_bookings < policy.slot_capacity,
    })
}
