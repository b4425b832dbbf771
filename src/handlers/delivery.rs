use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::bookings;
use crate::delivery::schedule::{local_today, schedule, ScheduledDate, HORIZON_DAYS};
use crate::delivery::{
    get_delivery_options, quote_option, DeliveryKind, DeliveryOptions, ScheduleTarget, Slot,
    Station,
};
use crate::entities::delivery_booking;
use crate::error::{AppError, AppResult};
use crate::utils::geo::Coordinate;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub free_radius_meters: f64,
    pub primary_hub: &'static str,
    pub stations: Vec<Station>,
}

/// List service stations
pub async fn list_stations(State(state): State<AppState>) -> Json<StationsResponse> {
    let registry = &state.policy.registry;

    Json(StationsResponse {
        free_radius_meters: registry.free_radius_meters(),
        primary_hub: registry.primary_hub(),
        stations: registry.stations().to_vec(),
    })
}

// ============ Delivery Options ============

#[derive(Debug, Deserialize)]
pub struct DeliveryOptionsQuery {
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

fn explicit_coordinates(lat: Option<f64>, lng: Option<f64>) -> AppResult<Option<Coordinate>> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(Some(Coordinate::new(lat, lng))),
        (None, None) => Ok(None),
        _ => Err(AppError::BadRequest(
            "lat and lng must be given together".to_string(),
        )),
    }
}

/// Pickup and home delivery options for an address
pub async fn delivery_options(
    State(state): State<AppState>,
    Query(query): Query<DeliveryOptionsQuery>,
) -> AppResult<Json<DeliveryOptions>> {
    let explicit = explicit_coordinates(query.lat, query.lng)?;
    let address = query.address.unwrap_or_default();

    if explicit.is_none() && address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Provide an address or lat/lng coordinates".to_string(),
        ));
    }

    // Geocoding failures degrade to pickup-only options
    let coordinates = match explicit {
        Some(coordinate) => Some(coordinate),
        None => match state.geocoder.lookup(&address).await {
            Ok(coordinate) => Some(coordinate),
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Geocoding failed");
                None
            }
        },
    };

    let today = local_today();
    let occupancy =
        bookings::slot_occupancy(state.db.as_ref(), today, today + Duration::days(HORIZON_DAYS)).await?;

    Ok(Json(get_delivery_options(
        &state.policy,
        &address,
        coordinates,
        today,
        &occupancy,
    )))
}

// ============ Schedule ============

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub kind: DeliveryKind,
    pub station: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub kind: DeliveryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<&'static str>,
    pub dates: Vec<ScheduledDate>,
}

/// Bookable dates for a pickup station or home delivery
pub async fn get_schedule(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> AppResult<Json<ScheduleResponse>> {
    let registry = &state.policy.registry;
    let target = ScheduleTarget::resolve(registry, query.kind, query.station.as_deref())?;

    let today = local_today();
    let occupancy =
        bookings::slot_occupancy(state.db.as_ref(), today, today + Duration::days(HORIZON_DAYS)).await?;

    Ok(Json(ScheduleResponse {
        kind: target.kind(),
        station: target.station_name(),
        dates: schedule(registry, &target, today, &occupancy, state.policy.slot_capacity),
    }))
}

// ============ Bookings ============

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub kind: DeliveryKind,
    pub station: Option<String>,
    pub date: NaiveDate,
    pub slot: Option<Slot>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: DeliveryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    pub date: NaiveDate,
    pub slot: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<Coordinate>,
    pub created_at: DateTime<Utc>,
}

impl From<delivery_booking::Model> for BookingResponse {
    fn from(b: delivery_booking::Model) -> Self {
        let coordinates = match (b.lat, b.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        };

        Self {
            id: b.id,
            kind: b.kind.into(),
            station: b.station,
            date: b.delivery_date,
            slot: b.slot,
            price: b.price,
            description: None,
            address: b.address,
            coordinates,
            created_at: b.created_at.with_timezone(&Utc),
        }
    }
}

/// Book a pickup or home delivery slot
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    let policy = &state.policy;
    let target = ScheduleTarget::resolve(&policy.registry, payload.kind, payload.station.as_deref())?;
    let slot = payload.slot.unwrap_or(Slot::Afternoon);

    let mut coordinates = explicit_coordinates(payload.lat, payload.lng)?;
    if target == ScheduleTarget::HomeDelivery && coordinates.is_none() {
        let address = payload
            .address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| {
                AppError::BadRequest("Home delivery requires an address or coordinates".to_string())
            })?;
        coordinates = Some(state.geocoder.lookup(address).await?);
    }

    let key = target.slot_key(payload.date, slot);
    let current = bookings::count_in_slot(state.db.as_ref(), &key).await?;
    let option = quote_option(
        policy,
        &target,
        coordinates,
        payload.date,
        slot,
        local_today(),
        current,
    )?;

    if !option.available {
        return Err(AppError::Conflict(format!(
            "The {} slot on {} is fully booked",
            slot.as_str(),
            payload.date
        )));
    }

    // Pickup bookings do not keep customer coordinates
    let coordinates = coordinates.filter(|_| target == ScheduleTarget::HomeDelivery);
    let new_booking = delivery_booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        kind: Set(option.kind.into()),
        station: Set(option.station.map(str::to_string)),
        delivery_date: Set(option.date),
        slot: Set(option.slot.as_str().to_string()),
        price: Set(option.price),
        address: Set(payload.address.clone()),
        lat: Set(coordinates.map(|c| c.lat)),
        lng: Set(coordinates.map(|c| c.lng)),
        ..Default::default()
    };

    let booking =
        bookings::insert_within_capacity(state.db.as_ref(), &key, policy.slot_capacity, new_booking)
            .await?;

    let mut response = BookingResponse::from(booking);
    response.description = Some(option.description);
    Ok(Json(response))
}

/// Get a booking
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = bookings::find(state.db.as_ref(), booking_id).await?;
    Ok(Json(booking.into()))
}
