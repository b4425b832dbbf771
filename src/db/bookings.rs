use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QuerySelect, Select, Statement,
    TransactionTrait,
};

use crate::delivery::schedule::{Slot, SlotKey, SlotOccupancy};
use crate::entities::delivery_booking::{self, Column};
use crate::error::{AppError, AppResult};

#[derive(Debug, FromQueryResult)]
struct SlotCount {
    station: Option<String>,
    delivery_date: NaiveDate,
    slot: String,
    bookings: i64,
}

fn in_slot(key: &SlotKey) -> Select<delivery_booking::Entity> {
    let query = delivery_booking::Entity::find()
        .filter(Column::DeliveryDate.eq(key.date))
        .filter(Column::Slot.eq(key.slot.as_str()));

    match &key.station {
        Some(station) => query.filter(Column::Station.eq(station.as_str())),
        None => query.filter(Column::Station.is_null()),
    }
}

fn lock_name(key: &SlotKey) -> String {
    format!(
        "delivery_slot:{}:{}:{}",
        key.station.as_deref().unwrap_or("home"),
        key.date,
        key.slot.as_str()
    )
}

/// Booking counts per slot bucket for dates in `from..=to`.
pub async fn slot_occupancy(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<SlotOccupancy> {
    let rows = delivery_booking::Entity::find()
        .select_only()
        .column(Column::Station)
        .column(Column::DeliveryDate)
        .column(Column::Slot)
        .column_as(Expr::col(Column::Id).count(), "bookings")
        .filter(Column::DeliveryDate.between(from, to))
        .group_by(Column::Station)
        .group_by(Column::DeliveryDate)
        .group_by(Column::Slot)
        .into_model::<SlotCount>()
        .all(db)
        .await?;

    let mut occupancy = SlotOccupancy::new();
    for row in rows {
        let Ok(slot) = Slot::parse(&row.slot) else {
            tracing::warn!(slot = %row.slot, "Ignoring bookings for unknown slot");
            continue;
        };
        occupancy.record(
            SlotKey {
                station: row.station,
                date: row.delivery_date,
                slot,
            },
            u32::try_from(row.bookings).unwrap_or(u32::MAX),
        );
    }

    Ok(occupancy)
}

pub async fn count_in_slot<C: ConnectionTrait>(db: &C, key: &SlotKey) -> AppResult<u32> {
    let count = in_slot(key).count(db).await?;
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Insert a booking unless its slot is already at capacity.
///
/// The per-slot advisory lock serializes concurrent bookings for the same bucket.
pub async fn insert_within_capacity(
    db: &DatabaseConnection,
    key: &SlotKey,
    capacity: u32,
    booking: delivery_booking::ActiveModel,
) -> AppResult<delivery_booking::Model> {
    let txn = db.begin().await?;

    txn.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock(hashtext($1))",
        [lock_name(key).into()],
    ))
    .await?;

    let current = count_in_slot(&txn, key).await?;
    if current >= capacity {
        txn.rollback().await?;
        return Err(AppError::Conflict(format!(
            "The {} slot on {} is fully booked",
            key.slot.as_str(),
            key.date
        )));
    }

    let saved = booking.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        booking_id = %saved.id,
        date = %key.date,
        station = key.station.as_deref().unwrap_or("home"),
        bookings = current + 1,
        capacity,
        "Booking stored"
    );

    Ok(saved)
}

pub async fn find(db: &DatabaseConnection, id: uuid::Uuid) -> AppResult<delivery_booking::Model> {
    delivery_booking::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}
