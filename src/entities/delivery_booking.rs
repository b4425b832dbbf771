use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::delivery::DeliveryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    #[sea_orm(string_value = "pickup")]
    Pickup,
    #[sea_orm(string_value = "delivery")]
    Delivery,
}

impl From<DeliveryKind> for BookingKind {
    fn from(kind: DeliveryKind) -> Self {
        match kind {
            DeliveryKind::Pickup => BookingKind::Pickup,
            DeliveryKind::Delivery => BookingKind::Delivery,
        }
    }
}

impl From<BookingKind> for DeliveryKind {
    fn from(kind: BookingKind) -> Self {
        match kind {
            BookingKind::Pickup => DeliveryKind::Pickup,
            BookingKind::Delivery => DeliveryKind::Delivery,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "delivery_booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: BookingKind,
    /// Pickup station; null for home delivery
    pub station: Option<String>,
    pub delivery_date: Date,
    pub slot: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
