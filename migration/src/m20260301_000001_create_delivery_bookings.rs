use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeliveryBooking::Table)
                    .if_not_exists()
                    .col(uuid(DeliveryBooking::Id).primary_key())
                    .col(string_len(DeliveryBooking::Kind, 16).not_null())
                    .col(string_len_null(DeliveryBooking::Station, 16))
                    .col(date(DeliveryBooking::DeliveryDate).not_null())
                    .col(string_len(DeliveryBooking::Slot, 16).not_null())
                    .col(decimal_len(DeliveryBooking::Price, 10, 2).not_null())
                    .col(text_null(DeliveryBooking::Address))
                    .col(double_null(DeliveryBooking::Lat))
                    .col(double_null(DeliveryBooking::Lng))
                    .col(
                        timestamp_with_time_zone(DeliveryBooking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Capacity lookups filter on the slot bucket
        manager
            .create_index(
                Index::create()
                    .name("idx_delivery_booking_slot")
                    .table(DeliveryBooking::Table)
                    .col(DeliveryBooking::DeliveryDate)
                    .col(DeliveryBooking::Slot)
                    .col(DeliveryBooking::Station)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryBooking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DeliveryBooking {
    Table,
    Id,
    Kind,
    Station,
    DeliveryDate,
    Slot,
    Price,
    Address,
    Lat,
    Lng,
    CreatedAt,
}
