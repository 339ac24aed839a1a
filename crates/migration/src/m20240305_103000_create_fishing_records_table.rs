use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // no foreign key on user_id, records may point at deleted profiles
        manager
            .create_table(
                Table::create()
                    .table(FishingRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FishingRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FishingRecords::UserId).string())
                    .col(ColumnDef::new(FishingRecords::CatchDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(FishingRecords::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FishingRecords::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(FishingRecords::PaymentId).string())
                    .col(ColumnDef::new(FishingRecords::PaymentDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(FishingRecords::PaymentAmount).double())
                    .col(ColumnDef::new(FishingRecords::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(FishingRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FishingRecords::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fishing_records-user_id")
                    .table(FishingRecords::Table)
                    .col(FishingRecords::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fishing_records-catch_date")
                    .table(FishingRecords::Table)
                    .col(FishingRecords::CatchDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fishing_records-payment_id")
                    .table(FishingRecords::Table)
                    .col(FishingRecords::PaymentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FishingRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum FishingRecords {
    Table,
    Id,
    UserId,
    CatchDate,
    Verified,
    IsPaid,
    PaymentId,
    PaymentDate,
    PaymentAmount,
    Data,
    CreatedAt,
    UpdatedAt,
}
