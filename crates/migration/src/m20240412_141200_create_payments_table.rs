use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::UserId).string().not_null())
                    .col(ColumnDef::new(Payments::FisherName).string())
                    .col(ColumnDef::new(Payments::Period).string().not_null())
                    .col(ColumnDef::new(Payments::PeriodStart).date())
                    .col(ColumnDef::new(Payments::PeriodEnd).date())
                    .col(ColumnDef::new(Payments::RecordIds).json_binary().not_null())
                    .col(
                        ColumnDef::new(Payments::PaymentRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Payments::TotalAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Payments::PaidDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Notes).string())
                    .col(ColumnDef::new(Payments::PaidBy).string())
                    .col(ColumnDef::new(Payments::PaidByName).string())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-user_id")
                    .table(Payments::Table)
                    .col(Payments::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Payments {
    Table,
    Id,
    UserId,
    FisherName,
    Period,
    PeriodStart,
    PeriodEnd,
    RecordIds,
    PaymentRate,
    TotalAmount,
    PaidDate,
    Notes,
    PaidBy,
    PaidByName,
    CreatedAt,
}
