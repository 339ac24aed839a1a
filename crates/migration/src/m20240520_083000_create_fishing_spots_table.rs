use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FishingSpots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FishingSpots::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FishingSpots::Name).string().not_null())
                    .col(ColumnDef::new(FishingSpots::Province).string())
                    .col(ColumnDef::new(FishingSpots::District).string())
                    .col(ColumnDef::new(FishingSpots::Village).string())
                    .col(ColumnDef::new(FishingSpots::Latitude).double())
                    .col(ColumnDef::new(FishingSpots::Longitude).double())
                    .col(ColumnDef::new(FishingSpots::Description).string())
                    .col(
                        ColumnDef::new(FishingSpots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FishingSpots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum FishingSpots {
    Table,
    Id,
    Name,
    Province,
    District,
    Village,
    Latitude,
    Longitude,
    Description,
    CreatedAt,
}
