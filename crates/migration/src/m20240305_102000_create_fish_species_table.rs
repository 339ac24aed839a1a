use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FishSpecies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FishSpecies::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FishSpecies::CommonName).string().not_null())
                    .col(ColumnDef::new(FishSpecies::LocalName).string())
                    .col(ColumnDef::new(FishSpecies::ScientificName).string())
                    .col(ColumnDef::new(FishSpecies::Family).string())
                    .col(ColumnDef::new(FishSpecies::IucnStatus).string())
                    .col(ColumnDef::new(FishSpecies::ImageUrl).string())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FishSpecies::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum FishSpecies {
    Table,
    Id,
    CommonName,
    LocalName,
    ScientificName,
    Family,
    IucnStatus,
    ImageUrl,
}
