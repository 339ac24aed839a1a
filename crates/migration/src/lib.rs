pub use sea_orm_migration::prelude::*;

mod m20240305_101500_create_users_table;
mod m20240305_102000_create_fish_species_table;
mod m20240305_103000_create_fishing_records_table;
mod m20240412_141200_create_payments_table;
mod m20240520_083000_create_fishing_spots_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240305_101500_create_users_table::Migration),
            Box::new(m20240305_102000_create_fish_species_table::Migration),
            Box::new(m20240305_103000_create_fishing_records_table::Migration),
            Box::new(m20240412_141200_create_payments_table::Migration),
            Box::new(m20240520_083000_create_fishing_spots_table::Migration),
        ]
    }
}
