pub mod prelude;

pub mod fish_species;
pub mod fishing_records;
pub mod fishing_spots;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod users;
