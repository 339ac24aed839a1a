pub use super::fish_species::Entity as FishSpecies;
pub use super::fishing_records::Entity as FishingRecords;
pub use super::fishing_spots::Entity as FishingSpots;
pub use super::payments::Entity as Payments;
pub use super::users::Entity as Users;
