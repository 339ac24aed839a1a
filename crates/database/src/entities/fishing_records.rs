//! Fishing records submitted by the mobile client.
//!
//! Only the fields the dashboard filters or links on are columns. Everything
//! else the client sends (location, fish list, weather, gear, photos) stays
//! in the `data` document, which may use either the current or the legacy
//! layout.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "fishing_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: Option<String>,
    pub catch_date: Option<DateTimeUtc>,
    pub verified: bool,
    pub is_paid: bool,
    pub payment_id: Option<String>,
    pub payment_date: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Double", nullable)]
    pub payment_amount: Option<f64>,
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
