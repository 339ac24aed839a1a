use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub fisher_name: Option<String>,
    pub period: String,
    pub period_start: Option<Date>,
    pub period_end: Option<Date>,
    /// JSON array with the IDs of every fishing record this payment covers.
    #[sea_orm(column_type = "JsonBinary")]
    pub record_ids: Json,
    #[sea_orm(column_type = "Double")]
    pub payment_rate: f64,
    #[sea_orm(column_type = "Double")]
    pub total_amount: f64,
    pub paid_date: DateTimeUtc,
    pub notes: Option<String>,
    pub paid_by: Option<String>,
    pub paid_by_name: Option<String>,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Record IDs stored on the payment, ignoring anything that is not a string.
    pub fn record_ids(&self) -> Vec<String> {
        self.record_ids
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
