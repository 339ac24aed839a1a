use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "researcher")]
    Researcher,
    #[sea_orm(string_value = "government")]
    Government,
    #[sea_orm(string_value = "community_manager")]
    CommunityManager,
    #[sea_orm(string_value = "fisher")]
    Fisher,
}
