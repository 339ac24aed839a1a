use chrono::{DateTime, TimeZone, Utc};
use database::entities::{
    fish_species, fishing_records, prelude::*, sea_orm_active_enums::Role, users,
};
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde_json::Value;

pub async fn db() -> DatabaseConnection {
    database::in_memory().await.unwrap()
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

pub fn record_model(id: &str, data: Value) -> fishing_records::Model {
    fishing_records::Model {
        id: id.to_string(),
        user_id: None,
        catch_date: None,
        verified: false,
        is_paid: false,
        payment_id: None,
        payment_date: None,
        payment_amount: None,
        data,
        created_at: at(1, 0),
        updated_at: None,
    }
}

pub async fn insert_record(
    db: &DatabaseConnection,
    id: &str,
    user_id: Option<&str>,
    catch_date: Option<DateTime<Utc>>,
    verified: bool,
    data: Value,
) {
    let record = fishing_records::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.map(str::to_string)),
        catch_date: Set(catch_date),
        verified: Set(verified),
        is_paid: Set(false),
        payment_id: Set(None),
        payment_date: Set(None),
        payment_amount: Set(None),
        data: Set(data),
        created_at: Set(at(1, 0)),
        updated_at: Set(None),
    };

    FishingRecords::insert(record)
        .exec_without_returning(db)
        .await
        .unwrap();
}

pub async fn insert_user(db: &DatabaseConnection, id: &str, name: &str) {
    let user = users::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        email: Set(None),
        role: Set(Role::Fisher),
        phone: Set(Some("0812345678".to_string())),
        village: Set(Some("บ้านท่าอุเทน".to_string())),
        district: Set(None),
        province: Set(None),
        fisher_profile: Set(Some(serde_json::json!({ "photo": "profiles/u.jpg" }))),
        created_at: Set(at(1, 0)),
    };

    Users::insert(user).exec_without_returning(db).await.unwrap();
}

pub async fn insert_species(db: &DatabaseConnection, id: &str, common: &str, local: Option<&str>) {
    let species = fish_species::ActiveModel {
        id: Set(id.to_string()),
        common_name: Set(common.to_string()),
        local_name: Set(local.map(str::to_string)),
        scientific_name: Set(None),
        family: Set(None),
        iucn_status: Set(None),
        image_url: Set(None),
    };

    FishSpecies::insert(species)
        .exec_without_returning(db)
        .await
        .unwrap();
}

pub async fn stored_record(db: &DatabaseConnection, id: &str) -> fishing_records::Model {
    FishingRecords::find_by_id(id.to_string())
        .one(db)
        .await
        .unwrap()
        .unwrap()
}
