//! Single-record reads and staff edits.

use chrono::{DateTime, Utc};
use database::entities::{fishing_records, prelude::*};
use log::{debug, info};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    normalize::normalize,
    photos::{delete_photos, PhotoOutcome, PhotoStore},
    record::{FishingRecord, RawRecord},
    species::SpeciesIndex,
    users::UserDirectory,
    Error, Result,
};

/// Keys only the payment bookkeeping may write.
const PAYMENT_KEYS: [&str; 4] = ["isPaid", "paymentId", "paymentDate", "paymentAmount"];

/// A record as submitted by the mobile client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub user_id: Option<String>,
    pub catch_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verified: bool,
    /// Everything else, stored as the record document.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// The fields staff may set on a record. Absent fields are cleared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEdit {
    #[serde(default)]
    pub verified: bool,
    pub notes: Option<String>,
    pub weather: Option<String>,
    pub water_level: Option<String>,
    pub fishing_gear: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedRecord {
    pub id: String,
    pub photos: Vec<PhotoOutcome>,
}

fn reject_reserved<'a>(keys: impl IntoIterator<Item = &'a String>, reserved: &[&str]) -> Result<()> {
    match keys.into_iter().find(|key| reserved.contains(&key.as_str())) {
        Some(key) => Err(Error::validation(
            key.as_str(),
            format!("{key} cannot be set on a fishing record"),
        )),
        None => Ok(()),
    }
}

async fn find(db: &DatabaseConnection, id: &str) -> Result<fishing_records::Model> {
    debug!("Querying fishing record {id}");
    FishingRecords::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("fishing record", id))
}

fn document(record: &fishing_records::Model) -> Result<Map<String, Value>> {
    match &record.data {
        Value::Object(document) => Ok(document.clone()),
        _ => Err(Error::Document {
            kind: "fishing record",
            id: record.id.clone(),
        }),
    }
}

async fn enrich(db: &DatabaseConnection, record: fishing_records::Model) -> Result<FishingRecord> {
    let raw = RawRecord::from(record);
    let species = SpeciesIndex::fetch(db).await?;
    let users = UserDirectory::fetch(db, raw.user_id.as_deref()).await;

    Ok(normalize(&raw, &species, &users))
}

pub async fn get_record(db: &DatabaseConnection, id: &str) -> Result<FishingRecord> {
    enrich(db, find(db, id).await?).await
}

/// Store a submitted record under a fresh ID.
pub async fn create_record(
    db: &DatabaseConnection,
    record: NewRecord,
    now: DateTime<Utc>,
) -> Result<String> {
    let mut reserved = vec!["id"];
    reserved.extend(PAYMENT_KEYS);
    reject_reserved(record.data.keys(), &reserved)?;

    let id = Uuid::new_v4().to_string();
    FishingRecords::insert(fishing_records::ActiveModel {
        id: Set(id.clone()),
        user_id: Set(record.user_id.filter(|user_id| !user_id.trim().is_empty())),
        catch_date: Set(record.catch_date),
        verified: Set(record.verified),
        is_paid: Set(false),
        payment_id: Set(None),
        payment_date: Set(None),
        payment_amount: Set(None),
        data: Set(Value::Object(record.data)),
        created_at: Set(now),
        updated_at: Set(None),
    })
    .exec_without_returning(db)
    .await?;

    info!("Created fishing record {id}");
    Ok(id)
}

/// Overwrite the staff-editable fields of a record.
pub async fn replace_record(
    db: &DatabaseConnection,
    id: &str,
    edit: RecordEdit,
    now: DateTime<Utc>,
) -> Result<FishingRecord> {
    let record = find(db, id).await?;
    let mut document = document(&record)?;

    let fields = [
        ("notes", edit.notes.map(Value::String)),
        ("weather", edit.weather.map(Value::String)),
        ("waterLevel", edit.water_level.map(Value::String)),
        ("fishingGear", edit.fishing_gear.filter(|gear| !gear.is_null())),
    ];
    for (key, value) in fields {
        match value {
            Some(value) => document.insert(key.to_string(), value),
            None => document.remove(key),
        };
    }

    let mut active: fishing_records::ActiveModel = record.into();
    active.verified = Set(edit.verified);
    active.data = Set(Value::Object(document));
    active.updated_at = Set(Some(now));

    debug!("Replacing fishing record {id}");
    let record = active.update(db).await?;
    enrich(db, record).await
}

/// Merge top-level keys into a record.
///
/// `verified` and `catchDate` update their columns, any other key is merged
/// into the stored document.
pub async fn patch_record(
    db: &DatabaseConnection,
    id: &str,
    patch: Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<FishingRecord> {
    let mut reserved = vec!["id", "userId"];
    reserved.extend(PAYMENT_KEYS);
    reject_reserved(patch.keys(), &reserved)?;

    let record = find(db, id).await?;
    let mut document = document(&record)?;
    let mut active: fishing_records::ActiveModel = record.into();

    for (key, value) in patch {
        match key.as_str() {
            "verified" => {
                let verified = value
                    .as_bool()
                    .ok_or_else(|| Error::validation("verified", "verified must be a boolean"))?;
                active.verified = Set(verified);
            }
            "catchDate" => {
                let catch_date = match value {
                    Value::Null => None,
                    Value::String(date) => Some(
                        DateTime::parse_from_rfc3339(&date)
                            .map_err(|_| {
                                Error::validation("catchDate", format!("Invalid date `{date}`"))
                            })?
                            .with_timezone(&Utc),
                    ),
                    _ => {
                        return Err(Error::validation(
                            "catchDate",
                            "catchDate must be a date string",
                        ))
                    }
                };
                active.catch_date = Set(catch_date);
            }
            _ => {
                document.insert(key, value);
            }
        }
    }

    active.data = Set(Value::Object(document));
    active.updated_at = Set(Some(now));

    debug!("Patching fishing record {id}");
    let record = active.update(db).await?;
    enrich(db, record).await
}

/// Delete a record, then try to delete every photo it references.
///
/// Paid records are refused, their payment has to be cancelled first.
pub async fn delete_record(
    db: &DatabaseConnection,
    photos: &dyn PhotoStore,
    id: &str,
) -> Result<DeletedRecord> {
    let record = find(db, id).await?;
    if record.is_paid {
        return Err(Error::Conflict(format!(
            "Fishing record `{id}` belongs to a payment"
        )));
    }
    let references = RawRecord::from(record).photo_references();

    FishingRecords::delete_by_id(id.to_string()).exec(db).await?;
    info!("Deleted fishing record {id}");

    Ok(DeletedRecord {
        id: id.to_string(),
        photos: delete_photos(photos, &references).await,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::{
        payments::{create_payment, NewPayment},
        photos::LocalPhotoStore,
        testing::{at, db, insert_record, insert_species, stored_record},
    };

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn creates_and_reads_back() {
        let db = db().await;
        insert_species(&db, "s1", "Giant snakehead", Some("ปลาชะโด")).await;
        let record: NewRecord = serde_json::from_value(json!({
            "userId": "u1",
            "catchDate": "2024-03-02T06:00:00+00:00",
            "location": { "province": "นครพนม" },
            "fishList": [{ "name": "Giant snakehead", "count": 2, "price": 120 }],
            "weather": "ฝนตก"
        }))
        .unwrap();

        let id = create_record(&db, record, at(2, 7)).await.unwrap();
        let record = get_record(&db, &id).await.unwrap();

        assert_eq!(record.user_id.as_deref(), Some("u1"));
        assert_eq!(record.catch_date, Some(at(2, 6)));
        assert_eq!(record.location.province, "นครพนม");
        assert_eq!(record.fish_list[0].local_name.as_deref(), Some("ปลาชะโด"));
        assert_eq!(record.total_value, 240.0);
        assert!(!record.is_paid);
        assert!(stored_record(&db, &id).await.data.get("userId").is_none());
    }

    #[test_case("id" ; "id")]
    #[test_case("isPaid" ; "paid flag")]
    #[test_case("paymentId" ; "payment id")]
    #[tokio::test]
    async fn create_rejects_reserved_keys(key: &str) {
        let db = db().await;
        let mut data = Map::new();
        data.insert(key.to_string(), json!("x"));

        let err = create_record(
            &db,
            NewRecord {
                data,
                ..Default::default()
            },
            at(2, 7),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Validation { field, .. } if field == key));
        assert!(FishingRecords::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let db = db().await;

        assert!(matches!(
            get_record(&db, "nope").await,
            Err(Error::NotFound { kind: "fishing record", .. })
        ));
    }

    #[tokio::test]
    async fn replace_sets_and_clears_staff_fields() {
        let db = db().await;
        insert_record(
            &db,
            "r1",
            None,
            None,
            false,
            json!({ "notes": "old", "weather": "แดด", "fishingGear": ["แห"], "totalWeight": 3 }),
        )
        .await;

        let record = replace_record(
            &db,
            "r1",
            RecordEdit {
                verified: true,
                notes: Some("ตรวจแล้ว".to_string()),
                ..Default::default()
            },
            at(3, 0),
        )
        .await
        .unwrap();

        assert!(record.verified);
        assert_eq!(record.notes.as_deref(), Some("ตรวจแล้ว"));
        assert_eq!(record.weather, None);
        assert_eq!(record.fishing_gear, None);
        assert_eq!(record.total_weight, 3.0);
        assert_eq!(record.updated_at, Some(at(3, 0)));
    }

    #[tokio::test]
    async fn patch_merges_keys_and_columns() {
        let db = db().await;
        insert_record(&db, "r1", None, None, false, json!({ "notes": "keep", "weather": "แดด" }))
            .await;

        let record = patch_record(
            &db,
            "r1",
            body(json!({
                "verified": true,
                "catchDate": "2024-03-04T00:00:00Z",
                "weather": "เมฆมาก"
            })),
            at(5, 0),
        )
        .await
        .unwrap();

        assert!(record.verified);
        assert_eq!(record.catch_date, Some(at(4, 0)));
        assert_eq!(record.weather.as_deref(), Some("เมฆมาก"));
        assert_eq!(record.notes.as_deref(), Some("keep"));
        assert!(stored_record(&db, "r1").await.data.get("catchDate").is_none());
    }

    #[test_case(json!({ "userId": "u2" }), "userId" ; "owner")]
    #[test_case(json!({ "paymentAmount": 5 }), "paymentAmount" ; "payment amount")]
    #[test_case(json!({ "verified": "yes" }), "verified" ; "non boolean verified")]
    #[test_case(json!({ "catchDate": "yesterday" }), "catchDate" ; "bad date")]
    #[tokio::test]
    async fn patch_rejects_invalid_keys(patch: Value, field: &str) {
        let db = db().await;
        insert_record(&db, "r1", None, None, false, json!({})).await;

        let err = patch_record(&db, "r1", body(patch), at(5, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation { field: f, .. } if f == field));
        assert_eq!(stored_record(&db, "r1").await.updated_at, None);
    }

    #[tokio::test]
    async fn patch_refuses_malformed_document() {
        let db = db().await;
        insert_record(&db, "r1", None, None, false, json!([1, 2])).await;

        assert!(matches!(
            patch_record(&db, "r1", body(json!({ "notes": "x" })), at(5, 0)).await,
            Err(Error::Document { .. })
        ));
    }

    #[tokio::test]
    async fn delete_removes_row_even_when_photos_fail() {
        let db = db().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("catch.jpg"), b"jpeg").unwrap();
        std::fs::write(dir.path().join("fish.jpg"), b"jpeg").unwrap();
        insert_record(
            &db,
            "r1",
            None,
            None,
            false,
            json!({
                "photos": ["catch.jpg", "gone.jpg"],
                "fishList": [{ "name": "a", "photo": "fish.jpg" }]
            }),
        )
        .await;
        let store = LocalPhotoStore::new(dir.path());

        let deleted = delete_record(&db, &store, "r1").await.unwrap();

        assert!(FishingRecords::find_by_id("r1".to_string())
            .one(&db)
            .await
            .unwrap()
            .is_none());
        let outcomes: Vec<_> = deleted
            .photos
            .iter()
            .map(|p| (p.reference.as_str(), p.deleted))
            .collect();
        assert_eq!(
            outcomes,
            vec![("catch.jpg", true), ("gone.jpg", false), ("fish.jpg", true)]
        );
        assert!(!dir.path().join("fish.jpg").exists());
    }

    #[tokio::test]
    async fn delete_refuses_paid_record() {
        let db = db().await;
        let dir = tempfile::tempdir().unwrap();
        insert_record(&db, "r1", Some("u1"), None, false, json!({})).await;
        create_payment(
            &db,
            NewPayment {
                user_id: Some("u1".to_string()),
                period: Some("2024-03".to_string()),
                record_ids: vec!["r1".to_string()],
                ..Default::default()
            },
            at(6, 0),
        )
        .await
        .unwrap();

        let err = delete_record(&db, &LocalPhotoStore::new(dir.path()), "r1")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Conflict(_)));
        assert!(stored_record(&db, "r1").await.is_paid);
    }
}
