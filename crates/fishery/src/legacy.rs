//! Rewriting legacy record documents into the current layout.

use database::entities::{fishing_records, prelude::*};
use log::{debug, info};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde_json::{Map, Value};

use crate::{record::location_field_is_set, Result};

/// Top-level keys legacy clients used for the place of the catch.
const FLAT_LOCATION_KEYS: [&str; 7] = [
    "province",
    "district",
    "village",
    "spotName",
    "waterSource",
    "latitude",
    "longitude",
];

/// Move flat location keys under `location` and rename `fishData` to
/// `fishList`. A nested value is kept unless it is blank, null or not a
/// number where one is expected, in which case the flat value replaces it.
///
/// Returns whether the document changed.
pub fn migrate_document(document: &mut Value) -> bool {
    let Some(document) = document.as_object_mut() else {
        return false;
    };

    let mut changed = false;

    let has_flat = FLAT_LOCATION_KEYS.iter().any(|key| document.contains_key(*key));
    let location_is_object = document
        .get("location")
        .map_or(true, |location| location.is_object() || location.is_null());

    if has_flat && location_is_object {
        let mut location = match document.remove("location") {
            Some(Value::Object(location)) => location,
            _ => Map::new(),
        };

        for key in FLAT_LOCATION_KEYS {
            let Some(value) = document.remove(key) else {
                continue;
            };

            if location_field_is_set(key, location.get(key)) {
                continue;
            }
            if location_field_is_set(key, Some(&value)) || !location.contains_key(key) {
                location.insert(key.to_string(), value);
            }
        }

        document.insert("location".to_string(), Value::Object(location));
        changed = true;
    }

    if !document.contains_key("fishList") {
        if let Some(fish) = document.remove("fishData") {
            document.insert("fishList".to_string(), fish);
            changed = true;
        }
    }

    changed
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub scanned: usize,
    pub migrated: usize,
}

/// Apply [`migrate_document`] to every stored record.
///
/// With `dry_run` nothing is written, the report still counts the records
/// that would change.
pub async fn migrate_records(db: &DatabaseConnection, dry_run: bool) -> Result<MigrationReport> {
    debug!("Querying all fishing records");
    let records = FishingRecords::find().all(db).await?;
    let mut report = MigrationReport {
        scanned: records.len(),
        migrated: 0,
    };

    for record in records {
        let mut data = record.data.clone();
        if !migrate_document(&mut data) {
            continue;
        }

        report.migrated += 1;
        if dry_run {
            info!("Would migrate record {}", record.id);
            continue;
        }

        debug!("Migrating record {}", record.id);
        let mut record: fishing_records::ActiveModel = record.into();
        record.data = Set(data);
        record.update(db).await?;
    }

    Ok(report)
}
