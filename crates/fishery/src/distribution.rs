use chrono::{DateTime, Utc};
use database::entities::{fishing_records, prelude::*};
use log::debug;
use rand::Rng;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use serde::Serialize;

use crate::{record::RawRecord, species::SpeciesIndex, Result};

pub const DEFAULT_LIMIT: u64 = 100;
/// Largest offset, in degrees, added to each coordinate.
pub const JITTER: f64 = 0.005;

/// One fish entry placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FishPoint {
    pub id: String,
    pub record_id: String,
    pub species: String,
    pub local_name: Option<String>,
    pub count: f64,
    pub weight: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub province: String,
    pub catch_date: Option<DateTime<Utc>>,
}

/// One point per fish entry, each nudged by up to [`JITTER`] degrees so
/// entries of the same record do not stack on the map.
pub fn explode(records: &[RawRecord], species: &SpeciesIndex, rng: &mut impl Rng) -> Vec<FishPoint> {
    let mut points = Vec::new();

    for record in records {
        let location = record.location.resolve();
        let (Some(latitude), Some(longitude)) = (location.latitude, location.longitude) else {
            continue;
        };

        for (index, entry) in record.fish.entries().iter().enumerate() {
            points.push(FishPoint {
                id: format!("{}-{index}", record.id),
                record_id: record.id.clone(),
                species: entry.name.clone(),
                local_name: species.local_name(&entry.name).map(str::to_string),
                count: entry.count,
                weight: entry.weight,
                latitude: latitude + rng.gen_range(-JITTER..=JITTER),
                longitude: longitude + rng.gen_range(-JITTER..=JITTER),
                province: location.province.clone(),
                catch_date: record.catch_date,
            });
        }
    }

    points
}

async fn recent_records(db: &DatabaseConnection, limit: u64) -> Result<Vec<RawRecord>> {
    debug!("Querying {limit} fishing records for distribution");
    Ok(FishingRecords::find()
        .order_by_desc(fishing_records::Column::CatchDate)
        .order_by_asc(fishing_records::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(RawRecord::from)
        .collect())
}

/// Map points for the most recent `limit` records.
pub async fn fish_distribution(db: &DatabaseConnection, limit: Option<u64>) -> Result<Vec<FishPoint>> {
    let limit = limit.filter(|limit| *limit > 0).unwrap_or(DEFAULT_LIMIT);

    let (species, records) =
        tokio::try_join!(SpeciesIndex::fetch(db), recent_records(db, limit))?;

    Ok(explode(&records, &species, &mut rand::thread_rng()))
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;

    use super::*;
    use crate::{
        record::UNSPECIFIED,
        testing::{at, db, insert_record, record_model},
    };

    fn raw(id: &str, data: serde_json::Value) -> RawRecord {
        RawRecord::from(record_model(id, data))
    }

    #[test]
    fn one_point_per_entry_within_jitter() {
        let records = [raw(
            "r1",
            json!({
                "location": { "latitude": 17.4, "longitude": 104.7, "province": "นครพนม" },
                "fishList": [{ "name": "a", "count": 2 }, { "name": "b", "count": 1, "weight": 0.4 }]
            }),
        )];

        let points = explode(&records, &SpeciesIndex::default(), &mut StdRng::seed_from_u64(7));

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id, "r1-0");
        assert_eq!(points[1].species, "b");
        assert_eq!(points[1].weight, 0.4);
        for point in &points {
            assert_eq!(point.record_id, "r1");
            assert_eq!(point.province, "นครพนม");
            assert!((point.latitude - 17.4).abs() <= JITTER);
            assert!((point.longitude - 104.7).abs() <= JITTER);
        }
    }

    #[test]
    fn skips_records_without_coordinates() {
        let records = [
            raw("r1", json!({ "latitude": 17.0, "fishData": [{ "species": "a" }] })),
            raw("r2", json!({ "spotName": "x", "fishList": [{ "name": "a" }] })),
            raw("r3", json!({ "latitude": 15.2, "longitude": "104.8", "fishData": [{ "fishName": "c" }] })),
        ];

        let points = explode(&records, &SpeciesIndex::default(), &mut StdRng::seed_from_u64(1));

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].record_id, "r3");
        assert_eq!(points[0].species, "c");
        assert_eq!(points[0].province, UNSPECIFIED);
    }

    #[tokio::test]
    async fn limits_to_most_recent_records() {
        let db = db().await;
        for day in 1..=5 {
            insert_record(
                &db,
                &format!("r{day}"),
                None,
                Some(at(day, 0)),
                false,
                json!({ "latitude": 17.0, "longitude": 104.0, "fishList": [{ "name": "a" }] }),
            )
            .await;
        }

        let points = fish_distribution(&db, Some(2)).await.unwrap();

        let mut ids: Vec<_> = points.iter().map(|p| p.record_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["r4", "r5"]);
        assert_eq!(fish_distribution(&db, None).await.unwrap().len(), 5);
    }
}
