use chrono::{DateTime, Utc};
use database::entities::{fishing_records, prelude::*};
use log::debug;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;

use crate::{
    record::{FishingRecord, RawRecord},
    Result,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
    pub total_records: usize,
    /// Sum of the weights reported by the fishers.
    pub total_weight: f64,
    pub total_value: f64,
    pub verified_count: usize,
}

impl RecordStats {
    fn add(&mut self, total_weight: f64, total_value: f64, verified: bool) {
        self.total_records += 1;
        self.total_weight += total_weight;
        self.total_value += total_value;
        if verified {
            self.verified_count += 1;
        }
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FishingRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut stats, record| {
            stats.add(record.total_weight, record.total_value, record.verified);
            stats
        })
    }

    pub fn from_raw<'a>(records: impl IntoIterator<Item = &'a RawRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut stats, record| {
            stats.add(record.total_weight, record.total_value(), record.verified);
            stats
        })
    }
}

/// Aggregate over every stored record matching the optional owner and
/// lower date bound.
pub async fn collection_stats(
    db: &DatabaseConnection,
    min_date: Option<DateTime<Utc>>,
    user_id: Option<&str>,
) -> Result<RecordStats> {
    let mut condition = Condition::all();
    if let Some(min_date) = min_date {
        condition = condition.add(fishing_records::Column::CatchDate.gte(min_date));
    }
    if let Some(user_id) = user_id {
        condition = condition.add(fishing_records::Column::UserId.eq(user_id));
    }

    debug!("Querying records for collection stats");
    let records: Vec<RawRecord> = FishingRecords::find()
        .filter(condition)
        .all(db)
        .await?
        .into_iter()
        .map(RawRecord::from)
        .collect();

    Ok(RecordStats::from_raw(&records))
}
