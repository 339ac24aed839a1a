use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use database::entities::{fishing_records, prelude::*};
use log::debug;
use sea_orm::{Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::{
    filter::RecordFilter,
    normalize::normalize,
    pagination::{paginate, single_page, PageRequest, Pagination},
    record::{FishingRecord, RawRecord},
    species::SpeciesIndex,
    stats::RecordStats,
    users::UserDirectory,
    Result,
};

#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub filter: RecordFilter,
    pub page: PageRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    pub data: Vec<FishingRecord>,
    /// Computed over the whole filtered set, not only this page.
    pub stats: RecordStats,
    pub pagination: Pagination,
}

async fn fetch_records(db: &DatabaseConnection, condition: Condition) -> Result<Vec<RawRecord>> {
    debug!("Querying fishing records");
    Ok(FishingRecords::find()
        .filter(condition)
        .order_by_desc(fishing_records::Column::CatchDate)
        .all(db)
        .await?
        .into_iter()
        .map(RawRecord::from)
        .collect())
}

/// Newest catch first, undated records last, ties by ID.
fn newest_first(a: &FishingRecord, b: &FishingRecord) -> Ordering {
    match (a.catch_date, b.catch_date) {
        (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}

/// Fetch, enrich, filter, aggregate and paginate fishing records.
///
/// A query for a single owner skips pagination and returns the owner's whole
/// history on one page.
pub async fn query_records(
    db: &DatabaseConnection,
    query: &RecordQuery,
    now: DateTime<FixedOffset>,
) -> Result<RecordPage> {
    let filter = &query.filter;

    let (species, raw) = tokio::try_join!(
        SpeciesIndex::fetch(db),
        fetch_records(db, filter.storage_condition(now)),
    )?;
    debug!("Fetched {} records, {} species names", raw.len(), species.len());

    let users = UserDirectory::fetch(db, raw.iter().filter_map(|r| r.user_id.as_deref())).await;

    let mut records: Vec<FishingRecord> = raw
        .iter()
        .map(|record| normalize(record, &species, &users))
        .collect();
    records.sort_by(newest_first);

    let records = filter.apply(records, now);
    let stats = RecordStats::from_records(&records);

    let (data, pagination) = if filter.user_id.is_some() {
        let pagination = single_page(records.len());
        (records, pagination)
    } else {
        paginate(records, query.page)
    };

    Ok(RecordPage {
        data,
        stats,
        pagination,
    })
}
