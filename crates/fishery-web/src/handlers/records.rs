use chrono::Utc;
use fishery::{
    filter::{parse_min_date, DateFilter, RecordFilter, VerifiedStatus},
    pagination::PageRequest,
    query::{query_records, RecordQuery},
    records::{self, NewRecord, RecordEdit},
    stats::collection_stats,
};
use log::debug;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{number, present, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    search: Option<String>,
    province: Option<String>,
    verified: Option<String>,
    date_filter: Option<String>,
    user_id: Option<String>,
    page: Option<String>,
    limit: Option<String>,
    min_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    min_date: Option<String>,
    user_id: Option<String>,
}

pub async fn list(query: ListQuery, state: AppState) -> ApiResult {
    debug!("GET /fishing-records {query:?}");

    let filter = RecordFilter {
        search_term: present(query.search),
        province: present(query.province),
        user_id: present(query.user_id),
        verified: query
            .verified
            .as_deref()
            .unwrap_or_default()
            .parse::<VerifiedStatus>()?,
        date: query
            .date_filter
            .as_deref()
            .unwrap_or_default()
            .parse::<DateFilter>()?,
        min_date: present(query.min_date)
            .map(|date| parse_min_date(&date, state.utc_offset))
            .transpose()?,
    };
    let page = PageRequest::new(number(query.page, "page")?, number(query.limit, "limit")?)?;
    let query = RecordQuery { filter, page };

    let page = query_records(&state.db, &query, state.now()).await?;

    Ok(warp::reply::json(&json!({
        "success": true,
        "data": page.data,
        "stats": page.stats,
        "pagination": page.pagination,
    })))
}

pub async fn stats(query: StatsQuery, state: AppState) -> ApiResult {
    debug!("GET /fishing-records/stats {query:?}");

    let min_date = present(query.min_date)
        .map(|date| parse_min_date(&date, state.utc_offset))
        .transpose()?;
    let user_id = present(query.user_id);

    let stats = collection_stats(&state.db, min_date, user_id.as_deref()).await?;

    Ok(warp::reply::json(&json!({ "success": true, "stats": stats })))
}

pub async fn create(record: NewRecord, state: AppState) -> ApiResult {
    debug!("POST /fishing-records");

    let id = records::create_record(&state.db, record, Utc::now()).await?;

    Ok(warp::reply::json(&json!({ "success": true, "id": id })))
}

pub async fn get(id: String, state: AppState) -> ApiResult {
    debug!("GET /fishing-records/{id}");

    let record = records::get_record(&state.db, &id).await?;

    Ok(warp::reply::json(&json!({ "success": true, "data": record })))
}

pub async fn replace(id: String, edit: RecordEdit, state: AppState) -> ApiResult {
    debug!("PUT /fishing-records/{id}");

    let record = records::replace_record(&state.db, &id, edit, Utc::now()).await?;

    Ok(warp::reply::json(&json!({ "success": true, "data": record })))
}

pub async fn patch(id: String, patch: Map<String, Value>, state: AppState) -> ApiResult {
    debug!("PATCH /fishing-records/{id}");

    let record = records::patch_record(&state.db, &id, patch, Utc::now()).await?;

    Ok(warp::reply::json(&json!({ "success": true, "data": record })))
}

pub async fn delete(id: String, state: AppState) -> ApiResult {
    debug!("DELETE /fishing-records/{id}");

    let deleted = records::delete_record(&state.db, state.photos.as_ref(), &id).await?;

    Ok(warp::reply::json(&json!({
        "success": true,
        "id": deleted.id,
        "photos": deleted.photos,
    })))
}
