use chrono::Utc;
use fishery::payments::{self, NewPayment};
use log::debug;
use serde::Deserialize;
use serde_json::json;

use super::{present, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    user_id: Option<String>,
}

pub async fn create(payment: NewPayment, state: AppState) -> ApiResult {
    debug!("POST /payments {payment:?}");

    let payment = payments::create_payment(&state.db, payment, Utc::now()).await?;

    Ok(warp::reply::json(&json!({ "success": true, "payment": payment })))
}

pub async fn cancel(id: String, state: AppState) -> ApiResult {
    debug!("DELETE /payments/{id}");

    let cancelled = payments::cancel_payment(&state.db, &id, Utc::now()).await?;

    Ok(warp::reply::json(&json!({
        "success": true,
        "id": cancelled.id,
        "revertedRecords": cancelled.reverted_records,
    })))
}

pub async fn list(query: ListQuery, state: AppState) -> ApiResult {
    debug!("GET /payments {query:?}");

    let user_id = present(query.user_id);
    let payments = payments::list_payments(&state.db, user_id.as_deref()).await?;

    Ok(warp::reply::json(&json!({ "success": true, "data": payments })))
}

pub async fn get(id: String, state: AppState) -> ApiResult {
    debug!("GET /payments/{id}");

    let payment = payments::get_payment(&state.db, &id).await?;

    Ok(warp::reply::json(&json!({ "success": true, "payment": payment })))
}
