use chrono::Utc;
use fishery::spots::{self, SpotInput};
use log::debug;
use serde_json::json;

use super::ApiResult;
use crate::state::AppState;

pub async fn list(state: AppState) -> ApiResult {
    debug!("GET /fishing-spots");

    let spots = spots::list_spots(&state.db).await?;

    Ok(warp::reply::json(&json!({ "success": true, "data": spots })))
}

pub async fn create(input: SpotInput, state: AppState) -> ApiResult {
    debug!("POST /fishing-spots");

    let spot = spots::create_spot(&state.db, input, Utc::now()).await?;

    Ok(warp::reply::json(&json!({ "success": true, "data": spot })))
}

pub async fn replace(id: String, input: SpotInput, state: AppState) -> ApiResult {
    debug!("PUT /fishing-spots/{id}");

    let spot = spots::replace_spot(&state.db, &id, input).await?;

    Ok(warp::reply::json(&json!({ "success": true, "data": spot })))
}

pub async fn delete(id: String, state: AppState) -> ApiResult {
    debug!("DELETE /fishing-spots/{id}");

    spots::delete_spot(&state.db, &id).await?;

    Ok(warp::reply::json(&json!({ "success": true, "id": id })))
}
