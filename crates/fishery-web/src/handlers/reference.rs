use fishery::{distribution::fish_distribution, species::list_species};
use log::debug;
use serde::Deserialize;
use serde_json::json;

use super::{number, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DistributionQuery {
    limit: Option<String>,
}

pub async fn distribution(query: DistributionQuery, state: AppState) -> ApiResult {
    debug!("GET /fish-distribution {query:?}");

    let limit = number(query.limit, "limit")?;
    let points = fish_distribution(&state.db, limit).await?;

    Ok(warp::reply::json(&json!({ "success": true, "data": points })))
}

pub async fn species(state: AppState) -> ApiResult {
    debug!("GET /fish-species");

    let species = list_species(&state.db).await?;

    Ok(warp::reply::json(&json!({ "success": true, "data": species })))
}
