use std::str::FromStr;

use warp::reply::{Json, Reply, Response};

use crate::error::ApiError;

pub mod payments;
pub mod records;
pub mod reference;
pub mod spots;

pub type ApiResult = Result<Json, ApiError>;

pub fn reply(result: ApiResult) -> Response {
    match result {
        Ok(json) => json.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Empty query values count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A whole-number query value. Empty counts as absent.
fn number<T: FromStr>(value: Option<String>, field: &str) -> Result<Option<T>, fishery::Error> {
    present(value)
        .map(|value| {
            value.trim().parse().map_err(|_| {
                fishery::Error::validation(field, format!("{field} must be a whole number"))
            })
        })
        .transpose()
}
