use std::convert::Infallible;

use log::{debug, error};
use serde_json::json;
use warp::{
    body::BodyDeserializeError,
    http::StatusCode,
    reject::{InvalidQuery, MethodNotAllowed, PayloadTooLarge, UnsupportedMediaType},
    reply::Response,
    Rejection, Reply,
};

/// A failed operation rendered as `{ success: false, error, field? }`.
#[derive(Debug)]
pub struct ApiError(pub fishery::Error);

impl From<fishery::Error> for ApiError {
    fn from(err: fishery::Error) -> Self {
        Self(err)
    }
}

impl Reply for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            fishery::Error::Validation { .. } => StatusCode::BAD_REQUEST,
            fishery::Error::NotFound { .. } => StatusCode::NOT_FOUND,
            fishery::Error::Conflict(_) => StatusCode::CONFLICT,
            fishery::Error::Database(_) | fishery::Error::Document { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        } else {
            debug!("Request refused: {}", self.0);
        }

        let body = match &self.0 {
            fishery::Error::Validation { field, message } => {
                json!({ "success": false, "error": message, "field": field })
            }
            err => json!({ "success": false, "error": err.to_string() }),
        };

        failure(body, status)
    }
}

fn failure(body: serde_json::Value, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

/// Render rejections in the same shape as [`ApiError`].
pub async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(err) = rejection.find::<BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if let Some(err) = rejection.find::<InvalidQuery>() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if rejection.find::<MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if rejection.find::<PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if rejection.find::<UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected a JSON body".to_string(),
        )
    } else {
        error!("Unhandled rejection: {rejection:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(failure(json!({ "success": false, "error": message }), status))
}
