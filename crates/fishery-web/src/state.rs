use std::{convert::Infallible, sync::Arc};

use chrono::{DateTime, FixedOffset, Utc};
use fishery::photos::PhotoStore;
use sea_orm::DatabaseConnection;
use warp::Filter;

/// Handles shared by every request. Holds no request data.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub photos: Arc<dyn PhotoStore>,
    pub utc_offset: FixedOffset,
}

impl AppState {
    pub fn new(db: DatabaseConnection, photos: Arc<dyn PhotoStore>, utc_offset: FixedOffset) -> Self {
        Self {
            db,
            photos,
            utc_offset,
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.utc_offset)
    }
}

pub fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
