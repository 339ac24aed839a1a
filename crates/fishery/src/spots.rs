use chrono::{DateTime, Utc};
use database::entities::{fishing_spots, prelude::*};
use log::{debug, info};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotInput {
    pub name: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub village: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
}

struct ValidSpot {
    name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl SpotInput {
    fn validate(&self) -> Result<ValidSpot> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::validation("name", "name is required"))?;

        if let Some(latitude) = self.latitude {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(Error::validation("latitude", "latitude must be within ±90"));
            }
        }
        if let Some(longitude) = self.longitude {
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(Error::validation("longitude", "longitude must be within ±180"));
            }
        }

        Ok(ValidSpot {
            name: name.to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

pub async fn list_spots(db: &DatabaseConnection) -> Result<Vec<fishing_spots::Model>> {
    debug!("Querying fishing spots");
    Ok(FishingSpots::find()
        .order_by_asc(fishing_spots::Column::Name)
        .all(db)
        .await?)
}

pub async fn create_spot(
    db: &DatabaseConnection,
    input: SpotInput,
    now: DateTime<Utc>,
) -> Result<fishing_spots::Model> {
    let valid = input.validate()?;

    let spot = fishing_spots::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(valid.name),
        province: Set(input.province),
        district: Set(input.district),
        village: Set(input.village),
        latitude: Set(valid.latitude),
        longitude: Set(valid.longitude),
        description: Set(input.description),
        created_at: Set(now),
    }
    .insert(db)
    .await?;

    info!("Created fishing spot {}", spot.id);
    Ok(spot)
}

pub async fn replace_spot(
    db: &DatabaseConnection,
    id: &str,
    input: SpotInput,
) -> Result<fishing_spots::Model> {
    let valid = input.validate()?;

    debug!("Querying fishing spot {id}");
    let spot = FishingSpots::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("fishing spot", id))?;

    let mut spot: fishing_spots::ActiveModel = spot.into();
    spot.name = Set(valid.name);
    spot.province = Set(input.province);
    spot.district = Set(input.district);
    spot.village = Set(input.village);
    spot.latitude = Set(valid.latitude);
    spot.longitude = Set(valid.longitude);
    spot.description = Set(input.description);

    Ok(spot.update(db).await?)
}

pub async fn delete_spot(db: &DatabaseConnection, id: &str) -> Result<()> {
    let result = FishingSpots::delete_by_id(id.to_string()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("fishing spot", id));
    }

    info!("Deleted fishing spot {id}");
    Ok(())
}
