//! Stored and canonical shapes of a fishing record.
//!
//! The mobile client has written records in two layouts over time. Current
//! records nest the place of the catch under `location` and list the catch
//! under `fishList`; legacy records keep `spotName`, `province` and friends
//! at the top level and list the catch under `fishData`. Both live in the
//! same table, so every read goes through [`RawRecord`], which keeps the two
//! shapes apart until [`RawLocation::resolve`] and [`FishListSource`] pick
//! the value to use.

use chrono::{DateTime, Utc};
use database::entities::fishing_records;
use serde::Serialize;
use serde_json::{Map, Value};

/// Placeholder for a fisher whose profile could not be found.
pub const UNSPECIFIED_NAME: &str = "ไม่ระบุชื่อ";
/// Placeholder for any other missing text field.
pub const UNSPECIFIED: &str = "ไม่ระบุ";

/// Parse a number out of a JSON value, falling back to zero.
///
/// Numbers and numeric strings are accepted, anything else (including
/// `NaN` and infinities) becomes `0.0`.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Like [`coerce_number`] but keeps absence distinct from zero.
fn optional_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Non-empty text. Numbers are rendered, blank strings count as missing.
fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub province: Option<String>,
    pub district: Option<String>,
    pub village: Option<String>,
    pub spot_name: Option<String>,
    pub water_source: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Address {
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            province: text(object.get("province")),
            district: text(object.get("district")),
            village: text(object.get("village")),
            spot_name: text(object.get("spotName")),
            water_source: text(object.get("waterSource")),
            latitude: optional_number(object.get("latitude")),
            longitude: optional_number(object.get("longitude")),
        }
    }
}

/// Whether `value` would resolve as the location field `key`.
///
/// Coordinates must be numbers, everything else non-blank text.
pub fn location_field_is_set(key: &str, value: Option<&Value>) -> bool {
    match key {
        "latitude" | "longitude" => optional_number(value).is_some(),
        _ => text(value).is_some(),
    }
}

/// Both location layouts a stored record may carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLocation {
    /// The `location` object of current records.
    pub nested: Option<Address>,
    /// Top-level keys of legacy records.
    pub flat: Address,
}

impl RawLocation {
    fn from_document(document: &Map<String, Value>) -> Self {
        Self {
            nested: document
                .get("location")
                .and_then(Value::as_object)
                .map(Address::from_object),
            flat: Address::from_object(document),
        }
    }

    /// Resolve every field nested first, then flat, then [`UNSPECIFIED`].
    pub fn resolve(&self) -> Location {
        let nested = self.nested.as_ref();
        let text = |field: fn(&Address) -> &Option<String>| {
            nested
                .and_then(|address| field(address).clone())
                .or_else(|| field(&self.flat).clone())
                .unwrap_or_else(|| UNSPECIFIED.to_string())
        };
        let coordinate = |field: fn(&Address) -> Option<f64>| {
            nested.and_then(field).or_else(|| field(&self.flat))
        };

        Location {
            province: text(|a| &a.province),
            district: text(|a| &a.district),
            village: text(|a| &a.village),
            spot_name: text(|a| &a.spot_name),
            water_source: text(|a| &a.water_source),
            latitude: coordinate(|a| a.latitude),
            longitude: coordinate(|a| a.longitude),
        }
    }
}

/// One line of the catch as stored, numbers already coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFishEntry {
    pub name: String,
    pub count: f64,
    pub weight: f64,
    pub price: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub photo: Option<String>,
}

impl RawFishEntry {
    fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let entry = value.as_object().unwrap_or(&empty);

        Self {
            name: text(entry.get("name"))
                .or_else(|| text(entry.get("species")))
                .or_else(|| text(entry.get("fishName")))
                .unwrap_or_else(|| UNSPECIFIED.to_string()),
            count: coerce_number(entry.get("count")),
            weight: coerce_number(entry.get("weight")),
            price: coerce_number(entry.get("price")),
            min_length: coerce_number(entry.get("minLength")),
            max_length: coerce_number(entry.get("maxLength")),
            photo: text(entry.get("photo")),
        }
    }

    pub fn total_value(&self) -> f64 {
        self.price * self.count
    }
}

/// Where the fish list of a stored record came from.
#[derive(Debug, Clone, PartialEq)]
pub enum FishListSource {
    /// `fishList`, written by current clients.
    Current(Vec<RawFishEntry>),
    /// `fishData`, written by legacy clients.
    Legacy(Vec<RawFishEntry>),
    Missing,
}

impl FishListSource {
    fn from_document(document: &Map<String, Value>) -> Self {
        let entries =
            |list: &Vec<Value>| list.iter().map(RawFishEntry::from_value).collect::<Vec<_>>();

        if let Some(list) = document.get("fishList").and_then(Value::as_array) {
            Self::Current(entries(list))
        } else if let Some(list) = document.get("fishData").and_then(Value::as_array) {
            Self::Legacy(entries(list))
        } else {
            Self::Missing
        }
    }

    pub fn entries(&self) -> &[RawFishEntry] {
        match self {
            Self::Current(entries) | Self::Legacy(entries) => entries,
            Self::Missing => &[],
        }
    }
}

/// A stored fishing record before any joins.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub catch_date: Option<DateTime<Utc>>,
    pub verified: bool,
    pub is_paid: bool,
    pub payment_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_amount: Option<f64>,
    pub location: RawLocation,
    pub fish: FishListSource,
    /// `totalWeight` as the client reported it.
    pub total_weight: f64,
    pub weather: Option<String>,
    pub water_level: Option<String>,
    pub fishing_gear: Option<Value>,
    pub notes: Option<String>,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawRecord {
    /// Sum of `price × count` over the catch. Stored totals are never used.
    pub fn total_value(&self) -> f64 {
        self.fish.entries().iter().map(RawFishEntry::total_value).sum()
    }

    /// Every photo reference of the record, record level first, without duplicates.
    pub fn photo_references(&self) -> Vec<String> {
        let mut references: Vec<String> = Vec::new();
        let entry_photos = self.fish.entries().iter().filter_map(|e| e.photo.clone());

        for reference in self.photos.iter().cloned().chain(entry_photos) {
            if !references.contains(&reference) {
                references.push(reference);
            }
        }

        references
    }
}

impl From<fishing_records::Model> for RawRecord {
    fn from(record: fishing_records::Model) -> Self {
        let empty = Map::new();
        let document = record.data.as_object().unwrap_or(&empty);

        Self {
            location: RawLocation::from_document(document),
            fish: FishListSource::from_document(document),
            total_weight: coerce_number(document.get("totalWeight")),
            weather: text(document.get("weather")),
            water_level: text(document.get("waterLevel")),
            fishing_gear: document
                .get("fishingGear")
                .filter(|gear| !gear.is_null())
                .cloned(),
            notes: text(document.get("notes")),
            photos: document
                .get("photos")
                .and_then(Value::as_array)
                .map(|photos| photos.iter().filter_map(|p| text(Some(p))).collect())
                .unwrap_or_default(),
            id: record.id,
            user_id: record.user_id,
            catch_date: record.catch_date,
            verified: record.verified,
            is_paid: record.is_paid,
            payment_id: record.payment_id,
            payment_date: record.payment_date,
            payment_amount: record.payment_amount,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub province: String,
    pub district: String,
    pub village: String,
    pub spot_name: String,
    pub water_source: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FishEntry {
    pub name: String,
    pub local_name: Option<String>,
    pub count: f64,
    pub weight: f64,
    pub price: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub total_value: f64,
    pub photo: Option<String>,
}

/// The record shape handed to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FishingRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub fisher_name: String,
    pub fisher_phone: String,
    pub fisher_village: String,
    pub fisher_photo: Option<String>,
    pub catch_date: Option<DateTime<Utc>>,
    pub location: Location,
    pub fish_list: Vec<FishEntry>,
    pub total_weight: f64,
    pub total_value: f64,
    pub weather: Option<String>,
    pub water_level: Option<String>,
    pub fishing_gear: Option<Value>,
    pub notes: Option<String>,
    pub photos: Vec<String>,
    pub verified: bool,
    pub is_paid: bool,
    pub payment_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
