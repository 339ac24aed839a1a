//! Record filtering.
//!
//! Filtering runs in two passes. [`RecordFilter::storage_condition`] narrows
//! the fetch by owner, verification flag and the lower date bound, which the
//! database can evaluate on its columns. [`RecordFilter::apply`] then runs
//! over the normalized records and checks every predicate, including the
//! search term and province which only exist after normalization.

use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use database::entities::fishing_records;
use sea_orm::{ColumnTrait, Condition};

use crate::{record::FishingRecord, Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerifiedStatus {
    #[default]
    All,
    Verified,
    Unverified,
}

impl VerifiedStatus {
    fn flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Verified => Some(true),
            Self::Unverified => Some(false),
        }
    }
}

impl FromStr for VerifiedStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "verified" | "true" => Ok(Self::Verified),
            "unverified" | "false" => Ok(Self::Unverified),
            other => Err(Error::validation(
                "verified",
                format!("Unknown verification status `{other}`"),
            )),
        }
    }
}

/// Lower bound relative to the time of the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    /// Since local midnight.
    Today,
    Week,
    Month,
}

impl DateFilter {
    pub fn lower_bound(self, now: DateTime<FixedOffset>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Today => {
                let midnight = now.date_naive().and_hms_opt(0, 0, 0)?;
                let local = now.offset().from_local_datetime(&midnight).single()?;
                Some(local.with_timezone(&Utc))
            }
            Self::Week => Some((now - Duration::days(7)).with_timezone(&Utc)),
            Self::Month => Some((now - Duration::days(30)).with_timezone(&Utc)),
        }
    }
}

impl FromStr for DateFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(Error::validation(
                "dateFilter",
                format!("Unknown date filter `{other}`"),
            )),
        }
    }
}

/// Parse `minDate`, either RFC 3339 or a bare date taken as local midnight.
pub fn parse_min_date(value: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| offset.from_local_datetime(&midnight).single())
        .map(|date| date.with_timezone(&Utc))
        .ok_or_else(|| Error::validation("minDate", format!("Invalid date `{value}`")))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub search_term: Option<String>,
    pub province: Option<String>,
    pub user_id: Option<String>,
    pub verified: VerifiedStatus,
    pub date: DateFilter,
    pub min_date: Option<DateTime<Utc>>,
}

impl RecordFilter {
    /// The later of the relative and the absolute lower bound.
    pub fn lower_bound(&self, now: DateTime<FixedOffset>) -> Option<DateTime<Utc>> {
        match (self.date.lower_bound(now), self.min_date) {
            (Some(relative), Some(absolute)) => Some(relative.max(absolute)),
            (relative, absolute) => relative.or(absolute),
        }
    }

    pub fn storage_condition(&self, now: DateTime<FixedOffset>) -> Condition {
        let mut condition = Condition::all();

        if let Some(user_id) = &self.user_id {
            condition = condition.add(fishing_records::Column::UserId.eq(user_id.clone()));
        }
        if let Some(verified) = self.verified.flag() {
            condition = condition.add(fishing_records::Column::Verified.eq(verified));
        }
        if let Some(bound) = self.lower_bound(now) {
            condition = condition.add(fishing_records::Column::CatchDate.gte(bound));
        }

        condition
    }

    pub fn apply(&self, records: Vec<FishingRecord>, now: DateTime<FixedOffset>) -> Vec<FishingRecord> {
        let bound = self.lower_bound(now);
        records
            .into_iter()
            .filter(|record| self.matches(record, bound))
            .collect()
    }

    fn matches(&self, record: &FishingRecord, bound: Option<DateTime<Utc>>) -> bool {
        if let Some(user_id) = &self.user_id {
            if record.user_id.as_ref() != Some(user_id) {
                return false;
            }
        }

        if let Some(verified) = self.verified.flag() {
            if record.verified != verified {
                return false;
            }
        }

        if let Some(bound) = bound {
            match record.catch_date {
                Some(date) if date >= bound => {}
                _ => return false,
            }
        }

        if let Some(province) = active(&self.province).filter(|p| *p != "all") {
            if !record
                .location
                .province
                .to_lowercase()
                .contains(&province.to_lowercase())
            {
                return false;
            }
        }

        if let Some(term) = active(&self.search_term) {
            let term = term.to_lowercase();
            let hit = |text: &str| text.to_lowercase().contains(&term);

            if !(hit(&record.fisher_name)
                || hit(&record.location.province)
                || hit(&record.location.spot_name)
                || record.fish_list.iter().any(|entry| hit(&entry.name)))
            {
                return false;
            }
        }

        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
