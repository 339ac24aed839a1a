use std::{
    env::{self, VarError},
    net::SocketAddr,
    path::PathBuf,
};

use chrono::FixedOffset;
use miette::Diagnostic;

const BIND_ADDRESS: &str = "0.0.0.0:3030";
const PHOTO_DIR: &str = "photos";
const UTC_OFFSET_HOURS: i32 = 7;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("env var {name} is not valid unicode")]
    #[diagnostic(code(config::env_var))]
    EnvVar {
        source: VarError,
        name: &'static str,
    },

    #[error("env var {name} has invalid value `{value}`")]
    #[diagnostic(code(config::invalid_value), help("{expected}"))]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub photo_dir: PathBuf,
    /// Offset of the local day used by the `today` filter.
    pub utc_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let bind_address = env_var("BIND_ADDRESS")?.unwrap_or_else(|| BIND_ADDRESS.to_string());
        let bind_address = bind_address
            .parse::<SocketAddr>()
            .map_err(|_| Error::InvalidValue {
                name: "BIND_ADDRESS",
                value: bind_address.clone(),
                expected: "expected a socket address like 0.0.0.0:3030",
            })?;

        let photo_dir = env_var("PHOTO_DIR")?
            .unwrap_or_else(|| PHOTO_DIR.to_string())
            .into();

        let utc_offset = match env_var("UTC_OFFSET_HOURS")? {
            Some(value) => parse_offset(&value).ok_or(Error::InvalidValue {
                name: "UTC_OFFSET_HOURS",
                value,
                expected: "expected whole hours between -12 and 14",
            })?,
            None => hours(UTC_OFFSET_HOURS).ok_or(Error::InvalidValue {
                name: "UTC_OFFSET_HOURS",
                value: UTC_OFFSET_HOURS.to_string(),
                expected: "expected whole hours between -12 and 14",
            })?,
        };

        Ok(Self {
            bind_address,
            photo_dir,
            utc_offset,
        })
    }
}

fn hours(hours: i32) -> Option<FixedOffset> {
    if (-12..=14).contains(&hours) {
        FixedOffset::east_opt(hours * 3600)
    } else {
        None
    }
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    hours(value.trim().parse().ok()?)
}

/// An optional env var. Only a value that is not unicode is an error.
#[inline]
fn env_var(name: &'static str) -> Result<Option<String>, Error> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(source) => Err(Error::EnvVar { source, name }),
    }
}
