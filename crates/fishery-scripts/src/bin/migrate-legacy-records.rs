//! Rewrite every legacy fishing record into the current document layout.
//!
//! Set `DRY_RUN=1` to only report what would change.

#![forbid(unsafe_code)]

use std::env::{self, VarError};

use fishery::legacy::migrate_records;
use log::info;
use miette::{Diagnostic, Result, WrapErr};

#[derive(Debug, thiserror::Error, Diagnostic)]
enum Error {
    #[error("could not prepare database")]
    #[diagnostic(code(migrate_legacy_records::database))]
    Database(#[from] database::Error),

    #[error("could not migrate records")]
    #[diagnostic(code(migrate_legacy_records::migrate))]
    Migrate(#[from] fishery::Error),

    #[error("env var {name} is not valid unicode")]
    #[diagnostic(code(migrate_legacy_records::env_var))]
    EnvVar {
        source: VarError,
        name: &'static str,
    },

    #[error("env var DRY_RUN has invalid value `{0}`")]
    #[diagnostic(
        code(migrate_legacy_records::dry_run),
        help("use 1, true, yes, 0, false or no")
    )]
    DryRun(String),
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init_timed();
    dotenvy::dotenv().ok();

    run().await.wrap_err("failed to migrate legacy records")
}

async fn run() -> Result<(), Error> {
    let dry_run = match env_var("DRY_RUN")? {
        Some(value) => parse_flag(&value).ok_or(Error::DryRun(value))?,
        None => false,
    };

    info!("Connecting to database");
    let db = database::connection().await?;
    database::migrate(&db).await?;

    let report = migrate_records(&db, dry_run).await?;
    if dry_run {
        info!(
            "Dry run: {} of {} records would be migrated",
            report.migrated, report.scanned
        );
    } else {
        info!(
            "Migrated {} of {} records",
            report.migrated, report.scanned
        );
    }

    Ok(())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" => Some(false),
        "1" | "true" | "yes" => Some(true),
        _ => None,
    }
}

#[inline]
fn env_var(name: &'static str) -> Result<Option<String>, Error> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(source) => Err(Error::EnvVar { source, name }),
    }
}
