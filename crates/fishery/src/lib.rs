#![forbid(unsafe_code)]
//! Record enrichment, reporting and payment bookkeeping for the river
//! fishery dashboard.
//!
//! Every operation takes the database connection explicitly and keeps no
//! state between calls.

pub mod distribution;
mod error;
pub mod filter;
pub mod legacy;
pub mod normalize;
pub mod pagination;
pub mod payments;
pub mod photos;
pub mod query;
pub mod record;
pub mod records;
pub mod species;
pub mod spots;
pub mod stats;
pub mod users;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
