//! AlienVault OTX indicator connector.
//!
//! Looks up a list of IPv4 addresses at OTX, wraps each response with the
//! address and an ingestion timestamp, and inserts it into a document store.
//! Addresses OTX does not know (HTTP 404) are skipped without touching the
//! store; any other failure is recorded for that address only.

pub mod config;
pub mod errors;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod providers;

pub use pipeline::{IndicatorPipeline, ItemOutcome, RunSummary};
