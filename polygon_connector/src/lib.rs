//! Polygon.io aggregates connector.
//!
//! Fetches the bars of one ticker over a day range, following pagination
//! cursors and retrying rate limits and server errors, then writes them into
//! a per-ticker collection guarded by a `(ticker, date)` unique index, so
//! rerunning an overlapping range only adds the new days.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod requests;

pub use pipeline::{RunOutcome, RunParams, collection_name, run};
