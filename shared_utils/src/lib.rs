//! Helpers shared by the connector crates: environment lookup, tracing setup
//! and the sleep seam used for rate limiting and backoff.

pub mod env;
pub mod logging;
pub mod sleep;
pub mod text;
