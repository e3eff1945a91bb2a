//! Runtime configuration for the indicator connector.
//!
//! Read once at startup and handed to the pipeline; nothing downstream
//! touches the environment again.

use std::time::Duration;

use secrecy::SecretString;
use shared_utils::env::{ConfigError, ProcessEnv, VarSource, list_or, optional_or, parse_or, required};

pub const DEFAULT_BASE_URL: &str = "https://otx.alienvault.com/api/v1";
pub const DEFAULT_INDICATORS: &[&str] = &["8.8.8.8", "1.1.1.1"];
pub const DEFAULT_PAUSE_MS: u64 = 1000;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct OtxConfig {
    pub api_key: SecretString,
    pub base_url: String,
    /// IPv4 addresses to look up, in order.
    pub indicators: Vec<String>,
    /// Pause between two consecutive lookups.
    pub pause: Duration,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub collection: String,
}

impl OtxConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(src: &impl VarSource) -> Result<Self, ConfigError> {
        let api_key = SecretString::new(required(src, "OTX_API_KEY")?.into());
        let base_url = optional_or(src, "OTX_BASE_URL", DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let pause_ms = parse_or(src, "OTX_PAUSE_MS", DEFAULT_PAUSE_MS)?;

        Ok(Self {
            api_key,
            base_url,
            indicators: list_or(src, "OTX_INDICATORS", DEFAULT_INDICATORS),
            pause: Duration::from_millis(pause_ms),
            mongo_uri: required(src, "MONGO_URI")?,
            mongo_db: required(src, "MONGO_DB")?,
            collection: required(src, "MONGO_COLLECTION")?,
        })
    }
}
