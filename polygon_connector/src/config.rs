//! Runtime configuration for the market-data connector.

use std::time::Duration;

use secrecy::SecretString;
use shared_utils::env::{ConfigError, ProcessEnv, VarSource, optional_or, required};

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DB_NAME: &str = "etl_db";

/// How [`RetryingClient`](crate::requests::retry::RetryingClient) treats
/// failed requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first one.
    pub max_attempts: u32,
    /// Wait after the first 5xx or transport failure.
    pub initial_backoff: Duration,
    /// Multiplier applied to the backoff after each 5xx or transport failure.
    pub backoff_factor: u32,
    /// Fixed wait after a 429. The free tier allows 5 requests per minute.
    pub rate_limit_cooldown: Duration,
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(1),
            backoff_factor: 2,
            rate_limit_cooldown: Duration::from_secs(12),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
pub struct PolygonConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub retry: RetryPolicy,
}

impl PolygonConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(src: &impl VarSource) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: SecretString::new(required(src, "POLYGON_API_KEY")?.into()),
            base_url: optional_or(src, "POLYGON_BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            mongo_uri: optional_or(src, "MONGO_URI", DEFAULT_MONGO_URI),
            mongo_db: optional_or(src, "MONGO_DB", DEFAULT_DB_NAME),
            retry: RetryPolicy::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn only_the_api_key_is_required() {
        let src = HashMap::from([("POLYGON_API_KEY", "abc")]);
        let cfg = PolygonConfig::from_source(&src).unwrap();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.mongo_uri, DEFAULT_MONGO_URI);
        assert_eq!(cfg.mongo_db, DEFAULT_DB_NAME);
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.rate_limit_cooldown, Duration::from_secs(12));
    }

    #[test]
    fn missing_api_key_is_reported() {
        let src: HashMap<&str, &str> = HashMap::new();
        let err = PolygonConfig::from_source(&src).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("POLYGON_API_KEY".into()));
    }
}
