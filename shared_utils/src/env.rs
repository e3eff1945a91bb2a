use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

/// Errors related to application configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// A variable is set but its value cannot be used.
    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

/// Somewhere configuration values can be looked up by name.
///
/// The process environment is the production source; tests pass a
/// `HashMap` so they never have to mutate global state.
pub trait VarSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl VarSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl VarSource for HashMap<&str, &str> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_string())
    }
}

/// Looks up `name`, treating blank values as unset.
pub fn optional(source: &impl VarSource, name: &str) -> Option<String> {
    source
        .var(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Looks up a variable that must be present and non-blank.
pub fn required(source: &impl VarSource, name: &str) -> Result<String, ConfigError> {
    optional(source, name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Looks up `name`, falling back to `default` when unset.
pub fn optional_or(source: &impl VarSource, name: &str, default: &str) -> String {
    optional(source, name).unwrap_or_else(|| default.to_string())
}

/// Parses `name` with [`FromStr`], falling back to `default` when unset.
pub fn parse_or<T>(source: &impl VarSource, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(source, name) {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}

/// Splits a comma-separated variable into trimmed, non-empty items.
pub fn list_or(source: &impl VarSource, name: &str, default: &[&str]) -> Vec<String> {
    match optional(source, name) {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn blank_values_count_as_missing() {
        let src = source(&[("API_KEY", "   ")]);
        assert_eq!(
            required(&src, "API_KEY"),
            Err(ConfigError::MissingEnvVar("API_KEY".into()))
        );
    }

    #[test]
    fn parse_or_reports_the_variable_name() {
        let src = source(&[("PAUSE_MS", "soon")]);
        let err = parse_or::<u64>(&src, "PAUSE_MS", 1000).unwrap_err();
        assert!(err.to_string().contains("PAUSE_MS"));
        assert_eq!(parse_or::<u64>(&source(&[]), "PAUSE_MS", 1000).unwrap(), 1000);
    }

    #[test]
    fn list_or_trims_and_drops_empty_items() {
        let src = source(&[("IPS", " 8.8.8.8, ,1.1.1.1 ")]);
        assert_eq!(list_or(&src, "IPS", &[]), vec!["8.8.8.8", "1.1.1.1"]);
        assert_eq!(list_or(&source(&[]), "IPS", &["9.9.9.9"]), vec!["9.9.9.9"]);
    }
}
