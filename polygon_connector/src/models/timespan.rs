use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimespanError {
    #[error("Invalid timespan unit: {0}")]
    InvalidUnit(String),
}

/// Bar width unit accepted by the aggregates endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timespan {
    Second,
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Timespan {
    /// The path segment the API expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timespan::Second => "second",
            Timespan::Minute => "minute",
            Timespan::Hour => "hour",
            Timespan::Day => "day",
            Timespan::Week => "week",
            Timespan::Month => "month",
            Timespan::Quarter => "quarter",
            Timespan::Year => "year",
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timespan {
    type Err = TimespanError;

    fn from_str(unit: &str) -> Result<Self, Self::Err> {
        let timespan = match unit.trim().to_lowercase().as_str() {
            "s" | "sec" | "second" => Timespan::Second,
            "m" | "min" | "minute" => Timespan::Minute,
            "h" | "hr" | "hour" => Timespan::Hour,
            "d" | "day" => Timespan::Day,
            "w" | "wk" | "week" => Timespan::Week,
            "mo" | "month" => Timespan::Month,
            "q" | "quarter" => Timespan::Quarter,
            "y" | "yr" | "year" => Timespan::Year,
            _ => return Err(TimespanError::InvalidUnit(unit.to_string())),
        };
        Ok(timespan)
    }
}
