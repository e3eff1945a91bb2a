use chrono::NaiveDate;
use thiserror::Error;

use crate::{models::timespan::Timespan, providers::polygon_rest::params::PolygonAggsParams};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("Ticker must not be empty")]
    EmptyTicker,

    #[error("Ticker {0:?} contains characters that cannot appear in a URL path")]
    InvalidTicker(String),

    #[error("Invalid {field} date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("Start date {from} is after end date {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    #[error("Multiplier must be at least 1")]
    ZeroMultiplier,
}

/// One aggregates request: a ticker, an inclusive day range and a bar width.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatesParams {
    /// Upper-cased ticker, e.g. `AAPL`.
    pub ticker: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub multiplier: u32,
    pub timespan: Timespan,
    /// Optional query parameters understood by the REST endpoint.
    pub provider_specific: PolygonAggsParams,
}

impl AggregatesParams {
    /// Validates user input and builds the request.
    ///
    /// The ticker is trimmed and upper-cased. Dates must be `YYYY-MM-DD` and
    /// `from` may equal `to`.
    pub fn parse(
        ticker: &str,
        from: &str,
        to: &str,
        multiplier: u32,
        timespan: Timespan,
    ) -> Result<Self, ParamsError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ParamsError::EmptyTicker);
        }
        if ticker
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
        {
            return Err(ParamsError::InvalidTicker(ticker));
        }

        let from = parse_date("from", from)?;
        let to = parse_date("to", to)?;
        if from > to {
            return Err(ParamsError::InvertedRange { from, to });
        }
        if multiplier == 0 {
            return Err(ParamsError::ZeroMultiplier);
        }

        Ok(Self {
            ticker,
            from,
            to,
            multiplier,
            timespan,
            provider_specific: PolygonAggsParams::default(),
        })
    }

    pub fn with_provider_params(mut self, params: PolygonAggsParams) -> Self {
        self.provider_specific = params;
        self
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ParamsError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ParamsError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
