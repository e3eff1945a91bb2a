use thiserror::Error;

use crate::{
    models::request_params::{AggregatesParams, ParamsError},
    pipeline::RunParams,
    providers::polygon_rest::PolygonAggsParams,
};

use super::commands::Cli;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("--batch-size must be at least 1")]
    ZeroBatchSize,
}

/// Validated command line: what to fetch plus where to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub run: RunParams,
    /// Database override from `--db`.
    pub db: Option<String>,
}

impl Cli {
    pub fn into_invocation(self) -> Result<Invocation, CliError> {
        if self.batch_size == 0 {
            return Err(CliError::ZeroBatchSize);
        }

        let request = AggregatesParams::parse(
            &self.ticker,
            &self.from,
            &self.to,
            self.multiplier,
            self.timespan,
        )?
        .with_provider_params(PolygonAggsParams {
            adjusted: self.adjusted,
            sort: self.sort,
            limit: self.limit,
        });

        Ok(Invocation {
            run: RunParams {
                request,
                batch_size: self.batch_size,
            },
            db: self.db.filter(|db| !db.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::{models::timespan::Timespan, providers::polygon_rest::Sort};

    fn parse(args: &[&str]) -> Result<Invocation, CliError> {
        let argv = std::iter::once("polygon-connector").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().into_invocation()
    }

    #[test]
    fn defaults_are_applied() {
        let inv = parse(&["--ticker", "msft", "--from", "2024-01-01", "--to", "2024-01-31"]).unwrap();

        assert_eq!(inv.run.request.ticker, "MSFT");
        assert_eq!(inv.run.request.multiplier, 1);
        assert_eq!(inv.run.request.timespan, Timespan::Day);
        assert_eq!(inv.run.batch_size, 500);
        assert_eq!(inv.run.request.provider_specific, PolygonAggsParams::default());
        assert_eq!(inv.db, None);
    }

    #[test]
    fn optional_flags_are_carried_through() {
        let inv = parse(&[
            "--ticker", "AAPL", "--from", "2024-01-01", "--to", "2024-01-02", "--db", "research",
            "--multiplier", "5", "--timespan", "minute", "--batch-size", "50", "--sort", "desc",
            "--limit", "5000", "--adjusted", "false",
        ])
        .unwrap();

        assert_eq!(inv.db.as_deref(), Some("research"));
        assert_eq!(inv.run.request.multiplier, 5);
        assert_eq!(inv.run.request.timespan, Timespan::Minute);
        assert_eq!(inv.run.batch_size, 50);
        assert_eq!(inv.run.request.provider_specific.sort, Some(Sort::Desc));
        assert_eq!(inv.run.request.provider_specific.limit, Some(5000));
        assert_eq!(inv.run.request.provider_specific.adjusted, Some(false));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(matches!(
            parse(&["--ticker", "AAPL", "--from", "2024/01/01", "--to", "2024-01-31"]),
            Err(CliError::Params(ParamsError::InvalidDate { .. }))
        ));
        assert!(matches!(
            parse(&["--ticker", "AAPL", "--from", "2024-02-01", "--to", "2024-01-31"]),
            Err(CliError::Params(ParamsError::InvertedRange { .. }))
        ));
        assert_eq!(
            parse(&["--ticker", "", "--from", "2024-01-01", "--to", "2024-01-31"]),
            Err(CliError::Params(ParamsError::EmptyTicker))
        );
        assert_eq!(
            parse(&["--ticker", "AAPL", "--from", "2024-01-01", "--to", "2024-01-31", "--batch-size", "0"]),
            Err(CliError::ZeroBatchSize)
        );
    }

    #[test]
    fn required_flags_and_units_are_enforced_by_clap() {
        assert!(Cli::try_parse_from(["polygon-connector", "--ticker", "AAPL"]).is_err());
        assert!(
            Cli::try_parse_from([
                "polygon-connector", "--ticker", "AAPL", "--from", "2024-01-01", "--to",
                "2024-01-02", "--timespan", "fortnight",
            ])
            .is_err()
        );
    }
}
