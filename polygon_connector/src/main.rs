use anyhow::{Context, Result};
use clap::Parser;
use doc_store::mongo::MongoConnector;
use polygon_connector::{
    RunOutcome,
    cli::commands::Cli,
    config::PolygonConfig,
    pipeline::run,
    providers::polygon_rest::PolygonProvider,
};
use shared_utils::{logging::init_tracing, sleep::TokioSleeper};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("polygon_connector=info,doc_store=info");

    let invocation = Cli::parse().into_invocation()?;
    let config = PolygonConfig::from_env()?;
    let db = invocation.db.unwrap_or_else(|| config.mongo_db.clone());

    let provider = PolygonProvider::new(&config, Box::new(TokioSleeper))?;
    let connector = MongoConnector::new(config.mongo_uri.clone(), db.clone());

    let ticker = invocation.run.request.ticker.clone();
    let outcome = run(&provider, &connector, &invocation.run)
        .await
        .with_context(|| format!("loading {ticker} into {db}"))?;

    if let RunOutcome::Loaded { collection, report } = outcome {
        tracing::info!(
            db = %db,
            collection = %collection,
            inserted = report.inserted,
            duplicates = report.duplicates,
            failed = report.failed,
            "done"
        );
    }

    Ok(())
}
