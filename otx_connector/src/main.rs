use anyhow::Result;
use doc_store::mongo::MongoConnector;
use otx_connector::{config::OtxConfig, pipeline::run_with_config};
use shared_utils::{logging::init_tracing, sleep::TokioSleeper};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the variables may come from the environment.
    let _ = dotenvy::dotenv();
    init_tracing("otx_connector=info,doc_store=info");

    let config = OtxConfig::from_env()?;
    let connector = MongoConnector::new(config.mongo_uri.clone(), config.mongo_db.clone());

    let summary = run_with_config(&config, Box::new(connector), Box::new(TokioSleeper)).await?;
    for report in &summary.reports {
        tracing::debug!(ip = %report.identifier, outcome = ?report.outcome, "result");
    }

    Ok(())
}
