use clap::Parser;

use crate::{
    io::sink::DEFAULT_BATCH_SIZE,
    models::timespan::Timespan,
    providers::polygon_rest::Sort,
};

#[derive(Parser, Debug)]
#[command(
    name = "polygon-connector",
    author,
    version,
    about = "Load Polygon.io aggregate bars for one ticker into MongoDB"
)]
pub struct Cli {
    /// Ticker symbol (e.g. "AAPL")
    #[arg(long)]
    pub ticker: String,

    /// First day of the range, YYYY-MM-DD
    #[arg(long)]
    pub from: String,

    /// Last day of the range (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub to: String,

    /// Database name; overrides MONGO_DB
    #[arg(long)]
    pub db: Option<String>,

    /// Number of timespan units per bar
    #[arg(long, default_value_t = 1)]
    pub multiplier: u32,

    /// Bar unit: second, minute, hour, day, week, month, quarter or year
    #[arg(long, default_value = "day")]
    pub timespan: Timespan,

    /// Documents per insert batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Ask for split-adjusted (true) or raw (false) prices
    #[arg(long)]
    pub adjusted: Option<bool>,

    /// Result order: asc or desc
    #[arg(long)]
    pub sort: Option<Sort>,

    /// Base aggregates per page
    #[arg(long)]
    pub limit: Option<u32>,
}
