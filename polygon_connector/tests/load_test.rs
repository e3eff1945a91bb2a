use std::collections::HashMap;

use doc_store::memory::MemoryConnector;
use polygon_connector::{
    RunOutcome, RunParams,
    config::PolygonConfig,
    errors::PipelineError,
    io::sink::{LoadReport, load_to_store},
    models::{
        aggregate_bar::transform_aggregates, request_params::AggregatesParams,
        timespan::Timespan,
    },
    pipeline::run,
    providers::polygon_rest::PolygonProvider,
};
use serde_json::{Value, json};
use shared_utils::sleep::RecordingSleeper;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const COLLECTION: &str = "polygon_AAPL_raw";

fn provider(server: &MockServer) -> PolygonProvider {
    let uri = server.uri();
    let src = HashMap::from([("POLYGON_API_KEY", "test-key"), ("POLYGON_BASE_URL", uri.as_str())]);
    let config = PolygonConfig::from_source(&src).expect("config");
    PolygonProvider::new(&config, Box::new(RecordingSleeper::new())).expect("provider")
}

fn run_params(from: &str, to: &str) -> RunParams {
    RunParams {
        request: AggregatesParams::parse("AAPL", from, to, 1, Timespan::Day).unwrap(),
        batch_size: 2,
    }
}

/// Daily bar for 2024-07-01 plus `day` days.
fn bar(day: i64) -> Value {
    json!({
        "t": 1719792000000_i64 + day * 86_400_000,
        "o": 10.0, "h": 11.0, "l": 9.0, "c": 10.5, "v": 1_000,
    })
}

async fn serve_range(server: &MockServer, from: &str, to: &str, results: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/aggs/ticker/AAPL/range/1/day/{from}/{to}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn overlapping_runs_only_add_new_days() {
    let server = MockServer::start().await;
    serve_range(&server, "2024-07-01", "2024-07-03", (0..3).map(bar).collect()).await;
    serve_range(&server, "2024-07-02", "2024-07-05", (1..5).map(bar).collect()).await;

    let provider = provider(&server);
    let store = MemoryConnector::new();

    let first = run(&provider, &store, &run_params("2024-07-01", "2024-07-03"))
        .await
        .unwrap();
    assert_eq!(
        first,
        RunOutcome::Loaded {
            collection: COLLECTION.into(),
            report: LoadReport {
                attempted: 3,
                inserted: 3,
                duplicates: 0,
                failed: 0,
                batches: 2,
                failed_batches: 0,
            },
        }
    );

    let second = run(&provider, &store, &run_params("2024-07-02", "2024-07-05"))
        .await
        .unwrap();
    let RunOutcome::Loaded { report, .. } = second else {
        panic!("expected a load");
    };
    assert_eq!(report.attempted, 4);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.duplicates, 2);

    assert_eq!(store.count(COLLECTION), 5);
    assert!(store.has_unique_index(COLLECTION, &["ticker", "date"]));
    assert_eq!(store.sessions_opened(), store.sessions_closed());
}

#[tokio::test]
async fn stored_documents_carry_the_normalized_fields() {
    let server = MockServer::start().await;
    serve_range(&server, "2024-07-01", "2024-07-01", vec![bar(0)]).await;

    let store = MemoryConnector::new();
    run(&provider(&server), &store, &run_params("2024-07-01", "2024-07-01"))
        .await
        .unwrap();

    let docs = store.documents(COLLECTION);
    assert_eq!(docs.len(), 1);
    let doc = &docs[0];
    assert_eq!(doc.get_str("ticker").unwrap(), "AAPL");
    assert_eq!(doc.get_datetime("date").unwrap().timestamp_millis(), 1719792000000);
    assert_eq!(doc.get_f64("open").unwrap(), 10.0);
    assert_eq!(doc.get_f64("close").unwrap(), 10.5);
    assert_eq!(doc.get_f64("volume").unwrap(), 1000.0);
    assert!(doc.get_document("raw").is_ok());
    assert!(doc.get_datetime("ingested_at").is_ok());
}

#[tokio::test]
async fn empty_results_never_touch_the_store() {
    let server = MockServer::start().await;
    serve_range(&server, "2024-07-06", "2024-07-07", vec![]).await;

    let store = MemoryConnector::new();
    let outcome = run(&provider(&server), &store, &run_params("2024-07-06", "2024-07-07"))
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::NoResults);
    assert_eq!(store.sessions_opened(), 0);
    assert!(store.collection_names().is_empty());
}

#[tokio::test]
async fn fetch_failures_abort_before_loading() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unknown API key"))
        .mount(&server)
        .await;

    let store = MemoryConnector::new();
    let err = run(&provider(&server), &store, &run_params("2024-07-01", "2024-07-03"))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Fetch { .. }));
    assert!(err.to_string().contains("401"));
    assert_eq!(store.sessions_opened(), 0);
}

#[tokio::test]
async fn index_failure_does_not_stop_the_load() {
    let store = MemoryConnector::rejecting_indexes();
    let bars = transform_aggregates(&[bar(0), bar(1), bar(2)], "AAPL");

    let report = load_to_store(&store, &bars, COLLECTION, 500).await.unwrap();

    assert_eq!(report.inserted, 3);
    assert_eq!(report.batches, 1);
    assert_eq!(store.count(COLLECTION), 3);
    assert!(!store.has_unique_index(COLLECTION, &["ticker", "date"]));
}

#[tokio::test]
async fn duplicates_inside_one_batch_are_counted() {
    let store = MemoryConnector::new();
    let bars = transform_aggregates(&[bar(0), bar(0), bar(1)], "AAPL");

    let report = load_to_store(&store, &bars, COLLECTION, 500).await.unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.failed, 0);
}
