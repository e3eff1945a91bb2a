use doc_store::StoreError;
use snafu::{Backtrace, Snafu};

/// Errors that can occur while building the HTTP client.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Terminal outcome of
/// [`RetryingClient::request_with_retries`](crate::requests::retry::RetryingClient::request_with_retries).
///
/// Transient failures (429, 5xx, transport errors) never surface here on
/// their own; they only show up as [`RequestError::RetriesExceeded`] once the
/// attempt budget is spent.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RequestError {
    /// The API answered with a status that is not worth retrying.
    #[snafu(display("HTTP {status} from {url}: {body}"))]
    Status {
        url: String,
        status: u16,
        body: String,
        backtrace: Backtrace,
    },

    #[snafu(display("Gave up on {url} after {attempts} attempts"))]
    RetriesExceeded {
        url: String,
        attempts: u32,
        backtrace: Backtrace,
    },

    /// A 200 response whose body was not JSON.
    #[snafu(display("Invalid JSON from {url}: {source}"))]
    Decode {
        url: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    #[snafu(display("Aggregates request failed: {source}"))]
    Request { source: RequestError },

    /// A page did not have the aggregates response shape.
    #[snafu(display("Unexpected aggregates page from {url}: {source}"))]
    Response {
        url: String,
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// No store session could be opened, so nothing was written.
    #[snafu(display("Could not connect to the document store: {source}"))]
    Connect { source: StoreError },
}

/// Why a market-data run stopped early.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    #[snafu(display("Fetch failed: {source}"))]
    Fetch { source: ProviderError },

    #[snafu(display("Load into {collection} failed: {source}"))]
    Load { collection: String, source: SinkError },
}
