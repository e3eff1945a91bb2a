use doc_store::StoreError;
use snafu::{Backtrace, Snafu};

/// Errors that can occur during the creation of the OTX client.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Everything that can go wrong while processing one indicator.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum IndicatorError {
    /// Network failure, timeout or similar before a response arrived.
    #[snafu(display("Request for {ip} failed: {source}"))]
    Request {
        ip: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The API answered with a status other than success or 404.
    #[snafu(display("OTX returned HTTP {status} for {ip}: {body}"))]
    Status {
        ip: String,
        status: u16,
        body: String,
        backtrace: Backtrace,
    },

    /// The body of a successful response was not JSON.
    #[snafu(display("Invalid JSON for {ip}: {source}"))]
    Decode {
        ip: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The payload could not be represented as a BSON document.
    #[snafu(display("Could not encode record for {ip}: {source}"))]
    Encode {
        ip: String,
        source: doc_store::bson::ser::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Store write for {ip} failed: {source}"))]
    Store { ip: String, source: StoreError },
}
