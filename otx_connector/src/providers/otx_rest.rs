use reqwest::{Client, StatusCode, header};
use secrecy::ExposeSecret;
use serde_json::Value;
use shared_utils::text::excerpt;
use snafu::ResultExt;

use crate::{
    config::{OtxConfig, REQUEST_TIMEOUT},
    errors::{
        ClientBuildSnafu, DecodeSnafu, IndicatorError, InvalidApiKeySnafu, ProviderInitError,
        RequestSnafu, StatusSnafu,
    },
    models::lookup::Lookup,
};

const API_KEY_HEADER: &str = "X-OTX-API-KEY";

/// Client for the OTX IPv4 "general" section.
pub struct OtxProvider {
    client: Client,
    base_url: String,
}

impl OtxProvider {
    /// Creates a client that sends the API key from `config` on every request.
    pub fn new(config: &OtxConfig) -> Result<Self, ProviderInitError> {
        let mut key = header::HeaderValue::from_str(config.api_key.expose_secret())
            .context(InvalidApiKeySnafu)?;
        key.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn indicator_url(&self, ip: &str) -> String {
        format!("{}/indicators/IPv4/{ip}/general", self.base_url)
    }

    /// Fetches the raw indicator body for `ip`.
    ///
    /// A 404 from OTX means the address is unknown and yields
    /// [`Lookup::NotFound`]; any other non-success status is an error.
    pub async fn extract(&self, ip: &str) -> Result<Lookup<Value>, IndicatorError> {
        let url = self.indicator_url(ip);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context(RequestSnafu { ip })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Lookup::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return StatusSnafu {
                ip,
                status: status.as_u16(),
                body: excerpt(&body, 300),
            }
            .fail();
        }

        let body = response.json::<Value>().await.context(DecodeSnafu { ip })?;
        Ok(Lookup::Found(body))
    }
}
