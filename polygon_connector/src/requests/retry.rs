//! GET with retry for the aggregates API.
//!
//! | outcome              | action                                      |
//! |----------------------|---------------------------------------------|
//! | 200                  | decode the body as JSON and return it       |
//! | 429                  | wait the rate-limit cooldown, try again     |
//! | 5xx / transport      | wait the current backoff, double it, retry  |
//! | anything else        | fail at once with the status and body       |
//!
//! A 429 uses up an attempt but leaves the backoff where it was. Nothing
//! waits after the final attempt.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use shared_utils::{sleep::Sleeper, text::excerpt};
use snafu::ResultExt;

use crate::{
    config::{PolygonConfig, RetryPolicy},
    errors::{
        ClientBuildSnafu, DecodeSnafu, ProviderInitError, RequestError, RetriesExceededSnafu,
        StatusSnafu,
    },
};

const BODY_EXCERPT_CHARS: usize = 300;

pub struct RetryingClient {
    client: Client,
    api_key: SecretString,
    policy: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
}

impl RetryingClient {
    pub fn new(config: &PolygonConfig, sleeper: Box<dyn Sleeper>) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .timeout(config.retry.request_timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            api_key: SecretString::new(config.api_key.expose_secret().into()),
            policy: config.retry.clone(),
            sleeper,
        })
    }

    /// GETs `url` with `params` plus the `apiKey` parameter.
    ///
    /// `url` may already carry a query string (pagination cursors do); the
    /// extra parameters are appended to it.
    pub async fn request_with_retries(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Value, RequestError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut backoff = self.policy.initial_backoff;

        for attempt in 1..=attempts {
            let request = self
                .client
                .get(url)
                .query(params)
                .query(&[("apiKey", self.api_key.expose_secret())]);

            let wait = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::OK {
                        return response.json::<Value>().await.context(DecodeSnafu { url });
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        tracing::warn!(
                            url,
                            attempt,
                            delay_ms = self.policy.rate_limit_cooldown.as_millis() as u64,
                            "rate limited"
                        );
                        self.policy.rate_limit_cooldown
                    } else if status.is_server_error() {
                        tracing::warn!(
                            url,
                            attempt,
                            status = status.as_u16(),
                            delay_ms = backoff.as_millis() as u64,
                            "server error"
                        );
                        next_backoff(&mut backoff, self.policy.backoff_factor)
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        tracing::error!(url, status = status.as_u16(), "request rejected");
                        return StatusSnafu {
                            url,
                            status: status.as_u16(),
                            body: excerpt(&body, BODY_EXCERPT_CHARS),
                        }
                        .fail();
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        url,
                        attempt,
                        error = %e,
                        delay_ms = backoff.as_millis() as u64,
                        "transport error"
                    );
                    next_backoff(&mut backoff, self.policy.backoff_factor)
                }
            };

            if attempt < attempts {
                self.sleeper.sleep(wait).await;
            }
        }

        tracing::error!(url, attempts, "giving up");
        RetriesExceededSnafu { url, attempts }.fail()
    }
}

/// Returns the wait to use now and grows `backoff` for the next failure.
fn next_backoff(backoff: &mut Duration, factor: u32) -> Duration {
    let wait = *backoff;
    *backoff = backoff.saturating_mul(factor);
    wait
}
