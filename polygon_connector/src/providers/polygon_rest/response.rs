use serde::Deserialize;
use serde_json::Value;

/// One page of the aggregates endpoint.
///
/// Only the fields the pipeline reads are modelled; result items are kept
/// as raw JSON.
#[derive(Debug, Default, Deserialize)]
pub struct AggsResponse {
    /// Absent or `null` when the page has no bars.
    #[serde(default)]
    pub results: Option<Vec<Value>>,

    /// Full URL of the next page, if any.
    #[serde(default)]
    pub next_url: Option<String>,

    /// Same cursor under its camel-case name. Some pages carry both keys.
    #[serde(default, rename = "nextUrl")]
    pub next_url_camel: Option<String>,
}

impl AggsResponse {
    /// The continuation cursor, ignoring empty strings.
    pub fn next_page(&self) -> Option<&str> {
        [&self.next_url, &self.next_url_camel]
            .into_iter()
            .filter_map(|url| url.as_deref())
            .find(|url| !url.is_empty())
    }
}
