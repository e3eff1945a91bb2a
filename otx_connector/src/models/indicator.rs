//! Indicator records as they are persisted.

use chrono::{DateTime, Utc};
use doc_store::bson::{self, Document, doc};
use serde_json::Value;

use super::lookup::Lookup;

/// One OTX lookup result, wrapped with provenance.
///
/// Created once per fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRecord {
    /// The IPv4 address that was looked up.
    pub source_key: String,
    /// Response body exactly as OTX returned it.
    pub payload: Value,
    pub ingested_at: DateTime<Utc>,
}

impl IndicatorRecord {
    pub fn new(source_key: impl Into<String>, payload: Value, ingested_at: DateTime<Utc>) -> Self {
        Self {
            source_key: source_key.into(),
            payload,
            ingested_at,
        }
    }

    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        Ok(doc! {
            "source_key": self.source_key.clone(),
            "payload": bson::to_bson(&self.payload)?,
            "ingested_at": bson::DateTime::from_millis(self.ingested_at.timestamp_millis()),
        })
    }
}

/// Wraps a raw OTX payload with its identifier and the ingestion time.
pub fn transform(raw: Lookup<Value>, ip: &str) -> Lookup<IndicatorRecord> {
    transform_at(raw, ip, Utc::now())
}

pub fn transform_at(raw: Lookup<Value>, ip: &str, now: DateTime<Utc>) -> Lookup<IndicatorRecord> {
    raw.map(|payload| IndicatorRecord::new(ip, payload, now))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn transform_wraps_payload_with_provenance() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let raw = Lookup::Found(json!({ "reputation": 0, "pulse_info": { "count": 3 } }));

        let rec = transform_at(raw, "8.8.8.8", now);

        let rec = rec.as_found().expect("record");
        assert_eq!(rec.source_key, "8.8.8.8");
        assert_eq!(rec.payload["pulse_info"]["count"], 3);
        assert_eq!(rec.ingested_at, now);
    }

    #[test]
    fn transform_passes_not_found_through() {
        assert_eq!(transform(Lookup::NotFound, "1.1.1.1"), Lookup::NotFound);
    }

    #[test]
    fn document_keeps_payload_nested() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let rec = IndicatorRecord::new("1.1.1.1", json!({ "asn": "AS13335" }), now);

        let d = rec.to_document().unwrap();

        assert_eq!(d.get_str("source_key").unwrap(), "1.1.1.1");
        assert_eq!(d.get_document("payload").unwrap().get_str("asn").unwrap(), "AS13335");
        assert_eq!(
            d.get_datetime("ingested_at").unwrap().timestamp_millis(),
            now.timestamp_millis()
        );
    }
}
