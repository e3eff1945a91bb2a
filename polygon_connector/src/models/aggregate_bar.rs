use chrono::{DateTime, Utc};
use doc_store::bson::{self, Bson, Document, doc};
use serde_json::Value;

/// One aggregate bar as stored in the per-ticker collection.
///
/// `(ticker, date)` identifies a bar; the store enforces it with a unique
/// index so reloading an overlapping range does not duplicate rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateBar {
    pub ticker: String,
    /// Start of the bar window.
    pub date: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    /// The provider item exactly as received.
    pub raw: Value,
    pub ingested_at: DateTime<Utc>,
}

impl AggregateBar {
    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        Ok(doc! {
            "ticker": self.ticker.as_str(),
            "date": bson::DateTime::from_millis(self.date.timestamp_millis()),
            "open": Bson::from(self.open),
            "high": Bson::from(self.high),
            "low": Bson::from(self.low),
            "close": Bson::from(self.close),
            "volume": Bson::from(self.volume),
            "raw": bson::to_bson(&self.raw)?,
            "ingested_at": bson::DateTime::from_millis(self.ingested_at.timestamp_millis()),
        })
    }
}

/// Turns raw `results` items into bars, stamped with the current time.
pub fn transform_aggregates(raw: &[Value], ticker: &str) -> Vec<AggregateBar> {
    transform_aggregates_at(raw, ticker, Utc::now())
}

/// Same as [`transform_aggregates`] with a fixed ingestion time.
///
/// Items whose `t` is missing, not a number, or outside the representable
/// range are dropped.
pub fn transform_aggregates_at(
    raw: &[Value],
    ticker: &str,
    ingested_at: DateTime<Utc>,
) -> Vec<AggregateBar> {
    let bars: Vec<AggregateBar> = raw
        .iter()
        .filter_map(|item| {
            let date = bar_start(item)?;
            Some(AggregateBar {
                ticker: ticker.to_string(),
                date,
                open: number(item, "o"),
                high: number(item, "h"),
                low: number(item, "l"),
                close: number(item, "c"),
                volume: number(item, "v"),
                raw: item.clone(),
                ingested_at,
            })
        })
        .collect();

    let skipped = raw.len() - bars.len();
    if skipped > 0 {
        tracing::debug!(ticker, skipped, "dropped aggregate items without a usable timestamp");
    }
    bars
}

fn bar_start(item: &Value) -> Option<DateTime<Utc>> {
    let t = item.get("t")?;
    let millis = t.as_i64().or_else(|| t.as_f64().map(|f| f as i64))?;
    DateTime::from_timestamp_millis(millis)
}

fn number(item: &Value, key: &str) -> Option<f64> {
    item.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn epoch_millis_become_utc_bar_starts() {
        let raw = vec![json!({ "t": 1719792000000_i64, "o": 1, "h": 2, "l": 0.5, "c": 1.5, "v": 1000 })];
        let bars = transform_aggregates(&raw, "AAPL");

        assert_eq!(bars.len(), 1);
        let bar = &bars[0];
        assert_eq!(bar.ticker, "AAPL");
        assert_eq!(bar.date, Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(bar.open, Some(1.0));
        assert_eq!(bar.high, Some(2.0));
        assert_eq!(bar.low, Some(0.5));
        assert_eq!(bar.close, Some(1.5));
        assert_eq!(bar.volume, Some(1000.0));
        assert_eq!(bar.raw, raw[0]);
    }

    #[test]
    fn items_without_numeric_t_are_skipped() {
        let raw = vec![
            json!({ "o": 1 }),
            json!({ "t": "yesterday", "o": 1 }),
            json!({ "t": 1719878400000_i64 }),
        ];
        let bars = transform_aggregates(&raw, "AAPL");

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].open, None);
        assert_eq!(bars[0].volume, None);
    }

    #[test]
    fn document_has_dates_and_nulls() {
        let now = Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap();
        let raw = vec![json!({ "t": 1719792000000_i64, "c": 1.5, "n": 12 })];
        let bars = transform_aggregates_at(&raw, "AAPL", now);
        let doc = bars[0].to_document().unwrap();

        assert_eq!(doc.get_str("ticker").unwrap(), "AAPL");
        assert_eq!(
            doc.get_datetime("date").unwrap().timestamp_millis(),
            1719792000000
        );
        assert_eq!(doc.get_f64("close").unwrap(), 1.5);
        assert_eq!(doc.get("open"), Some(&Bson::Null));
        assert!(matches!(
            doc.get_document("raw").unwrap().get("n"),
            Some(Bson::Int32(12)) | Some(Bson::Int64(12))
        ));
        assert_eq!(
            doc.get_datetime("ingested_at").unwrap().timestamp_millis(),
            now.timestamp_millis()
        );
    }
}
