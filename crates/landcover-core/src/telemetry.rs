//! IoT telemetry feed responses (ThingSpeak channel field feeds).
//!
//! Only parsing lives here; fetching the response is left to the caller.
//! Response shape:
//! ```text
//! { "channel": { "id": 2928250, "name": "...", "field1": "Sensor 1", ... },
//!   "feeds":   [ { "created_at": "2024-05-02T14:00:00Z", "entry_id": 1, "field1": "21.4" }, ... ] }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FeedError;

pub const FEED_BASE_URL: &str = "https://api.thingspeak.com";
pub const DEFAULT_RESULTS: u32 = 60;
pub const MAX_FIELD: u8 = 8;

fn check_field(field_id: u8) -> Result<(), FeedError> {
    if (1..=MAX_FIELD).contains(&field_id) {
        Ok(())
    } else {
        Err(FeedError::BadField(field_id))
    }
}

/// URL of the last `results` entries of one channel field.
pub fn feed_url(channel_id: u64, field_id: u8, results: u32) -> Result<String, FeedError> {
    check_field(field_id)?;
    Ok(format!("{FEED_BASE_URL}/channels/{channel_id}/fields/{field_id}.json?results={results}"))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelInfo {
    pub id: Option<u64>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub created_at: Option<String>,
    pub entry_id: Option<u64>,
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldFeed {
    #[serde(default)]
    pub channel: ChannelInfo,
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

/// Reading of one feed value. Missing, null, empty, non-numeric, and
/// non-finite readings count as 0.
fn reading(v: Option<&Value>) -> f64 {
    let x = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if x.is_finite() { x } else { 0.0 }
}

impl FieldFeed {
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Label the channel gives to `field_id`, e.g. "Sensor 1".
    pub fn field_name(&self, field_id: u8) -> Option<&str> {
        self.channel.extra.get(&format!("field{field_id}")).and_then(Value::as_str)
    }

    /// Time series of one field. Entries without a `created_at` are skipped
    /// so timestamps and values stay aligned.
    pub fn series(&self, field_id: u8) -> Result<Series, FeedError> {
        check_field(field_id)?;
        let key = format!("field{field_id}");

        let mut series = Series::default();
        for entry in &self.feeds {
            let Some(ts) = entry.created_at.as_deref().filter(|t| !t.is_empty()) else {
                continue;
            };
            series.timestamps.push(ts.to_string());
            series.values.push(reading(entry.fields.get(&key)));
        }
        Ok(series)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub timestamps: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub last: f64,
}

impl Series {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `None` for an empty series.
    pub fn summary(&self) -> Option<SeriesSummary> {
        let last = *self.values.last()?;
        let min = self.values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = self.values.iter().sum::<f64>() / self.values.len() as f64;
        Some(SeriesSummary { count: self.values.len(), min, max, mean, last })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const RESPONSE: &str = r#"{
        "channel": {"id": 2928250, "name": "Estación", "field1": "Sensor 1", "field2": "Sensor 2"},
        "feeds": [
            {"created_at": "2024-05-02T14:00:00Z", "entry_id": 1, "field1": "21.5", "field2": "80"},
            {"created_at": "2024-05-02T14:01:00Z", "entry_id": 2, "field1": null},
            {"created_at": "2024-05-02T14:02:00Z", "entry_id": 3, "field1": "bad"},
            {"created_at": null, "entry_id": 4, "field1": "99"},
            {"created_at": "2024-05-02T14:04:00Z", "entry_id": 5, "field1": " 18.5 "}
        ]
    }"#;

    #[test]
    fn feed_url_format() {
        assert_eq!(
            feed_url(2928250, 1, DEFAULT_RESULTS).unwrap(),
            "https://api.thingspeak.com/channels/2928250/fields/1.json?results=60"
        );
        assert!(matches!(feed_url(1, 0, 10), Err(FeedError::BadField(0))));
        assert!(matches!(feed_url(1, 9, 10), Err(FeedError::BadField(9))));
    }

    #[test]
    fn series_skips_untimed_and_zeroes_bad_values() {
        let feed = FieldFeed::from_json(RESPONSE).unwrap();
        assert_eq!(feed.channel.id, Some(2928250));
        assert_eq!(feed.field_name(1), Some("Sensor 1"));
        assert_eq!(feed.field_name(3), None);

        let s = feed.series(1).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.values, [21.5, 0.0, 0.0, 18.5]);
        assert_eq!(s.timestamps[3], "2024-05-02T14:04:00Z");
    }

    #[test]
    fn missing_field_reads_zero() {
        let feed = FieldFeed::from_json(RESPONSE).unwrap();
        assert_eq!(feed.series(2).unwrap().values, [80.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn summary_of_series() {
        let s = FieldFeed::from_json(RESPONSE).unwrap().series(1).unwrap();
        let sum = s.summary().unwrap();
        assert_eq!(sum.count, 4);
        assert_relative_eq!(sum.min, 0.0);
        assert_relative_eq!(sum.max, 21.5);
        assert_relative_eq!(sum.mean, 10.0);
        assert_relative_eq!(sum.last, 18.5);
        assert!(Series::default().summary().is_none());
    }

    #[test]
    fn empty_or_partial_responses_parse() {
        let feed = FieldFeed::from_json("{}").unwrap();
        assert!(feed.series(1).unwrap().is_empty());
        assert!(matches!(FieldFeed::from_json("[1,"), Err(FeedError::Json(_))));
    }
}
