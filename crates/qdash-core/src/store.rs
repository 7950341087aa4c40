//! Store and queue records exchanged with the upstream sources and the
//! dashboard.
//!
//! ## Upstream shape
//!
//! Both upstream feeds use camelCase keys. The store-list feed returns a bare
//! JSON array of rows; every field other than `id` has been observed missing
//! or `null` on closed or newly opened stores, so those fields are optional
//! here and defaulted during the merge. The queue feed returns one object per
//! store with `storeQueue` as an array of ticket-number strings.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Hong Kong reference coordinate used when the caller omits a location.
pub const DEFAULT_LATITUDE: f64 = 22.3193;
pub const DEFAULT_LONGITUDE: f64 = 114.1694;
pub const DEFAULT_NUM_RESULTS: u32 = 25;
pub const DEFAULT_REGION: &str = "HK";

/// Status string assigned when the store list carries none.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// One row of the upstream store-list feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStoreListEntry {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub store_status: Option<String>,
    /// Waiting count as declared by the store list. Often stale.
    #[serde(default, deserialize_with = "lenient_count")]
    pub waiting_group: Option<u32>,
}

/// Queue state for a single store from the upstream queue feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQueueEntry {
    #[serde(default)]
    pub shop_id: Option<i64>,
    /// Ticket numbers currently being called, in upstream order.
    #[serde(default)]
    pub store_queue: Vec<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub waiting_group: Option<u32>,
    #[serde(default)]
    pub store_status: Option<String>,
}

/// Reads a waiting-group count, mapping negative, fractional, oversized, or
/// non-numeric values to `None` instead of failing the whole row.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Int(i64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match RawCount::deserialize(deserializer)? {
        RawCount::Int(n) => u32::try_from(n).ok(),
        RawCount::Float(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => {
            Some(f as u32)
        }
        RawCount::Text(text) => text.trim().parse().ok(),
        RawCount::Float(_) | RawCount::Other(_) => None,
    })
}

/// Merged per-store record returned to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub shop_id: i64,
    pub name: String,
    pub name_en: String,
    pub address: String,
    pub region: String,
    pub area: String,
    pub store_status: String,
    pub waiting_group: u32,
    pub store_queue: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub longitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Store {
    #[must_use]
    pub fn status(&self) -> StoreStatus {
        StoreStatus::parse(&self.store_status)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status() == StoreStatus::Open
    }

    #[must_use]
    pub fn priority(&self) -> QueuePriority {
        QueuePriority::from_waiting_group(self.waiting_group)
    }
}

/// Known values of the upstream `storeStatus` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Open,
    Closed,
    Busy,
    Maintenance,
    Unknown,
}

impl StoreStatus {
    /// Case-insensitive; anything unrecognised is [`StoreStatus::Unknown`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Self::Open,
            "CLOSED" => Self::Closed,
            "BUSY" => Self::Busy,
            "MAINTENANCE" => Self::Maintenance,
            _ => Self::Unknown,
        }
    }
}

/// Queue pressure bucket derived from the waiting-group count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QueuePriority {
    /// 0–20 groups.
    Low,
    /// 21–50 groups.
    Medium,
    /// 51–100 groups.
    High,
    /// More than 100 groups.
    Extreme,
}

impl QueuePriority {
    #[must_use]
    pub fn from_waiting_group(waiting_group: u32) -> Self {
        match waiting_group {
            0..=20 => Self::Low,
            21..=50 => Self::Medium,
            51..=100 => Self::High,
            _ => Self::Extreme,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Extreme => "EXTREME",
        }
    }
}

impl std::fmt::Display for QueuePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic query sent to the store-list feed.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreListParams {
    pub latitude: f64,
    pub longitude: f64,
    pub numresults: u32,
    pub region: String,
}

impl Default for StoreListParams {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            numresults: DEFAULT_NUM_RESULTS,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl StoreListParams {
    /// Fills any missing or unusable value with the Hong Kong defaults.
    ///
    /// Non-finite coordinates, a zero result count, and a blank region are
    /// all treated as absent.
    #[must_use]
    pub fn from_optional(
        latitude: Option<f64>,
        longitude: Option<f64>,
        numresults: Option<u32>,
        region: Option<String>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            latitude: latitude
                .filter(|v| v.is_finite())
                .unwrap_or(defaults.latitude),
            longitude: longitude
                .filter(|v| v.is_finite())
                .unwrap_or(defaults.longitude),
            numresults: numresults.filter(|n| *n > 0).unwrap_or(defaults.numresults),
            region: region
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .unwrap_or(defaults.region),
        }
    }

    /// Query pairs in the order the store-list feed documents them.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("numresults", self.numresults.to_string()),
            ("region", self.region.clone()),
        ]
    }

    /// Stable string key for caching store-list responses per query.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_list_entry_tolerates_missing_optional_fields() {
        let entry: RawStoreListEntry =
            serde_json::from_str(r#"{"id": 34, "storeStatus": null}"#).expect("parse");
        assert_eq!(entry.id, 34);
        assert!(entry.name.is_none());
        assert!(entry.store_status.is_none());
        assert!(entry.waiting_group.is_none());
    }

    #[test]
    fn store_list_entry_reads_camel_case_fields() {
        let entry: RawStoreListEntry = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "銅鑼灣時代廣場店",
            "nameEn": "Causeway Bay Times Square",
            "storeStatus": "OPEN",
            "waitingGroup": 28,
            "latitude": 22.278,
            "longitude": 114.182
        }))
        .expect("parse");
        assert_eq!(entry.name_en.as_deref(), Some("Causeway Bay Times Square"));
        assert_eq!(entry.waiting_group, Some(28));
        assert_eq!(entry.latitude, Some(22.278));
    }

    #[test]
    fn unusable_waiting_group_does_not_reject_the_roster() {
        let rows: Vec<RawStoreListEntry> = serde_json::from_value(serde_json::json!([
            { "id": 1, "waitingGroup": -1 },
            { "id": 2, "waitingGroup": 12.0 },
            { "id": 3, "waitingGroup": 12.5 },
            { "id": 4, "waitingGroup": "7" },
            { "id": 5, "waitingGroup": "lots" },
            { "id": 6, "waitingGroup": null },
            { "id": 7, "waitingGroup": [3] },
            { "id": 8, "waitingGroup": 5_000_000_000_i64 }
        ]))
        .expect("roster parses");

        let counts: Vec<Option<u32>> = rows.iter().map(|r| r.waiting_group).collect();
        assert_eq!(
            counts,
            vec![None, Some(12), None, Some(7), None, None, None, None]
        );
    }

    #[test]
    fn queue_entry_tolerates_negative_waiting_group() {
        let entry: RawQueueEntry =
            serde_json::from_str(r#"{"storeQueue": ["1"], "waitingGroup": -4}"#).expect("parse");
        assert!(entry.waiting_group.is_none());
        assert_eq!(entry.store_queue, vec!["1".to_string()]);
    }

    #[test]
    fn queue_entry_defaults_to_empty_queue() {
        let entry: RawQueueEntry = serde_json::from_str(r#"{"shopId": 58}"#).expect("parse");
        assert!(entry.store_queue.is_empty());
        assert_eq!(entry.shop_id, Some(58));
    }

    #[test]
    fn store_serializes_with_dashboard_keys() {
        let store = Store {
            shop_id: 34,
            name: "香港仔利港商場店".to_string(),
            name_en: "Aberdeen Port Centre".to_string(),
            address: String::new(),
            region: "香港島".to_string(),
            area: "南區".to_string(),
            store_status: "OPEN".to_string(),
            waiting_group: 62,
            store_queue: vec!["265".to_string()],
            latitude: None,
            longitude: None,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&store).expect("serialize");
        assert_eq!(json["shopId"], 34);
        assert_eq!(json["nameEn"], "Aberdeen Port Centre");
        assert_eq!(json["waitingGroup"], 62);
        assert_eq!(json["storeQueue"][0], "265");
        assert!(json.get("latitude").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn queue_priority_buckets() {
        assert_eq!(QueuePriority::from_waiting_group(0), QueuePriority::Low);
        assert_eq!(QueuePriority::from_waiting_group(20), QueuePriority::Low);
        assert_eq!(QueuePriority::from_waiting_group(21), QueuePriority::Medium);
        assert_eq!(QueuePriority::from_waiting_group(50), QueuePriority::Medium);
        assert_eq!(QueuePriority::from_waiting_group(51), QueuePriority::High);
        assert_eq!(QueuePriority::from_waiting_group(100), QueuePriority::High);
        assert_eq!(QueuePriority::from_waiting_group(101), QueuePriority::Extreme);
    }

    #[test]
    fn store_status_parse_is_case_insensitive() {
        assert_eq!(StoreStatus::parse("open"), StoreStatus::Open);
        assert_eq!(StoreStatus::parse("CLOSED"), StoreStatus::Closed);
        assert_eq!(StoreStatus::parse("Maintenance"), StoreStatus::Maintenance);
        assert_eq!(StoreStatus::parse("UNKNOWN"), StoreStatus::Unknown);
        assert_eq!(StoreStatus::parse("renovating"), StoreStatus::Unknown);
    }

    #[test]
    fn params_fall_back_to_defaults() {
        let params = StoreListParams::from_optional(None, Some(f64::NAN), Some(0), Some("  ".into()));
        assert_eq!(params, StoreListParams::default());
    }

    #[test]
    fn params_keep_supplied_values() {
        let params =
            StoreListParams::from_optional(Some(22.28), Some(114.15), Some(10), Some("HK".into()));
        assert!((params.latitude - 22.28).abs() < f64::EPSILON);
        assert_eq!(params.numresults, 10);
        assert_eq!(
            params.cache_key(),
            "latitude=22.28&longitude=114.15&numresults=10&region=HK"
        );
    }
}
