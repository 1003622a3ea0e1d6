//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use sentiment_cache::CacheStats;

/// Body of `POST /api`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Text to analyze
    pub content: String,
}

/// Query string of `POST /api`.
///
/// Both fields stay raw strings so a bad value never rejects the request.
#[derive(Debug, Default, PartialEq)]
pub struct AnalyzeQuery {
    /// `desc` for descending, anything else ascending
    pub order: Option<String>,
    /// Maximum number of entries, negative for all
    pub limit: Option<String>,
}

impl AnalyzeQuery {
    /// Picks `order` and `limit` out of decoded query pairs. A repeated key
    /// keeps its first value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "order" => &mut query.order,
                "limit" => &mut query.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Response for `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always "ok"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the server started
    pub uptime_seconds: u64,
    /// Entries currently cached
    pub cache_entries: usize,
    /// Cache counters, absent when caching is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}
