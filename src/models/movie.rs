use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RawItem;

const UNTITLED: &str = "Untitled";

/// Fixed-shape movie returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedMovie {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub poster_path: Option<String>,
}

fn string_field<'a>(raw: &'a RawItem, field: &str) -> Option<&'a str> {
    raw.get(field).and_then(Value::as_str)
}

impl From<&RawItem> for NormalizedMovie {
    /// Total conversion: every record maps to a movie, missing fields take defaults
    fn from(raw: &RawItem) -> Self {
        Self {
            id: raw.get("id").and_then(Value::as_i64).unwrap_or_default(),
            title: string_field(raw, "title")
                .or_else(|| string_field(raw, "name"))
                .unwrap_or(UNTITLED)
                .to_string(),
            overview: string_field(raw, "overview").unwrap_or_default().to_string(),
            release_date: string_field(raw, "release_date")
                .unwrap_or_default()
                .to_string(),
            poster_path: string_field(raw, "poster_path").map(str::to_string),
        }
    }
}

/// Body of a successful `GET /discover`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoverResponse {
    pub results: Vec<NormalizedMovie>,
    pub picked: Option<NormalizedMovie>,
    pub cached: bool,
    /// Only serialized when the response came from an expired entry
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
}

impl DiscoverResponse {
    pub fn new(results: &[RawItem], picked: Option<&RawItem>, cached: bool, stale: bool) -> Self {
        Self {
            results: results.iter().map(NormalizedMovie::from).collect(),
            picked: picked.map(NormalizedMovie::from),
            cached,
            stale,
        }
    }
}

/// Body of a successful `GET /movie`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MovieDetails {
    pub runtime: Option<i64>,
    pub overview: Option<String>,
    pub title: Option<String>,
}
