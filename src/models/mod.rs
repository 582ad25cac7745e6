use serde::{Deserialize, Deserializer};

pub mod filters;
pub mod movie;

pub use filters::{
    query_value, DiscoverRequest, Era, Filters, Locale, RuntimeRange, ScareInput, ScareLevel,
};
pub use movie::{DiscoverResponse, MovieDetails, NormalizedMovie};

/// Unnormalized catalog record, kept as-is in the cache
pub type RawItem = serde_json::Value;

// ============================================================================
// TMDB API Types
// ============================================================================

/// One page of `GET /discover/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverPage {
    /// A body without `results`, or with `results: null`, is an empty page
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<RawItem>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawItem>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Subset of `GET /movie/{id}` used by the detail lookup
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawMovieDetails {
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawMovieDetails {
    /// Overview with empty strings treated as missing
    pub fn overview_text(&self) -> Option<&str> {
        self.overview.as_deref().filter(|o| !o.is_empty())
    }
}
