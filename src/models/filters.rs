use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Resolved fear intensity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScareLevel {
    Light,
    Normal,
    Strong,
}

impl ScareLevel {
    /// Candidates for a surprise draw, in draw-index order
    pub const ALL: [ScareLevel; 3] = [ScareLevel::Light, ScareLevel::Normal, ScareLevel::Strong];
}

/// Scare filter as the client sent it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScareInput {
    Level(ScareLevel),
    Surprise,
}

impl ScareInput {
    /// Unknown values fall back to `normal`
    pub fn parse(raw: &str) -> Self {
        match raw {
            "light" => ScareInput::Level(ScareLevel::Light),
            "strong" => ScareInput::Level(ScareLevel::Strong),
            "surprise" => ScareInput::Surprise,
            _ => ScareInput::Level(ScareLevel::Normal),
        }
    }

    /// Replaces `surprise` with a uniform draw over [`ScareLevel::ALL`].
    /// Concrete levels consume no randomness.
    pub fn resolve(self, random: &dyn RandomSource) -> ScareLevel {
        match self {
            ScareInput::Level(level) => level,
            ScareInput::Surprise => ScareLevel::ALL[random.below(ScareLevel::ALL.len())],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeRange {
    Short,
    Medium,
    Long,
}

impl RuntimeRange {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "short" => RuntimeRange::Short,
            "long" => RuntimeRange::Long,
            _ => RuntimeRange::Medium,
        }
    }
}

/// Release-date window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    New,
    Classic,
    Any,
}

impl Era {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "new" => Era::New,
            "classic" => Era::Classic,
            _ => Era::Any,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ja,
    En,
    Ko,
}

impl Locale {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "en" => Locale::En,
            "ko" => Locale::Ko,
            _ => Locale::Ja,
        }
    }

    /// TMDB `language` parameter value
    pub fn language_code(self) -> &'static str {
        match self {
            Locale::Ja => "ja-JP",
            Locale::En => "en-US",
            Locale::Ko => "ko-KR",
        }
    }
}

/// Parsed discovery filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub scare: ScareInput,
    pub runtime: RuntimeRange,
    pub era: Era,
    pub locale: Locale,
}

/// Raw discovery query values, defaults already applied.
///
/// The raw strings are kept so the cache key reflects exactly what the client
/// asked for, including `surprise` and values the parser does not recognise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverRequest {
    pub scare: String,
    pub runtime: String,
    pub era: String,
    pub locale: String,
}

/// Value of the query parameter `name`.
///
/// A parameter given more than once keeps every value joined by `,`, which no
/// filter parser recognises, so it falls back to that filter's default.
pub fn query_value(pairs: &[(String, String)], name: &str) -> Option<String> {
    let values: Vec<&str> = pairs
        .iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .collect();

    (!values.is_empty()).then(|| values.join(","))
}

fn default_scare() -> String {
    "normal".to_string()
}

fn default_runtime() -> String {
    "medium".to_string()
}

fn default_era() -> String {
    "any".to_string()
}

fn default_locale() -> String {
    "ja".to_string()
}

impl Default for DiscoverRequest {
    fn default() -> Self {
        Self {
            scare: default_scare(),
            runtime: default_runtime(),
            era: default_era(),
            locale: default_locale(),
        }
    }
}

impl DiscoverRequest {
    pub fn new(scare: &str, runtime: &str, era: &str) -> Self {
        Self {
            scare: scare.to_string(),
            runtime: runtime.to_string(),
            era: era.to_string(),
            ..Self::default()
        }
    }

    /// Builds a request from raw query pairs, defaulting absent parameters
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            scare: query_value(pairs, "scare").unwrap_or_else(default_scare),
            runtime: query_value(pairs, "runtime").unwrap_or_else(default_runtime),
            era: query_value(pairs, "era").unwrap_or_else(default_era),
            locale: query_value(pairs, "locale").unwrap_or_else(default_locale),
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    pub fn filters(&self) -> Filters {
        Filters {
            scare: ScareInput::parse(&self.scare),
            runtime: RuntimeRange::parse(&self.runtime),
            era: Era::parse(&self.era),
            locale: Locale::parse(&self.locale),
        }
    }
}
