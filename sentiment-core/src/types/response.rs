//! Response shape returned to callers.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SentimentError;

/// Ordering applied to sentences by score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lowest score first.
    #[default]
    Ascending,
    /// Highest score first.
    Descending,
}

impl SortOrder {
    /// Interprets an `order` query value.
    ///
    /// Only `desc` (any case) selects descending; anything else, including a
    /// missing value, is ascending.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

impl FromStr for SortOrder {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(SentimentError::Config(format!(
                "unknown sort order '{}', expected asc or desc",
                other
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("asc"),
            SortOrder::Descending => f.write_str("desc"),
        }
    }
}

/// One entry of the shaped response.
///
/// Serialized as a single-key JSON object mapping the sentence text to its
/// score, e.g. `{"what a day": 0.8}`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredText {
    /// Sentence text.
    pub text: String,
    /// Polarity score.
    pub score: f32,
}

impl ScoredText {
    /// Creates a new entry.
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

impl Serialize for ScoredText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.text, &self.score)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoredText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoredTextVisitor;

        impl<'de> Visitor<'de> for ScoredTextVisitor {
            type Value = ScoredText;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object with exactly one text -> score entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (text, score) = map
                    .next_entry::<String, f32>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                if map.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }
                Ok(ScoredText { text, score })
            }
        }

        deserializer.deserialize_map(ScoredTextVisitor)
    }
}

/// Shaped response: ordered, possibly truncated, scored texts.
pub type Response = Vec<ScoredText>;
