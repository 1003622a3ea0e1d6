//! Provider result types.

use serde::{Deserialize, Serialize};

/// Polarity and strength of a piece of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Polarity in `[-1.0, 1.0]`, negative to positive.
    pub score: f32,
    /// Overall strength of emotion, unbounded and non-negative.
    pub magnitude: f32,
}

/// A sentence as scored by the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// The sentence text exactly as the provider split it.
    pub text: String,
    /// Polarity score.
    pub score: f32,
    /// Strength of emotion for this sentence.
    #[serde(default)]
    pub magnitude: f32,
}

impl Sentence {
    /// Creates a sentence with a score and zero magnitude.
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
            magnitude: 0.0,
        }
    }

    /// Sets the magnitude.
    pub fn with_magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = magnitude;
        self
    }
}

/// Full result of one provider call.
///
/// The order of `sentences` is whatever the provider returned and carries no
/// meaning; the shaper re-establishes order by score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Per-sentence scores.
    pub sentences: Vec<Sentence>,
    /// Whole-document sentiment, if the provider reported one.
    #[serde(default)]
    pub document: Option<Sentiment>,
    /// Language detected (or assumed) by the provider.
    #[serde(default)]
    pub language: Option<String>,
}

impl SentimentResult {
    /// Creates a result holding only sentences.
    pub fn from_sentences(sentences: Vec<Sentence>) -> Self {
        Self {
            sentences,
            document: None,
            language: None,
        }
    }

    /// Returns true if the provider found no sentences.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_builder() {
        let s = Sentence::new("hello", 0.5).with_magnitude(1.5);
        assert_eq!(s.text, "hello");
        assert_eq!(s.score, 0.5);
        assert_eq!(s.magnitude, 1.5);
    }

    #[test]
    fn test_result_empty() {
        assert!(SentimentResult::default().is_empty());
        assert!(!SentimentResult::from_sentences(vec![Sentence::new("a", 0.1)]).is_empty());
    }

    #[test]
    fn test_result_json_defaults() {
        let result: SentimentResult =
            serde_json::from_str(r#"{"sentences":[{"text":"a","score":0.25}]}"#).unwrap();
        assert_eq!(result.sentences[0].magnitude, 0.0);
        assert!(result.document.is_none());
        assert!(result.language.is_none());
    }
}
