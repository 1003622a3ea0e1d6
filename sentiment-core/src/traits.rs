//! Common traits for the sentiment workspace.
//!
//! The remote provider is consumed as an opaque capability so that the
//! pipeline can be driven by the production network client or by an
//! in-process double without changes.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::SentimentResult;

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for a remote sentiment-analysis service.
///
/// Implementations might use:
/// - The Google Cloud Natural Language REST API (production)
/// - A fixed, in-process result (tests and offline runs)
///
/// Implementations must be safe to call concurrently; each call is independent.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Analyzes `text` and returns per-sentence scores.
    ///
    /// Errors are reported as [`SentimentError::Provider`](crate::SentimentError::Provider).
    async fn analyze(&self, text: &str) -> Result<SentimentResult>;

    /// Short human-readable name used in logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sentence;

    struct Echo;

    #[async_trait]
    impl SentimentProvider for Echo {
        async fn analyze(&self, text: &str) -> Result<SentimentResult> {
            Ok(SentimentResult::from_sentences(vec![Sentence::new(text, 0.0)]))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_provider_is_object_safe() {
        let provider: Box<dyn SentimentProvider> = Box::new(Echo);
        let result = provider.analyze("hello").await.unwrap();
        assert_eq!(result.sentences.len(), 1);
        assert_eq!(result.sentences[0].text, "hello");
        assert_eq!(provider.name(), "echo");
    }
}
