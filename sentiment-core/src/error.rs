//! Error types for the sentiment workspace.
//!
//! A single error hierarchy built with `thiserror`. Only cancellation and
//! provider failures are fatal to a request; cache-layer errors are absorbed
//! by the pipeline and never reach a caller.

use thiserror::Error;

/// Result type alias using `SentimentError`.
pub type Result<T> = std::result::Result<T, SentimentError>;

/// Main error type for all sentiment operations.
#[derive(Debug, Error)]
pub enum SentimentError {
    // ═══════════════════════════════════════════════════════════════════════════
    // REQUEST ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The caller abandoned the request or its deadline passed.
    #[error("Request cancelled")]
    Cancelled,

    // ═══════════════════════════════════════════════════════════════════════════
    // PROVIDER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The remote sentiment provider failed.
    #[error("Sentiment provider failed: {0}")]
    Provider(String),

    /// The remote call did not finish within the configured timeout.
    #[error("Sentiment provider timed out after {timeout_ms}ms")]
    ProviderTimeout {
        /// The timeout that elapsed
        timeout_ms: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A result could not be serialized for storage.
    #[error("Failed to encode result: {0}")]
    Encode(String),

    /// Stored bytes could not be turned back into a result.
    #[error("Failed to decode cached result: {0}")]
    Decode(String),

    /// An entry does not fit into a cache shard.
    #[error("Cache entry of {size} bytes exceeds shard capacity of {limit} bytes")]
    CacheEntryTooLarge {
        /// Encoded entry size in bytes
        size: usize,
        /// Per-shard capacity in bytes
        limit: usize,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & IO
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error, e.g. the listener could not be bound.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SentimentError {
    /// Returns true if this error must abort the request it occurred in.
    pub fn is_request_fatal(&self) -> bool {
        matches!(
            self,
            SentimentError::Cancelled
                | SentimentError::Provider(_)
                | SentimentError::ProviderTimeout { .. }
        )
    }

    /// Returns true if this error came from the cache layer.
    ///
    /// These are recovered locally by falling back to the remote provider.
    pub fn is_cache_error(&self) -> bool {
        matches!(
            self,
            SentimentError::Encode(_)
                | SentimentError::Decode(_)
                | SentimentError::CacheEntryTooLarge { .. }
        )
    }

    /// Returns true if the remote provider is at fault.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            SentimentError::Provider(_) | SentimentError::ProviderTimeout { .. }
        )
    }
}
