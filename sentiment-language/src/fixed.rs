//! In-process provider with a fixed outcome.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use sentiment_core::error::{Result, SentimentError};
use sentiment_core::traits::SentimentProvider;
use sentiment_core::types::SentimentResult;

enum Outcome {
    Succeed(SentimentResult),
    Fail(String),
}

/// Provider that answers every call with the same result or the same failure.
///
/// Records the texts it was asked about, and can be slowed down to exercise
/// timeouts and cancellation.
pub struct StaticProvider {
    outcome: Outcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl StaticProvider {
    /// Creates a provider that always returns `result`.
    pub fn new(result: SentimentResult) -> Self {
        Self::with_outcome(Outcome::Succeed(result))
    }

    /// Creates a provider that always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Fail(reason.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Delays every answer by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl SentimentProvider for StaticProvider {
    async fn analyze(&self, text: &str) -> Result<SentimentResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(text.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            Outcome::Succeed(result) => Ok(result.clone()),
            Outcome::Fail(reason) => Err(SentimentError::Provider(reason.clone())),
        }
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
