//! Cache-fronted sentiment pipeline.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use sentiment_cache::{CacheConfig, ResultCache};
use sentiment_core::constants::DEFAULT_REQUEST_TIMEOUT_MS;
use sentiment_core::context::RequestContext;
use sentiment_core::error::{Result, SentimentError};
use sentiment_core::traits::SentimentProvider;
use sentiment_core::types::{Response, SentimentResult, SortOrder};

use crate::codec;
use crate::key::{normalize_key, CacheKey};
use crate::shaper::shape;

/// Pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Timeout around each provider call in milliseconds
    pub request_timeout_ms: u64,
    /// Whether results are cached
    pub cache_enabled: bool,
    /// Cache configuration
    pub cache: CacheConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cache_enabled: true,
            cache: CacheConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Sets the provider call timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Replaces the cache configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Disables caching.
    pub fn no_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Provider call timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Sentiment pipeline: cache lookup, remote fallback, shaping.
///
/// Holds no mutable state of its own; the cache and provider are shared and
/// safe for concurrent use, so one instance serves every request.
pub struct SentimentService {
    provider: Arc<dyn SentimentProvider>,
    cache: Option<Arc<ResultCache>>,
    config: ServiceConfig,
}

impl SentimentService {
    /// Creates a service with default configuration.
    pub fn new(provider: Arc<dyn SentimentProvider>) -> Self {
        Self::with_config(provider, ServiceConfig::default())
    }

    /// Creates a service that builds its own cache from `config`.
    pub fn with_config(provider: Arc<dyn SentimentProvider>, config: ServiceConfig) -> Self {
        let cache = if config.cache_enabled {
            Some(Arc::new(ResultCache::with_config(config.cache.clone())))
        } else {
            None
        };

        Self {
            provider,
            cache,
            config,
        }
    }

    /// Creates a service around an existing, possibly shared, cache.
    pub fn with_cache(
        provider: Arc<dyn SentimentProvider>,
        cache: Arc<ResultCache>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            provider,
            cache: Some(cache),
            config,
        }
    }

    /// The cache, if caching is enabled.
    pub fn cache(&self) -> Option<&Arc<ResultCache>> {
        self.cache.as_ref()
    }

    /// The configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Analyzes `input` and returns the shaped response.
    ///
    /// The provider sees `input` verbatim; only the cache key is normalized.
    /// Fails with [`SentimentError::Cancelled`] if `ctx` is done before any
    /// work starts, while the provider is being called, or once a fresh result
    /// is in hand.
    #[instrument(skip(self, ctx, input))]
    pub async fn handle(
        &self,
        ctx: &RequestContext,
        input: &str,
        order: SortOrder,
        limit: i64,
    ) -> Result<Response> {
        if let Err(e) = ctx.check() {
            warn!(input, "Context cancelled");
            return Err(e);
        }

        let key = normalize_key(input);

        let result = match self.cached(&key) {
            Some(result) => result,
            None => {
                let fresh = self.fetch(ctx, input).await?;
                self.store(&key, &fresh);
                fresh
            }
        };

        if let Err(e) = ctx.check() {
            warn!(input, "Context cancelled after remote call");
            return Err(e);
        }

        Ok(shape(&result.sentences, order, limit))
    }

    fn cached(&self, key: &CacheKey) -> Option<SentimentResult> {
        let cache = self.cache.as_ref()?;
        let bytes = cache.get(key.as_str())?;

        match codec::decode(&bytes) {
            Ok(result) => {
                debug!(key = %key, "Cache hit");
                Some(result)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                cache.remove(key.as_str());
                None
            }
        }
    }

    async fn fetch(&self, ctx: &RequestContext, input: &str) -> Result<SentimentResult> {
        let timeout = self.config.request_timeout();
        debug!(provider = self.provider.name(), "Cache miss, calling provider");

        tokio::select! {
            biased;

            _ = ctx.done() => {
                warn!(input, "Context cancelled during remote call");
                Err(SentimentError::Cancelled)
            }
            outcome = tokio::time::timeout(timeout, self.provider.analyze(input)) => match outcome {
                Ok(Ok(result)) => Ok(result),
                Ok(Err(e)) => {
                    error!(error = %e, input, "Remote API call failure");
                    Err(if e.is_provider_error() {
                        e
                    } else {
                        SentimentError::Provider(e.to_string())
                    })
                }
                Err(_) => {
                    let timeout_ms = self.config.request_timeout_ms;
                    error!(timeout_ms, input, "Remote API call timed out");
                    Err(SentimentError::ProviderTimeout { timeout_ms })
                }
            },
        }
    }

    /// Best-effort write: failures are logged and dropped.
    fn store(&self, key: &CacheKey, result: &SentimentResult) {
        let Some(cache) = &self.cache else {
            return;
        };

        match codec::encode(result).and_then(|bytes| cache.set(key.as_str(), bytes)) {
            Ok(()) => debug!(key = %key, "Cached result"),
            Err(e) => warn!(key = %key, error = %e, "Dropping cache write"),
        }
    }

    /// Spawns a task that sweeps expired cache entries every clean window
    /// until `stop` is cancelled. Returns None when caching is disabled.
    pub fn spawn_cache_reaper(&self, stop: CancellationToken) -> Option<JoinHandle<()>> {
        let cache = self.cache.clone()?;
        let period = cache.config().clean_window();
        if period.is_zero() {
            return None;
        }

        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = interval.tick() => {
                        let reaped = cache.cleanup_expired();
                        if reaped > 0 {
                            debug!(reaped, "Swept expired cache entries");
                        }
                    }
                }
            }
            info!("Cache reaper stopped");
        }))
    }
}
