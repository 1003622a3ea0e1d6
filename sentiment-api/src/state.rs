//! App state: sentiment pipeline, config.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sentiment_core::constants::{DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_MAX_BODY_BYTES};
use sentiment_core::context::RequestContext;
use sentiment_core::error::Result;
use sentiment_core::traits::SentimentProvider;
use sentiment_language::{GoogleLanguageClient, LanguageConfig};
use sentiment_service::{SentimentService, ServiceConfig};
use tracing::warn;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Pipeline settings (provider timeout, cache)
    pub service: ServiceConfig,
    /// Google Natural Language client settings
    pub language: LanguageConfig,
    /// Per-request deadline in milliseconds
    pub http_timeout_ms: u64,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            language: LanguageConfig::default(),
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ApiConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds a config from a variable lookup. Unset variables keep their
    /// defaults; unparsable ones are logged and ignored.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ms) = parse_var(&var, "SENTIMENT_REQUEST_TIMEOUT_MS") {
            config.service.request_timeout_ms = ms;
        }
        if let Some(enabled) = var("SENTIMENT_CACHE_ENABLED") {
            config.service.cache_enabled = enabled != "false" && enabled != "0";
        }
        if let Some(mb) = parse_var(&var, "SENTIMENT_CACHE_MAX_SIZE_MB") {
            config.service.cache.max_size_mb = mb;
        }
        if let Some(secs) = parse_var::<u64>(&var, "SENTIMENT_CACHE_ENTRY_TTL_SECS") {
            config.service.cache.entry_ttl_ms = secs.saturating_mul(1000);
        }
        if let Some(ms) = parse_var(&var, "SENTIMENT_HTTP_TIMEOUT_MS") {
            config.http_timeout_ms = ms;
        }
        if let Some(bytes) = parse_var(&var, "SENTIMENT_MAX_BODY_BYTES") {
            config.max_body_bytes = bytes;
        }

        if let Some(url) = var("LANGUAGE_API_URL") {
            config.language.base_url = url;
        }
        config.language.api_key = var("GOOGLE_API_KEY").filter(|k| !k.is_empty());
        config.language.access_token = var("GOOGLE_ACCESS_TOKEN").filter(|t| !t.is_empty());
        config.language.language = var("SENTIMENT_LANGUAGE").filter(|l| !l.is_empty());

        config
    }

    /// Per-request deadline as a `Duration`.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = var(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(name, value = %raw, "Ignoring unparsable environment variable");
            None
        }
    }
}

/// Shared state behind every handler.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// The sentiment pipeline
    pub service: SentimentService,
    /// Process start, for uptime reporting
    pub started_at: Instant,
    /// Parent of every request context; cancelled on shutdown
    root: RequestContext,
}

impl AppState {
    /// Builds state backed by the Google Natural Language API.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = GoogleLanguageClient::with_config(config.language.clone())?;
        Ok(Self::with_provider(config, Arc::new(client)))
    }

    /// Builds state around any provider.
    pub fn with_provider(config: ApiConfig, provider: Arc<dyn SentimentProvider>) -> Self {
        let service = SentimentService::with_config(provider, config.service.clone());
        Self {
            config,
            service,
            started_at: Instant::now(),
            root: RequestContext::new(),
        }
    }

    /// Context for one inbound request: bounded by the HTTP timeout and
    /// cancelled along with the server.
    pub fn request_context(&self) -> RequestContext {
        self.root.child(Some(self.config.http_timeout()))
    }

    /// Cancels every in-flight request context.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutting_down(&self) -> bool {
        self.root.is_done()
    }
}
