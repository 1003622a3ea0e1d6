//! Google Cloud Natural Language client.
//!
//! Calls `POST {base_url}/v1/documents:analyzeSentiment` with either an API
//! key (`?key=`) or an OAuth access token (Bearer auth).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use sentiment_core::error::{Result, SentimentError};
use sentiment_core::traits::SentimentProvider;
use sentiment_core::types::{Sentence, Sentiment, SentimentResult};

const DEFAULT_BASE_URL: &str = "https://language.googleapis.com";
const ANALYZE_SENTIMENT_PATH: &str = "v1/documents:analyzeSentiment";

/// Language API client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// API root, e.g. "https://language.googleapis.com"
    pub base_url: String,
    /// API key sent as the `key` query parameter
    pub api_key: Option<String>,
    /// OAuth access token sent as a Bearer token
    pub access_token: Option<String>,
    /// Transport timeout in milliseconds
    pub timeout_ms: u64,
    /// Language hint (ISO-639-1); auto-detected when None
    pub language: Option<String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            access_token: None,
            timeout_ms: 30_000,
            language: None,
        }
    }
}

impl LanguageConfig {
    /// Creates config pointing at the given API root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Adds an API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Adds an OAuth access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets a language hint.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Client for the Natural Language sentiment endpoint.
///
/// Wraps a pooled `reqwest::Client`; clones of the underlying pool are shared,
/// and concurrent calls are independent of each other.
pub struct GoogleLanguageClient {
    config: LanguageConfig,
    endpoint: Url,
    http_client: reqwest::Client,
}

impl GoogleLanguageClient {
    /// Creates a new client with the given config.
    pub fn with_config(config: LanguageConfig) -> Result<Self> {
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&base)
            .and_then(|u| u.join(ANALYZE_SENTIMENT_PATH))
            .map_err(|e| SentimentError::Config(format!("invalid language API URL '{}': {}", config.base_url, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SentimentError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            endpoint,
            http_client,
        })
    }

    /// The fully resolved analyze endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_request<'a>(&'a self, text: &'a str) -> AnalyzeSentimentRequest<'a> {
        AnalyzeSentimentRequest {
            document: Document {
                kind: "PLAIN_TEXT",
                content: text,
                language: self.config.language.as_deref(),
            },
            encoding_type: "UTF8",
        }
    }
}

#[async_trait]
impl SentimentProvider for GoogleLanguageClient {
    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn analyze(&self, text: &str) -> Result<SentimentResult> {
        let mut request = self
            .http_client
            .post(self.endpoint.clone())
            .json(&self.build_request(text));

        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SentimentError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(SentimentError::Provider(format!(
                "analyzeSentiment failed with status {}: {}",
                status, message
            )));
        }

        let wire: AnalyzeSentimentResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Provider(format!("malformed response: {}", e)))?;

        debug!(sentences = wire.sentences.len(), language = ?wire.language, "Received sentiment");
        Ok(wire.into())
    }

    fn name(&self) -> &'static str {
        "google-language"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE FORMAT
// ═══════════════════════════════════════════════════════════════════════════════
// Proto3 JSON omits zero values, so every numeric field defaults.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentRequest<'a> {
    document: Document<'a>,
    encoding_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentResponse {
    #[serde(default)]
    document_sentiment: Option<WireSentiment>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    sentences: Vec<WireSentence>,
}

#[derive(Debug, Deserialize)]
struct WireSentence {
    text: TextSpan,
    #[serde(default)]
    sentiment: Option<WireSentiment>,
}

#[derive(Debug, Deserialize)]
struct TextSpan {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
struct WireSentiment {
    #[serde(default)]
    score: f32,
    #[serde(default)]
    magnitude: f32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl From<WireSentiment> for Sentiment {
    fn from(w: WireSentiment) -> Self {
        Sentiment {
            score: w.score,
            magnitude: w.magnitude,
        }
    }
}

impl From<AnalyzeSentimentResponse> for SentimentResult {
    fn from(wire: AnalyzeSentimentResponse) -> Self {
        let sentences = wire
            .sentences
            .into_iter()
            .map(|s| {
                let sentiment = s.sentiment.unwrap_or_default();
                Sentence::new(s.text.content, sentiment.score).with_magnitude(sentiment.magnitude)
            })
            .collect();

        SentimentResult {
            sentences,
            document: wire.document_sentiment.map(Sentiment::from),
            language: wire.language.filter(|l| !l.is_empty()),
        }
    }
}
