//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness
        .route("/status", get(handlers::status))
        // Sentiment
        .route("/api", post(handlers::analyze))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sentiment_core::types::{Sentence, SentimentResult};
    use sentiment_language::StaticProvider;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::state::ApiConfig;

    fn worked_example() -> SentimentResult {
        SentimentResult::from_sentences(vec![
            Sentence::new("word1", 0.8).with_magnitude(3.0),
            Sentence::new("word2", 0.8).with_magnitude(1.0),
            Sentence::new("word3", 0.2).with_magnitude(2.2),
            Sentence::new("word4", -0.8).with_magnitude(1.0),
            Sentence::new("word5", 0.0).with_magnitude(1.0),
        ])
    }

    fn test_app_with(provider: StaticProvider) -> (Arc<StaticProvider>, Router) {
        let provider = Arc::new(provider);
        let state = Arc::new(AppState::with_provider(ApiConfig::default(), provider.clone()));
        (provider, create_router(state))
    }

    fn test_app() -> Router {
        test_app_with(StaticProvider::new(worked_example())).1
    }

    fn analyze_request(query: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api{}", query))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const CONTENT: &str = r#"{"content":"word1 word2 word3 word4 word5"}"#;

    #[tokio::test]
    async fn test_status() {
        let response = test_app()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cache_entries"], 0);
        assert!(body["uptime_seconds"].is_u64());
    }

    #[tokio::test]
    async fn test_analyze_descending() {
        let response = test_app()
            .oneshot(analyze_request("?order=desc&limit=3", CONTENT))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let expected = json!([{"word1": 0.8}, {"word2": 0.8}, {"word3": 0.2}]);
        assert_eq!(body.to_string(), expected.to_string());
    }

    #[tokio::test]
    async fn test_analyze_ascending_is_default() {
        let response = test_app()
            .oneshot(analyze_request("?limit=3", CONTENT))
            .await
            .unwrap();

        let body = json_body(response).await;
        let keys: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry.as_object().unwrap().keys().next().unwrap().clone())
            .collect();
        assert_eq!(keys, ["word4", "word5", "word3"]);
    }

    #[tokio::test]
    async fn test_order_is_case_insensitive() {
        let response = test_app()
            .oneshot(analyze_request("?order=DESC&limit=1", CONTENT))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body.to_string(), json!([{"word1": 0.8}]).to_string());
    }

    #[tokio::test]
    async fn test_invalid_limit_returns_everything() {
        let response = test_app()
            .oneshot(analyze_request("?order=desc&limit=abc", CONTENT))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_repeated_query_keys_use_first_value() {
        let response = test_app()
            .oneshot(analyze_request("?limit=abc&limit=2", CONTENT))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 5);

        let response = test_app()
            .oneshot(analyze_request("?order=desc&order=asc&limit=1", CONTENT))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.to_string(), json!([{"word1": 0.8}]).to_string());
    }

    #[tokio::test]
    async fn test_requests_fail_after_shutdown() {
        let provider = Arc::new(StaticProvider::new(worked_example()));
        let state = Arc::new(AppState::with_provider(ApiConfig::default(), provider.clone()));
        state.shutdown();

        let response = create_router(state)
            .oneshot(analyze_request("", CONTENT))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        for body in ["not json", "{}", r#"{"content": 5}"#, ""] {
            let response = test_app().oneshot(analyze_request("", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {:?}", body);
        }
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_provider_failure_is_opaque() {
        let (_provider, app) = test_app_with(StaticProvider::failing("upstream said no"));

        let response = app.oneshot(analyze_request("", CONTENT)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("upstream said no"));
    }

    #[tokio::test]
    async fn test_repeat_request_served_from_cache() {
        let (provider, app) = test_app_with(StaticProvider::new(worked_example()));

        let first = app
            .clone()
            .oneshot(analyze_request("?order=desc", r#"{"content":"Hello"}"#))
            .await
            .unwrap();
        let second = app
            .clone()
            .oneshot(analyze_request("?order=desc", r#"{"content":"  hello "}"#))
            .await
            .unwrap();

        assert_eq!(json_body(first).await, json_body(second).await);
        assert_eq!(provider.calls(), 1);

        let status = app
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(status).await;
        assert_eq!(body["cache_entries"], 1);
        assert_eq!(body["cache"]["hits"], 1);
    }
}
