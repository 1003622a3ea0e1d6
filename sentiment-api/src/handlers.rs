//! API route handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use tracing::{debug, warn};

use sentiment_core::constants::NO_LIMIT;
use sentiment_core::types::{Response, SortOrder};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// Parses the `limit` query value. Missing means no limit; an unparsable value
/// is logged and also means no limit.
pub(crate) fn parse_limit(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return NO_LIMIT;
    };
    match raw.trim().parse::<i64>() {
        Ok(limit) => limit,
        Err(e) => {
            warn!(limit = raw, error = %e, "Invalid limit, returning all results");
            NO_LIMIT
        }
    }
}

/// POST /api
///
/// The body is parsed by hand so that any malformed payload is a 400 with the
/// same opaque error body as every other failure.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<Json<Response>> {
    let request: AnalyzeRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Malformed request body");
        ApiError::bad_request("Malformed request body")
    })?;

    let query = AnalyzeQuery::from_pairs(pairs);
    let order = SortOrder::from_query(query.order.as_deref());
    let limit = parse_limit(query.limit.as_deref());

    // Fires if the client goes away and this future is dropped
    let ctx = state.request_context();
    let _guard = ctx.drop_guard();

    let response = state
        .service
        .handle(&ctx, &request.content, order, limit)
        .await?;

    debug!(entries = response.len(), "Analyzed content");
    Ok(Json(response))
}

/// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let cache = state.service.cache().map(|c| c.stats());

    Json(StatusResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cache_entries: cache.as_ref().map_or(0, |s| s.entries),
        cache,
    })
}
