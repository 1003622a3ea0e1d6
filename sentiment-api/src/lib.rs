//! # Sentiment API Server
//!
//! HTTP front end for the sentiment pipeline.
//!
//! ## Endpoints
//!
//! - `POST /api?order={asc|desc}&limit={n}` - Analyze `{"content": "..."}` and
//!   return `[{"sentence": score}, ...]`
//! - `GET /status` - Liveness and cache counters
//!
//! ## Example
//!
//! ```rust,ignore
//! use sentiment_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::new(ApiConfig::from_env())?;
//! server.run("0.0.0.0:8080".parse()?).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Request, Router};
use sentiment_core::error::Result;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span};
use uuid::Uuid;

/// API server for the sentiment service.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server backed by the Google Natural Language API.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::with_state(Arc::new(AppState::new(config)?)))
    }

    /// Creates a server around prepared state.
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Creates the router with all routes and layers configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
            info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %Uuid::new_v4(),
            )
        });

        create_router(self.state.clone())
            .layer(RequestBodyLimitLayer::new(self.state.config.max_body_bytes))
            .layer(cors)
            .layer(trace)
    }

    /// Runs the server until Ctrl-C, sweeping the cache in the background.
    ///
    /// On Ctrl-C every in-flight request context is cancelled, so pending
    /// provider calls end promptly while connections drain.
    pub async fn run(self, addr: SocketAddr) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Sentiment API server listening on {}", addr);

        let stop = CancellationToken::new();
        let reaper = self.state.service.spawn_cache_reaper(stop.clone());

        let state = self.state.clone();
        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                state.shutdown();
            })
            .await;

        stop.cancel();
        if let Some(handle) = reaper {
            if let Err(e) = handle.await {
                error!(error = %e, "Cache reaper task failed");
            }
        }

        info!("Server stopped");
        served?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
