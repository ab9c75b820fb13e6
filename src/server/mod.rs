//! HTTP surface
//!
//! `GET /api/service-map` rebuilds the graph from a fresh cluster listing on
//! every request. Failures answer with `{"detail": ...}`: upstream fetch errors
//! keep the API server's status, everything else is a 500 whose full detail
//! only goes to the log.

use crate::error::ServiceMapError;
use crate::graph::{FetchMode, ServiceMap, build_service_map};
use crate::kube::ResourceFetcher;
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Route serving the service map
pub const SERVICE_MAP_PATH: &str = "/api/service-map";
/// Liveness route
pub const HEALTH_PATH: &str = "/health";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    fetcher: Arc<dyn ResourceFetcher>,
    fetch_mode: FetchMode,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, fetch_mode: FetchMode) -> Self {
        Self {
            fetcher,
            fetch_mode,
        }
    }
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SERVICE_MAP_PATH, get(service_map))
        .route(HEALTH_PATH, get(health))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C or SIGTERM
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Serving service map on http://{}{}", addr, SERVICE_MAP_PATH);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn service_map(State(state): State<AppState>) -> Result<Json<ServiceMap>, ServiceMapError> {
    let map = build_service_map(state.fetcher.as_ref(), state.fetch_mode).await?;
    Ok(Json(map))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

impl IntoResponse for ServiceMapError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ServiceMapError::UpstreamFetch(err) => {
                tracing::warn!("Failed to list {} resources: {}", err.kind(), err);
                let status = err
                    .status()
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, self.to_string())
            }
            ServiceMapError::Unexpected(err) => {
                tracing::error!("An unexpected error occurred: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An unexpected error occurred: {}", err),
                )
            }
        };

        (status, Json(ErrorDetail { detail })).into_response()
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!("Handler panicked: {}", message);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorDetail {
            detail: format!("An unexpected error occurred: {}", message),
        }),
    )
        .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
