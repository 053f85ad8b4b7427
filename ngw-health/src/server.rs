//! Health check HTTP server (spec.md §6 "Health endpoint"): three routes
//! over the lifecycle gate's `ready` flag, built on `axum` with a
//! `tower-http::TimeoutLayer`.

use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;

use crate::config::HealthConfig;
use crate::error::HealthError;
use crate::gate::LifecycleGate;

pub struct HealthServer {
    listener: TcpListener,
    router: Router,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
}

impl HealthServer {
    /// # Errors
    ///
    /// Returns an error if binding to the configured port fails.
    pub async fn new(config: &HealthConfig, gate: Arc<LifecycleGate>) -> Result<Self, HealthError> {
        let address = config.listen_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| HealthError::Bind { address: address.clone(), source })?;

        tracing::info!(%address, "health server bound");

        let router = Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .with_state(gate)
            .layer(TimeoutLayer::new(Duration::from_secs(1)));

        Ok(Self { listener, router })
    }

    /// # Errors
    ///
    /// Returns an error if the server encounters a runtime error.
    pub async fn serve(self, mut shutdown: watch::Receiver<bool>) -> Result<(), HealthError> {
        tracing::info!("health server starting");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
                tracing::info!("health server received shutdown signal");
            })
            .await
            .map_err(|error| HealthError::Server(error.to_string()))?;

        tracing::info!("health server stopped");
        Ok(())
    }
}

async fn health_handler(State(gate): State<Arc<LifecycleGate>>) -> impl IntoResponse {
    if gate.is_ready() {
        (StatusCode::OK, Json(StatusBody { status: "UP" }))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(StatusBody { status: "DOWN" }))
    }
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(StatusBody { status: "ALIVE" }))
}

async fn readiness_handler(State(gate): State<Arc<LifecycleGate>>) -> impl IntoResponse {
    if gate.is_ready() {
        (StatusCode::OK, Json(StatusBody { status: "READY" }))
    } else {
        tracing::warn!("readiness probe failed");
        (StatusCode::SERVICE_UNAVAILABLE, Json(StatusBody { status: "NOT_READY" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn liveness_always_passes() {
        let response = liveness_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_fails_when_not_ready() {
        let gate = Arc::new(LifecycleGate::new());
        let response = health_handler(State(gate)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn readiness_passes_once_marked_ready() {
        let gate = Arc::new(LifecycleGate::new());
        gate.mark_ready();
        let response = readiness_handler(State(gate)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_fails_after_shutdown_begins() {
        let gate = Arc::new(LifecycleGate::new());
        gate.mark_ready();
        gate.begin_shutdown();
        let response = readiness_handler(State(gate)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
