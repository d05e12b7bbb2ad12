mod webhook;

use std::sync::Arc;

use axum::{
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handler::ReportEventHandler;
use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<dyn ReportEventHandler>,
}

impl AppState {
    pub fn new(handler: impl ReportEventHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

/// Routes the webhook endpoint at `webhook_path` plus `GET /health`.
///
/// Non-POST requests anywhere else answer 405; POST to an unknown path is 404.
pub fn build_app(state: AppState, webhook_path: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            webhook_path,
            post(webhook::receive_webhook).fallback(method_not_allowed),
        )
        .fallback(unrouted)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Only POST is served, so any other method is refused regardless of path.
async fn unrouted(method: Method) -> impl IntoResponse {
    if method == Method::POST {
        (StatusCode::NOT_FOUND, "Not found")
    } else {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }
}

#[cfg(test)]
#[path = "webhook_test.rs"]
mod tests;
