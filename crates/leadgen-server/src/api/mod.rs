mod export;
mod leads;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use leadgen_store::{ExportError, LeadStore, StoreError};
use serde::Serialize;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id;
use crate::search::SearchOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LeadStore>,
    pub orchestrator: Arc<SearchOrchestrator>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No leads data found")]
    NoLeads,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NoLeads | ApiError::Export(ExportError::Empty) => {
                (StatusCode::NOT_FOUND, "No leads data found").into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(leads::index))
        .route("/search", post(leads::search))
        .route("/export", get(export::export_leads))
        .route("/clear", post(leads::clear))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}
