use crate::errors::AppError;
use crate::lookup::RegistryLookup;
use crate::models::OrgCard;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry lookup client; owns the response cache for the life of the process.
    pub lookup: RegistryLookup,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "zcb-registry",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/v1/org/:inn
///
/// Organisation or sole-proprietor card by ИНН.
pub async fn get_org(
    State(state): State<Arc<AppState>>,
    Path(inn): Path<String>,
) -> Result<Json<OrgCard>, AppError> {
    tracing::info!("GET /api/v1/org/{}", inn);
    let record = state.lookup.lookup(inn.trim()).await?;
    Ok(Json(record.into()))
}

/// GET /api/v1/org/:inn/raw
///
/// The card body the normalized fields were resolved from, for debugging odd schemas.
pub async fn get_org_raw(
    State(state): State<Arc<AppState>>,
    Path(inn): Path<String>,
) -> Result<Json<Value>, AppError> {
    tracing::info!("GET /api/v1/org/{}/raw", inn);
    let record = state.lookup.lookup(inn.trim()).await?;
    Ok(Json(record.raw))
}

/// Builds the HTTP router with tracing and permissive CORS.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/org/:inn", get(get_org))
        .route("/api/v1/org/:inn/raw", get(get_org_raw))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
