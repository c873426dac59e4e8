//! Router del servidor de referencia

pub mod auth_routes;
pub mod request_routes;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::json;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::{cors_for, session_middleware};
use crate::state::AppState;

/// Router completo: sesión pública en la raíz y `/api/*` protegido
pub fn build_router(state: AppState) -> Router {
    let api = request_routes::create_request_router()
        .route_layer(from_fn_with_state(state.clone(), session_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes::create_auth_router())
        .nest("/api", api)
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_for(&state.config.cors_origins))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
