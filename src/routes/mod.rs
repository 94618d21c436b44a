//! Rutas HTTP
//!
//! `create_router` monta todos los routers bajo `/api/v1` y añade `/health`.

pub mod fuel_routes;
pub mod maintenance_routes;
pub mod mission_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors_layer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/missions", mission_routes::create_mission_router())
        .nest("/fuel", fuel_routes::create_fuel_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/maintenance", maintenance_routes::create_maintenance_router());

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
