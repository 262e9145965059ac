//! Car rental backend
//!
//! API REST para gestionar coches, clientes y alquileres sobre PostgreSQL,
//! con imágenes de coches en disco y un estimador de precio de alquiler.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use middleware::cors::cors_layer;
use state::AppState;

pub const SERVICE_NAME: &str = "Car Rental Management API";

/// Construir la aplicación completa con su estado
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let max_image_bytes = state.images.max_bytes();

    Router::new()
        .route("/", get(root))
        .nest("/api", routes::create_api_router(max_image_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/api/health",
    }))
}
