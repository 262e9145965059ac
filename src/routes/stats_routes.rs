use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::controllers::StatsController;
use crate::models::Statistics;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_stats_router() -> Router<AppState> {
    Router::new()
        .route("/statistics", get(get_statistics))
        .route("/health", get(health_check))
}

async fn get_statistics(State(state): State<AppState>) -> Result<Json<Statistics>, AppError> {
    let controller = StatsController::new(state.pool.clone());
    Ok(Json(controller.get().await?))
}

/// Solo indica que el proceso está vivo; no consulta la base de datos
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
