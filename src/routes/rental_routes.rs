use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use crate::controllers::RentalController;
use crate::dto::common_dto::PaginationParams;
use crate::dto::rental_dto::{CreateRentalRequest, RentalDetail, ReturnRentalRequest};
use crate::models::Rental;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_rental_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rentals).post(create_rental))
        .route("/:id", get(get_rental).delete(delete_rental))
        .route("/:id/return", post(return_rental))
        .route("/search/active", get(list_active_rentals))
        .route("/search/customer/:customer_id", get(rentals_by_customer))
        .route("/search/car/:car_id", get(rentals_by_car))
}

async fn create_rental(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRentalRequest>,
) -> Result<(StatusCode, Json<Rental>), AppError> {
    let controller = RentalController::new(state.pool.clone());
    let rental = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(rental)))
}

async fn list_rentals(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<Vec<Rental>>, AppError> {
    let controller = RentalController::new(state.pool.clone());
    Ok(Json(controller.list(pagination).await?))
}

async fn get_rental(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<RentalDetail>, AppError> {
    let controller = RentalController::new(state.pool.clone());
    Ok(Json(controller.get_detail(id).await?))
}

async fn delete_rental(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    let controller = RentalController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// El cuerpo es opcional: vacío equivale a devolver ahora
async fn return_rental(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    body: Bytes,
) -> Result<Json<Rental>, AppError> {
    let request = parse_return_body(&body)?;
    let controller = RentalController::new(state.pool.clone());
    Ok(Json(controller.return_rental(id, request).await?))
}

async fn list_active_rentals(State(state): State<AppState>) -> Result<Json<Vec<Rental>>, AppError> {
    let controller = RentalController::new(state.pool.clone());
    Ok(Json(controller.list_active().await?))
}

async fn rentals_by_customer(
    State(state): State<AppState>,
    ApiPath(customer_id): ApiPath<i64>,
) -> Result<Json<Vec<Rental>>, AppError> {
    let controller = RentalController::new(state.pool.clone());
    Ok(Json(controller.history_by_customer(customer_id).await?))
}

async fn rentals_by_car(
    State(state): State<AppState>,
    ApiPath(car_id): ApiPath<i64>,
) -> Result<Json<Vec<Rental>>, AppError> {
    let controller = RentalController::new(state.pool.clone());
    Ok(Json(controller.history_by_car(car_id).await?))
}

fn parse_return_body(body: &[u8]) -> Result<ReturnRentalRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReturnRentalRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| bad_request_error(&format!("Invalid return body: {}", e)))
}
