use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use crate::controllers::CarController;
use crate::dto::car_dto::{CreateCarRequest, UpdateCarRequest};
use crate::dto::common_dto::{PaginationParams, SearchQuery};
use crate::models::{Car, CarStatus};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/:id", get(get_car).put(update_car).delete(delete_car))
        .route("/search/available", get(list_available_cars))
        .route("/search/rented", get(list_rented_cars))
        .route("/search/by-plate/:plate", get(get_car_by_plate))
        .route("/search/by-text", get(search_cars))
}

async fn create_car(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCarRequest>,
) -> Result<(StatusCode, Json<Car>), AppError> {
    let controller = CarController::new(state.pool.clone());
    let car = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

async fn list_cars(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
) -> Result<Json<Vec<Car>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.list(pagination).await?))
}

async fn get_car(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Car>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_car(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateCarRequest>,
) -> Result<Json<Car>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_car(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    let controller = CarController::new(state.pool.clone());
    controller.delete(id, &state.images).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_available_cars(State(state): State<AppState>) -> Result<Json<Vec<Car>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.list_by_status(CarStatus::Available).await?))
}

async fn list_rented_cars(State(state): State<AppState>) -> Result<Json<Vec<Car>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.list_by_status(CarStatus::Rented).await?))
}

async fn get_car_by_plate(
    State(state): State<AppState>,
    ApiPath(plate): ApiPath<String>,
) -> Result<Json<Car>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.get_by_license_plate(&plate).await?))
}

async fn search_cars(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<Car>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    Ok(Json(controller.search(query).await?))
}
