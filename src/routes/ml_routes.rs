use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::debug;
use validator::Validate;

use crate::dto::ml_dto::{
    ModelInfoResponse, PricePredictionRequest, PricePredictionResponse, SupportedBrandsResponse,
};
use crate::services::price_model_service::{FEATURES, REFERENCE_YEAR, SUPPORTED_BRANDS};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

const CONFIDENCE: &str = "Linear regression on synthetic data";

pub fn create_ml_router() -> Router<AppState> {
    Router::new()
        .route("/predict-price", post(predict_price))
        .route("/supported-marques", get(supported_brands))
        .route("/ml-info", get(model_info))
}

/// Estimación de precio; el kilometraje se acota, no se rechaza
async fn predict_price(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PricePredictionRequest>,
) -> Result<Json<PricePredictionResponse>, AppError> {
    request.validate()?;

    let estimate = state
        .price_model
        .predict(&request.brand, request.mileage, request.year);
    debug!(brand = %request.brand, price = estimate.price, "Precio estimado");

    Ok(Json(PricePredictionResponse {
        success: true,
        predicted_price: estimate.price,
        brand: request.brand.trim().to_string(),
        mileage: estimate.mileage,
        year: request.year,
        confidence: CONFIDENCE.to_string(),
    }))
}

async fn supported_brands() -> Json<SupportedBrandsResponse> {
    Json(SupportedBrandsResponse {
        supported_brands: SUPPORTED_BRANDS.to_vec(),
        count: SUPPORTED_BRANDS.len(),
    })
}

async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    let model = &state.price_model;
    Json(ModelInfoResponse {
        model_type: "Linear Regression (least squares)",
        features: FEATURES.to_vec(),
        coefficients: model.coefficients().to_vec(),
        trained_samples: model.trained_samples(),
        reference_year: REFERENCE_YEAR,
        supported_brands: SUPPORTED_BRANDS.to_vec(),
    })
}
