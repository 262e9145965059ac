use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::validate_not_empty;

fn default_year() -> i32 {
    2023
}

// Request de predicción de precio
#[derive(Debug, Deserialize, Validate)]
pub struct PricePredictionRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub brand: String,

    pub mileage: i64,

    #[serde(default = "default_year")]
    #[validate(range(min = 1990, max = 2026))]
    pub year: i32,
}

// Respuesta de predicción
#[derive(Debug, Serialize, Deserialize)]
pub struct PricePredictionResponse {
    pub success: bool,
    pub predicted_price: f64,
    pub brand: String,
    pub mileage: i64,
    pub year: i32,
    pub confidence: String,
}

#[derive(Debug, Serialize)]
pub struct SupportedBrandsResponse {
    pub supported_brands: Vec<&'static str>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_type: &'static str,
    pub features: Vec<&'static str>,
    pub coefficients: Vec<f64>,
    pub trained_samples: usize,
    pub reference_year: i32,
    pub supported_brands: Vec<&'static str>,
}
