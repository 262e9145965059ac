use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::utils::validation::{validate_not_empty, validate_positive};

fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(value)
}

// Request para crear un coche
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 32), custom = "validate_not_empty")]
    pub license_plate: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub brand: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub model: String,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub mileage: i64,

    #[validate(custom = "validate_price")]
    pub rental_price: Decimal,
}

// Request para actualizar un coche; el estado solo lo cambia el ciclo de alquiler
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub model: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i64>,

    #[validate(custom = "validate_price")]
    pub rental_price: Option<Decimal>,
}

/// Conjunto explícito de campos a modificar en un coche
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarPatch {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub mileage: Option<i64>,
    pub rental_price: Option<Decimal>,
}

impl CarPatch {
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.model.is_none()
            && self.mileage.is_none()
            && self.rental_price.is_none()
    }
}

impl From<UpdateCarRequest> for CarPatch {
    fn from(request: UpdateCarRequest) -> Self {
        Self {
            brand: request.brand.map(|b| b.trim().to_string()),
            model: request.model.map(|m| m.trim().to_string()),
            mileage: request.mileage,
            rental_price: request.rental_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let request: CreateCarRequest = serde_json::from_value(serde_json::json!({
            "license_plate": "AB-123",
            "brand": "Toyota",
            "model": "Corolla",
            "rental_price": 50
        }))
        .unwrap();
        assert_eq!(request.mileage, 0);
        assert!(request.validate().is_ok());

        let request = CreateCarRequest {
            license_plate: "AB-123".to_string(),
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            mileage: -5,
            rental_price: Decimal::ZERO,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("mileage"));
        assert!(fields.contains_key("rental_price"));
    }

    #[test]
    fn test_status_is_not_part_of_update() {
        let request: UpdateCarRequest = serde_json::from_value(serde_json::json!({
            "status": "rented",
            "mileage": 1200
        }))
        .unwrap();
        let patch = CarPatch::from(request);
        assert_eq!(patch.mileage, Some(1200));
        assert!(patch.brand.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_empty_patch() {
        let patch = CarPatch::from(UpdateCarRequest::default());
        assert!(patch.is_empty());
    }

    #[test]
    fn test_update_rejects_blank_brand() {
        let request = UpdateCarRequest {
            brand: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
