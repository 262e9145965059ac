use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_empty;

// Request para crear un cliente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 64), custom = "validate_not_empty")]
    pub customer_code: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub last_name: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub first_name: String,

    pub address: Option<String>,
}

// Request para actualizar un cliente; una dirección vacía la borra
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub first_name: Option<String>,

    pub address: Option<String>,
}

/// Conjunto explícito de campos a modificar en un cliente.
/// `address: Some(None)` borra la dirección.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub address: Option<Option<String>>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.last_name.is_none() && self.first_name.is_none() && self.address.is_none()
    }
}

impl From<UpdateCustomerRequest> for CustomerPatch {
    fn from(request: UpdateCustomerRequest) -> Self {
        Self {
            last_name: request.last_name.map(|n| n.trim().to_string()),
            first_name: request.first_name.map(|n| n.trim().to_string()),
            address: request.address.map(|a| {
                let trimmed = a.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }),
        }
    }
}
