//! Modelo de Customer
//!
//! Mapea exactamente a la tabla `customers`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cliente - `customer_code` es el identificador externo único
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub customer_code: String,
    pub last_name: String,
    pub first_name: String,
    pub address: Option<String>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
