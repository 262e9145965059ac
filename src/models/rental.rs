//! Modelo de Rental
//!
//! Un alquiler está activo mientras `returned_at` sea NULL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Rental {
    pub id: i64,
    pub car_id: i64,
    pub customer_id: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Rental {
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }
}
