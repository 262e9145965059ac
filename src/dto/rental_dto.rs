use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Car, Customer, Rental};

// Request para crear un alquiler
#[derive(Debug, Deserialize)]
pub struct CreateRentalRequest {
    pub car_id: i64,
    pub customer_id: i64,
}

// Request opcional para devolver un coche
#[derive(Debug, Default, Deserialize)]
pub struct ReturnRentalRequest {
    pub returned_at: Option<DateTime<Utc>>,
}

// Alquiler con el coche y el cliente embebidos
#[derive(Debug, Serialize)]
pub struct RentalDetail {
    #[serde(flatten)]
    pub rental: Rental,
    pub car: Car,
    pub customer: Customer,
}
