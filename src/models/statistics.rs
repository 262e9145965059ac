//! Estadísticas agregadas de la flota

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Statistics {
    pub total_cars: i64,
    pub available_cars: i64,
    pub rented_cars: i64,
    pub average_mileage: f64,
    pub total_customers: i64,
    pub total_rentals: i64,
    pub active_rentals: i64,
}
