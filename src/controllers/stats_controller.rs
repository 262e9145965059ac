use crate::models::{CarStatus, Statistics};
use crate::repositories::{CarRepository, CustomerRepository, RentalRepository};
use crate::utils::errors::AppError;
use sqlx::PgPool;

pub struct StatsController {
    pool: PgPool,
}

impl StatsController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Totales de la flota, leídos dentro de una misma transacción
    pub async fn get(&self) -> Result<Statistics, AppError> {
        let mut tx = self.pool.begin().await?;

        let stats = Statistics {
            total_cars: CarRepository::count_all(&mut tx).await?,
            available_cars: CarRepository::count_by_status(&mut tx, CarStatus::Available).await?,
            rented_cars: CarRepository::count_by_status(&mut tx, CarStatus::Rented).await?,
            average_mileage: round_2(CarRepository::average_mileage(&mut tx).await?),
            total_customers: CustomerRepository::count_all(&mut tx).await?,
            total_rentals: RentalRepository::count_all(&mut tx).await?,
            active_rentals: RentalRepository::count_active(&mut tx).await?,
        };

        tx.commit().await?;
        Ok(stats)
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
