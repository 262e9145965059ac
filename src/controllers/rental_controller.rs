//! Ciclo de vida de los alquileres
//!
//! Cada operación corre en una única transacción. El paso del coche a
//! `rented` es un UPDATE condicional (check-and-set) sobre el estado actual,
//! respaldado por el índice único parcial de alquileres abiertos.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::common_dto::PaginationParams;
use crate::dto::rental_dto::{CreateRentalRequest, RentalDetail, ReturnRentalRequest};
use crate::models::{CarStatus, Rental};
use crate::repositories::{CarRepository, CustomerRepository, RentalRepository};
use crate::utils::errors::{invalid_state_error, not_found_error, validation_error, AppError};

pub struct RentalController {
    pool: PgPool,
}

impl RentalController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Alquilar un coche disponible a un cliente
    pub async fn create(&self, request: CreateRentalRequest) -> Result<Rental, AppError> {
        let CreateRentalRequest { car_id, customer_id } = request;
        let mut tx = self.pool.begin().await?;

        let customer = CustomerRepository::find_by_id(&mut tx, customer_id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &customer_id.to_string()))?;

        if CarRepository::mark_rented_if_available(&mut tx, car_id).await?.is_none() {
            // Distinguir coche inexistente de coche ya alquilado
            return match CarRepository::find_by_id(&mut tx, car_id).await? {
                None => Err(not_found_error("Car", &car_id.to_string())),
                Some(car) => {
                    warn!(car_id, status = %car.status, "Intento de alquilar un coche no disponible");
                    Err(invalid_state_error("Car is not available for rental"))
                }
            };
        }

        let rental = RentalRepository::create(&mut tx, car_id, customer_id, Utc::now())
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    invalid_state_error("Car is not available for rental")
                } else if e.is_foreign_key_violation() {
                    // El cliente se borró en paralelo
                    not_found_error("Customer", &customer_id.to_string())
                } else {
                    e
                }
            })?;

        tx.commit().await?;
        info!(
            rental_id = rental.id,
            car_id,
            customer = %customer.full_name(),
            "🔑 Alquiler creado, coche RENTED"
        );
        Ok(rental)
    }

    /// Devolver un coche: cierra el alquiler y lo deja disponible otra vez
    pub async fn return_rental(&self, id: i64, request: ReturnRentalRequest) -> Result<Rental, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = RentalRepository::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;
        if !current.is_active() {
            return Err(invalid_state_error("Car has already been returned"));
        }

        let now = Utc::now();
        let returned_at = resolve_return_time(current.started_at, request.returned_at, now)?;

        let rental = match RentalRepository::close_if_active(&mut tx, id, returned_at, now).await? {
            Some(rental) => rental,
            // Otra transacción lo cerró entre la lectura y el UPDATE
            None => return Err(invalid_state_error("Car has already been returned")),
        };

        CarRepository::set_status(&mut tx, rental.car_id, CarStatus::Available).await?;
        tx.commit().await?;

        info!(rental_id = id, car_id = rental.car_id, "↩️ Coche devuelto, AVAILABLE");
        Ok(rental)
    }

    /// Borrar un alquiler; si estaba abierto, el coche vuelve a estar disponible
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let rental = RentalRepository::delete(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;

        if rental.is_active() {
            CarRepository::set_status(&mut tx, rental.car_id, CarStatus::Available).await?;
            info!(rental_id = id, car_id = rental.car_id, "Alquiler activo eliminado, coche AVAILABLE");
        }

        tx.commit().await?;
        info!(rental_id = id, "🗑️ Alquiler eliminado");
        Ok(())
    }

    pub async fn get_detail(&self, id: i64) -> Result<RentalDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let rental = RentalRepository::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;
        let car = CarRepository::find_by_id(&mut tx, rental.car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &rental.car_id.to_string()))?;
        let customer = CustomerRepository::find_by_id(&mut tx, rental.customer_id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &rental.customer_id.to_string()))?;

        tx.commit().await?;
        Ok(RentalDetail { rental, car, customer })
    }

    pub async fn list(&self, pagination: PaginationParams) -> Result<Vec<Rental>, AppError> {
        pagination.validate()?;
        let mut conn = self.pool.acquire().await?;
        RentalRepository::list(&mut conn, pagination.skip, pagination.limit).await
    }

    pub async fn list_active(&self) -> Result<Vec<Rental>, AppError> {
        let mut conn = self.pool.acquire().await?;
        RentalRepository::list_active(&mut conn).await
    }

    pub async fn history_by_customer(&self, customer_id: i64) -> Result<Vec<Rental>, AppError> {
        let mut tx = self.pool.begin().await?;
        if CustomerRepository::find_by_id(&mut tx, customer_id).await?.is_none() {
            return Err(not_found_error("Customer", &customer_id.to_string()));
        }
        let rentals = RentalRepository::list_by_customer(&mut tx, customer_id).await?;
        tx.commit().await?;
        Ok(rentals)
    }

    pub async fn history_by_car(&self, car_id: i64) -> Result<Vec<Rental>, AppError> {
        let mut tx = self.pool.begin().await?;
        if CarRepository::find_by_id(&mut tx, car_id).await?.is_none() {
            return Err(not_found_error("Car", &car_id.to_string()));
        }
        let rentals = RentalRepository::list_by_car(&mut tx, car_id).await?;
        tx.commit().await?;
        Ok(rentals)
    }
}

/// Fecha de devolución: la indicada por el cliente o `now`. No puede ser
/// anterior al inicio del alquiler.
pub fn resolve_return_time(
    started_at: DateTime<Utc>,
    requested: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, AppError> {
    let returned_at = requested.unwrap_or(now);
    if returned_at < started_at {
        return Err(validation_error("returned_at", "Return date cannot precede the rental start"));
    }
    Ok(returned_at)
}
