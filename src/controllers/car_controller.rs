use crate::dto::car_dto::{CarPatch, CreateCarRequest, UpdateCarRequest};
use crate::dto::common_dto::{PaginationParams, SearchQuery};
use crate::models::{Car, CarStatus};
use crate::repositories::{CarRepository, RentalRepository};
use crate::services::ImageStore;
use crate::utils::errors::{conflict_error, invalid_state_error, not_found_error, AppError};
use crate::utils::validation::like_pattern;
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

pub struct CarController {
    pool: PgPool,
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateCarRequest) -> Result<Car, AppError> {
        request.validate()?;
        let license_plate = request.license_plate.trim();

        let mut tx = self.pool.begin().await?;

        // Verificar que la matrícula no exista
        if CarRepository::find_by_license_plate(&mut tx, license_plate).await?.is_some() {
            return Err(conflict_error("Car", "license_plate", license_plate));
        }

        let car = CarRepository::create(
            &mut tx,
            license_plate,
            request.brand.trim(),
            request.model.trim(),
            request.mileage,
            request.rental_price,
        )
        .await
        .map_err(|e| {
            // Inserción concurrente con la misma matrícula
            if e.is_unique_violation() {
                conflict_error("Car", "license_plate", license_plate)
            } else {
                e
            }
        })?;

        tx.commit().await?;
        info!(car_id = car.id, plate = %car.license_plate, "🚗 Coche creado");
        Ok(car)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Car, AppError> {
        let mut conn = self.pool.acquire().await?;
        CarRepository::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))
    }

    pub async fn get_by_license_plate(&self, license_plate: &str) -> Result<Car, AppError> {
        let mut conn = self.pool.acquire().await?;
        CarRepository::find_by_license_plate(&mut conn, license_plate.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car with license plate '{}' not found", license_plate)))
    }

    pub async fn list(&self, pagination: PaginationParams) -> Result<Vec<Car>, AppError> {
        pagination.validate()?;
        let mut conn = self.pool.acquire().await?;
        CarRepository::list(&mut conn, pagination.skip, pagination.limit).await
    }

    pub async fn list_by_status(&self, status: CarStatus) -> Result<Vec<Car>, AppError> {
        let mut conn = self.pool.acquire().await?;
        CarRepository::list_by_status(&mut conn, status).await
    }

    pub async fn search(&self, query: SearchQuery) -> Result<Vec<Car>, AppError> {
        query.validate()?;
        let mut conn = self.pool.acquire().await?;
        CarRepository::search(&mut conn, &like_pattern(&query.q)).await
    }

    pub async fn update(&self, id: i64, request: UpdateCarRequest) -> Result<Car, AppError> {
        request.validate()?;
        let patch = CarPatch::from(request);

        let mut tx = self.pool.begin().await?;
        let updated = if patch.is_empty() {
            CarRepository::find_by_id(&mut tx, id).await?
        } else {
            CarRepository::update(&mut tx, id, &patch).await?
        };
        let car = updated.ok_or_else(|| not_found_error("Car", &id.to_string()))?;
        tx.commit().await?;

        info!(car_id = id, ?patch, "Coche actualizado");
        Ok(car)
    }

    /// Borra el coche si no tiene historial de alquileres; después elimina
    /// su imagen del disco
    pub async fn delete(&self, id: i64, images: &ImageStore) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // El bloqueo espera a cualquier alquiler en curso sobre este coche
        let car = CarRepository::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))?;

        if RentalRepository::count_active_for_car(&mut tx, id).await? > 0 {
            return Err(invalid_state_error("Car is currently rented and cannot be deleted"));
        }
        if RentalRepository::exists_for_car(&mut tx, id).await? {
            return Err(invalid_state_error("Car has rental history and cannot be deleted"));
        }

        CarRepository::delete(&mut tx, id).await.map_err(|e| {
            if e.is_foreign_key_violation() {
                invalid_state_error("Car has rental history and cannot be deleted")
            } else {
                e
            }
        })?;
        tx.commit().await?;
        info!(car_id = id, "🗑️ Coche eliminado");

        if let Some(filename) = car.image_filename {
            if let Err(e) = images.remove(&filename).await {
                warn!(car_id = id, %filename, "No se pudo borrar la imagen: {}", e);
            }
        }
        Ok(())
    }
}
