use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::dto::car_dto::CarPatch;
use crate::models::{Car, CarStatus};
use crate::utils::errors::AppError;

/// Acceso a la tabla `cars`. Cada función recibe la conexión (o transacción)
/// del llamante.
pub struct CarRepository;

impl CarRepository {
    pub async fn create(
        conn: &mut PgConnection,
        license_plate: &str,
        brand: &str,
        model: &str,
        mileage: i64,
        rental_price: Decimal,
    ) -> Result<Car, AppError> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (license_plate, brand, model, mileage, status, rental_price)
            VALUES ($1, $2, $3, $4, 'available', $5)
            RETURNING *
            "#,
        )
        .bind(license_plate)
        .bind(brand)
        .bind(model)
        .bind(mileage)
        .bind(rental_price)
        .fetch_one(&mut *conn)
        .await?;

        Ok(car)
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(car)
    }

    /// Igual que `find_by_id` pero bloquea la fila hasta el fin de la transacción
    pub async fn find_by_id_for_update(conn: &mut PgConnection, id: i64) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(car)
    }

    pub async fn find_by_license_plate(
        conn: &mut PgConnection,
        license_plate: &str,
    ) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE license_plate = $1")
            .bind(license_plate)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(car)
    }

    pub async fn list(conn: &mut PgConnection, skip: i64, limit: i64) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY id OFFSET $1 LIMIT $2")
            .bind(skip)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        Ok(cars)
    }

    pub async fn list_by_status(
        conn: &mut PgConnection,
        status: CarStatus,
    ) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE status = $1 ORDER BY id")
            .bind(status)
            .fetch_all(&mut *conn)
            .await?;

        Ok(cars)
    }

    /// `pattern` ya viene escapado y envuelto en `%`
    pub async fn search(conn: &mut PgConnection, pattern: &str) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE license_plate ILIKE $1 OR brand ILIKE $1 OR model ILIKE $1
            ORDER BY brand, model, id
            "#,
        )
        .bind(pattern)
        .fetch_all(&mut *conn)
        .await?;

        Ok(cars)
    }

    /// Actualización parcial: los campos ausentes conservan su valor
    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        patch: &CarPatch,
    ) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET brand = COALESCE($2, brand),
                model = COALESCE($3, model),
                mileage = COALESCE($4, mileage),
                rental_price = COALESCE($5, rental_price)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.brand.as_deref())
        .bind(patch.model.as_deref())
        .bind(patch.mileage)
        .bind(patch.rental_price)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(car)
    }

    pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check-and-set: solo pasa a `rented` si sigue `available`.
    /// `None` si el coche no existe o ya estaba alquilado.
    pub async fn mark_rented_if_available(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>(
            "UPDATE cars SET status = 'rented' WHERE id = $1 AND status = 'available' RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(car)
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: i64,
        status: CarStatus,
    ) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("UPDATE cars SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(car)
    }

    pub async fn set_image(
        conn: &mut PgConnection,
        id: i64,
        image_filename: Option<&str>,
    ) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>(
            "UPDATE cars SET image_filename = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(image_filename)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(car)
    }

    pub async fn count_all(conn: &mut PgConnection) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cars")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(conn: &mut PgConnection, status: CarStatus) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cars WHERE status = $1")
            .bind(status)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    pub async fn average_mileage(conn: &mut PgConnection) -> Result<f64, AppError> {
        let (average,): (f64,) =
            sqlx::query_as("SELECT COALESCE(AVG(mileage), 0)::FLOAT8 FROM cars")
                .fetch_one(&mut *conn)
                .await?;
        Ok(average)
    }
}
