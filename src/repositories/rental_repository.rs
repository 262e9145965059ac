use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::models::Rental;
use crate::utils::errors::AppError;

/// Acceso a la tabla `rentals`
pub struct RentalRepository;

impl RentalRepository {
    pub async fn create(
        conn: &mut PgConnection,
        car_id: i64,
        customer_id: i64,
        started_at: DateTime<Utc>,
    ) -> Result<Rental, AppError> {
        let rental = sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rentals (car_id, customer_id, started_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(car_id)
        .bind(customer_id)
        .bind(started_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(rental)
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Rental>, AppError> {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(rental)
    }

    pub async fn list(conn: &mut PgConnection, skip: i64, limit: i64) -> Result<Vec<Rental>, AppError> {
        let rentals = sqlx::query_as::<_, Rental>("SELECT * FROM rentals ORDER BY id OFFSET $1 LIMIT $2")
            .bind(skip)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        Ok(rentals)
    }

    pub async fn list_active(conn: &mut PgConnection) -> Result<Vec<Rental>, AppError> {
        let rentals = sqlx::query_as::<_, Rental>(
            "SELECT * FROM rentals WHERE returned_at IS NULL ORDER BY started_at DESC, id DESC",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(rentals)
    }

    pub async fn list_by_customer(conn: &mut PgConnection, customer_id: i64) -> Result<Vec<Rental>, AppError> {
        let rentals = sqlx::query_as::<_, Rental>(
            "SELECT * FROM rentals WHERE customer_id = $1 ORDER BY started_at DESC, id DESC",
        )
        .bind(customer_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rentals)
    }

    pub async fn list_by_car(conn: &mut PgConnection, car_id: i64) -> Result<Vec<Rental>, AppError> {
        let rentals = sqlx::query_as::<_, Rental>(
            "SELECT * FROM rentals WHERE car_id = $1 ORDER BY started_at DESC, id DESC",
        )
        .bind(car_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rentals)
    }

    /// Cierra el alquiler solo si sigue abierto. `None` si no existe o ya
    /// estaba devuelto.
    pub async fn close_if_active(
        conn: &mut PgConnection,
        id: i64,
        returned_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Result<Option<Rental>, AppError> {
        let rental = sqlx::query_as::<_, Rental>(
            r#"
            UPDATE rentals
            SET returned_at = $2, ended_at = $3
            WHERE id = $1 AND returned_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(returned_at)
        .bind(ended_at)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(rental)
    }

    pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<Option<Rental>, AppError> {
        let rental = sqlx::query_as::<_, Rental>("DELETE FROM rentals WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(rental)
    }

    pub async fn exists_for_car(conn: &mut PgConnection, car_id: i64) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rentals WHERE car_id = $1)")
                .bind(car_id)
                .fetch_one(&mut *conn)
                .await?;
        Ok(exists)
    }

    pub async fn exists_for_customer(conn: &mut PgConnection, customer_id: i64) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM rentals WHERE customer_id = $1)")
                .bind(customer_id)
                .fetch_one(&mut *conn)
                .await?;
        Ok(exists)
    }

    pub async fn count_active_for_car(conn: &mut PgConnection, car_id: i64) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM rentals WHERE car_id = $1 AND returned_at IS NULL")
                .bind(car_id)
                .fetch_one(&mut *conn)
                .await?;
        Ok(count)
    }

    pub async fn count_all(conn: &mut PgConnection) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rentals")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    pub async fn count_active(conn: &mut PgConnection) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rentals WHERE returned_at IS NULL")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}
