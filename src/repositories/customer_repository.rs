use sqlx::PgConnection;

use crate::dto::customer_dto::CustomerPatch;
use crate::models::Customer;
use crate::utils::errors::AppError;

/// Acceso a la tabla `customers`
pub struct CustomerRepository;

impl CustomerRepository {
    pub async fn create(
        conn: &mut PgConnection,
        customer_code: &str,
        last_name: &str,
        first_name: &str,
        address: Option<&str>,
    ) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (customer_code, last_name, first_name, address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(customer_code)
        .bind(last_name)
        .bind(first_name)
        .bind(address)
        .fetch_one(&mut *conn)
        .await?;

        Ok(customer)
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(customer)
    }

    /// Igual que `find_by_id` pero bloquea la fila hasta el fin de la transacción
    pub async fn find_by_id_for_update(conn: &mut PgConnection, id: i64) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(customer)
    }

    pub async fn find_by_customer_code(
        conn: &mut PgConnection,
        customer_code: &str,
    ) -> Result<Option<Customer>, AppError> {
        let customer =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE customer_code = $1")
                .bind(customer_code)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(customer)
    }

    /// Listado alfabético por apellido y nombre
    pub async fn list(conn: &mut PgConnection, skip: i64, limit: i64) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers ORDER BY last_name, first_name, id OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(customers)
    }

    pub async fn search(conn: &mut PgConnection, pattern: &str) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE last_name ILIKE $1 OR first_name ILIKE $1 OR customer_code ILIKE $1
            ORDER BY last_name, first_name, id
            "#,
        )
        .bind(pattern)
        .fetch_all(&mut *conn)
        .await?;

        Ok(customers)
    }

    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        patch: &CustomerPatch,
    ) -> Result<Option<Customer>, AppError> {
        let (address_set, address) = match &patch.address {
            Some(address) => (true, address.as_deref()),
            None => (false, None),
        };

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET last_name = COALESCE($2, last_name),
                first_name = COALESCE($3, first_name),
                address = CASE WHEN $4 THEN $5 ELSE address END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.last_name.as_deref())
        .bind(patch.first_name.as_deref())
        .bind(address_set)
        .bind(address)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(customer)
    }

    pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_all(conn: &mut PgConnection) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}
