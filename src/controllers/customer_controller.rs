use crate::dto::common_dto::{PaginationParams, SearchQuery};
use crate::dto::customer_dto::{CreateCustomerRequest, CustomerPatch, UpdateCustomerRequest};
use crate::models::Customer;
use crate::repositories::{CustomerRepository, RentalRepository};
use crate::utils::errors::{conflict_error, invalid_state_error, not_found_error, AppError};
use crate::utils::validation::like_pattern;
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

pub struct CustomerController {
    pool: PgPool,
}

impl CustomerController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateCustomerRequest) -> Result<Customer, AppError> {
        request.validate()?;
        let customer_code = request.customer_code.trim();
        let address = request
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let mut tx = self.pool.begin().await?;

        if CustomerRepository::find_by_customer_code(&mut tx, customer_code).await?.is_some() {
            return Err(conflict_error("Customer", "customer_code", customer_code));
        }

        let customer = CustomerRepository::create(
            &mut tx,
            customer_code,
            request.last_name.trim(),
            request.first_name.trim(),
            address,
        )
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                conflict_error("Customer", "customer_code", customer_code)
            } else {
                e
            }
        })?;

        tx.commit().await?;
        info!(customer_id = customer.id, code = %customer.customer_code, "👤 Cliente creado");
        Ok(customer)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Customer, AppError> {
        let mut conn = self.pool.acquire().await?;
        CustomerRepository::find_by_id(&mut conn, id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &id.to_string()))
    }

    pub async fn get_by_customer_code(&self, customer_code: &str) -> Result<Customer, AppError> {
        let mut conn = self.pool.acquire().await?;
        CustomerRepository::find_by_customer_code(&mut conn, customer_code.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Customer with code '{}' not found", customer_code)))
    }

    pub async fn list(&self, pagination: PaginationParams) -> Result<Vec<Customer>, AppError> {
        pagination.validate()?;
        let mut conn = self.pool.acquire().await?;
        CustomerRepository::list(&mut conn, pagination.skip, pagination.limit).await
    }

    /// Búsqueda por nombre, apellido o código; sin resultados es un 404
    pub async fn search(&self, query: SearchQuery) -> Result<Vec<Customer>, AppError> {
        query.validate()?;
        let mut conn = self.pool.acquire().await?;
        let customers = CustomerRepository::search(&mut conn, &like_pattern(&query.q)).await?;
        if customers.is_empty() {
            return Err(AppError::NotFound("No customers found".to_string()));
        }
        Ok(customers)
    }

    pub async fn update(&self, id: i64, request: UpdateCustomerRequest) -> Result<Customer, AppError> {
        request.validate()?;
        let patch = CustomerPatch::from(request);

        let mut tx = self.pool.begin().await?;
        let updated = if patch.is_empty() {
            CustomerRepository::find_by_id(&mut tx, id).await?
        } else {
            CustomerRepository::update(&mut tx, id, &patch).await?
        };
        let customer = updated.ok_or_else(|| not_found_error("Customer", &id.to_string()))?;
        tx.commit().await?;

        info!(customer_id = id, "Cliente actualizado");
        Ok(customer)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE choca con el FOR KEY SHARE que toma un INSERT en `rentals`
        if CustomerRepository::find_by_id_for_update(&mut tx, id).await?.is_none() {
            return Err(not_found_error("Customer", &id.to_string()));
        }
        if RentalRepository::exists_for_customer(&mut tx, id).await? {
            return Err(invalid_state_error("Customer has rental history and cannot be deleted"));
        }

        CustomerRepository::delete(&mut tx, id).await.map_err(|e| {
            if e.is_foreign_key_violation() {
                invalid_state_error("Customer has rental history and cannot be deleted")
            } else {
                e
            }
        })?;
        tx.commit().await?;
        info!(customer_id = id, "🗑️ Cliente eliminado");
        Ok(())
    }
}
