//! Shared application state
//!
//! Estado compartido que se pasa a los handlers a través del router de Axum.
//! Todo es barato de clonar: el pool y el modelo van por referencia contada.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::{ImageStore, PriceModel};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub price_model: Arc<PriceModel>,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, price_model: PriceModel, images: ImageStore) -> Self {
        Self {
            pool,
            config,
            price_model: Arc::new(price_model),
            images,
        }
    }
}
