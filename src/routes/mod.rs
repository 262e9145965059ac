//! Routes module
//!
//! Un router por entidad, todos anidados bajo `/api`.

pub mod car_routes;
pub mod customer_routes;
pub mod image_routes;
pub mod ml_routes;
pub mod rental_routes;
pub mod stats_routes;

use axum::Router;

use crate::state::AppState;

pub fn create_api_router(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/cars", car_routes::create_car_router())
        .nest("/customers", customer_routes::create_customer_router())
        .nest("/rentals", rental_routes::create_rental_router())
        .nest("/images", image_routes::create_image_router(max_image_bytes))
        .nest("/ml", ml_routes::create_ml_router())
        .merge(stats_routes::create_stats_router())
}
