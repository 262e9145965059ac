//! Controllers module
//!
//! Lógica de negocio de cada entidad. Cada operación abre su propia
//! transacción y llama a los repositorios.

pub mod car_controller;
pub mod customer_controller;
pub mod image_controller;
pub mod rental_controller;
pub mod stats_controller;

pub use car_controller::CarController;
pub use customer_controller::CustomerController;
pub use image_controller::ImageController;
pub use rental_controller::RentalController;
pub use stats_controller::StatsController;
