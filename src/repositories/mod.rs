//! Repositorios SQL
//!
//! Ninguna función abre su propia transacción: el controlador la crea,
//! la pasa a cada llamada y hace commit al final.

pub mod car_repository;
pub mod customer_repository;
pub mod rental_repository;

pub use car_repository::CarRepository;
pub use customer_repository::CustomerRepository;
pub use rental_repository::RentalRepository;
