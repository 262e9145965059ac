//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod car;
pub mod customer;
pub mod rental;
pub mod statistics;

pub use car::{Car, CarStatus};
pub use customer::Customer;
pub use rental::Rental;
pub use statistics::Statistics;
