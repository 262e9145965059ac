//! Middleware del sistema
//!
//! Solo CORS: el servicio no tiene autenticación.

pub mod cors;

pub use cors::*;
