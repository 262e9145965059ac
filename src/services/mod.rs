//! Services module
//!
//! Servicios sin acceso a la base de datos: el modelo de precios y el
//! almacenamiento de imágenes en disco.

pub mod image_storage_service;
pub mod price_model_service;

pub use image_storage_service::ImageStore;
pub use price_model_service::PriceModel;
