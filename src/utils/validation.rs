//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! que no cubren los derives de `validator`.

use serde::Serialize;
use validator::ValidationError;

/// Extensiones de imagen aceptadas para los coches
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: &T,
) -> Result<(), ValidationError> {
    if *value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Extraer la extensión (en minúsculas) de un nombre de fichero de imagen
/// y comprobar que está permitida
pub fn validate_image_extension(filename: &str) -> Result<String, ValidationError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()));

    extension.ok_or_else(|| {
        let mut error = ValidationError::new("image_extension");
        error.message = Some(
            format!("File type not allowed. Allowed: {}", ALLOWED_IMAGE_EXTENSIONS.join(", ")).into(),
        );
        error.add_param("value".into(), &filename.to_string());
        error
    })
}

/// Escapar los metacaracteres de LIKE para buscar el término literalmente
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
