//! Almacenamiento local de imágenes de coches
//!
//! Los ficheros se guardan con un nombre generado (`car_{id}_{uuid}.{ext}`)
//! bajo un directorio raíz. Última escritura gana.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::validate_image_extension;

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    /// Crear el almacén y su directorio raíz si no existe
    pub async fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root, max_bytes })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validar nombre original y tamaño; devuelve la extensión normalizada
    pub fn validate_upload(&self, filename: Option<&str>, size: usize) -> Result<String, AppError> {
        let filename = filename
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| validation_error("file", "No filename"))?;

        let extension = validate_image_extension(filename).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("file", e);
            AppError::Validation(errors)
        })?;

        if size > self.max_bytes {
            return Err(validation_error("file", "File too large"));
        }

        Ok(extension)
    }

    pub fn generate_filename(car_id: i64, extension: &str) -> String {
        format!("car_{}_{}.{}", car_id, Uuid::new_v4().simple(), extension)
    }

    /// Solo se aceptan nombres simples, sin directorios
    fn resolve(&self, filename: &str) -> Result<PathBuf, AppError> {
        let is_plain = Path::new(filename)
            .file_name()
            .map(|name| name == filename)
            .unwrap_or(false);
        if !is_plain {
            return Err(AppError::Internal(format!("Invalid stored filename '{}'", filename)));
        }
        Ok(self.root.join(filename))
    }

    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<(), AppError> {
        let path = self.resolve(filename)?;
        fs::write(&path, data).await?;
        debug!(path = %path.display(), bytes = data.len(), "Imagen guardada");
        Ok(())
    }

    pub async fn read(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(filename)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("Image file not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Borrar un fichero; que ya no exista no es un error
    pub async fn remove(&self, filename: &str) -> Result<bool, AppError> {
        let path = self.resolve(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Imagen eliminada");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn content_type(filename: &str) -> String {
        mime_guess::from_path(filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}
