//! Imágenes de coches: subida, descarga y borrado
//!
//! El fichero se escribe antes de actualizar la fila; si la actualización
//! falla se borra el fichero nuevo. La imagen anterior se elimina al final.

use crate::dto::image_dto::ImageUploadResponse;
use crate::repositories::CarRepository;
use crate::services::ImageStore;
use crate::utils::errors::{not_found_error, AppError};
use sqlx::PgPool;
use tracing::{info, warn};

/// Imagen leída del disco lista para servir
#[derive(Debug)]
pub struct StoredImage {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub struct ImageController {
    pool: PgPool,
    store: ImageStore,
}

impl ImageController {
    pub fn new(pool: PgPool, store: ImageStore) -> Self {
        Self { pool, store }
    }

    pub fn download_url(car_id: i64) -> String {
        format!("/api/images/cars/{}/download", car_id)
    }

    pub async fn upload(
        &self,
        car_id: i64,
        original_name: Option<&str>,
        data: &[u8],
    ) -> Result<ImageUploadResponse, AppError> {
        let mut conn = self.pool.acquire().await?;
        if CarRepository::find_by_id(&mut conn, car_id).await?.is_none() {
            return Err(not_found_error("Car", &car_id.to_string()));
        }
        drop(conn);

        let extension = self.store.validate_upload(original_name, data.len())?;
        let filename = ImageStore::generate_filename(car_id, &extension);
        self.store.save(&filename, data).await?;

        let mut tx = self.pool.begin().await?;
        let previous = match CarRepository::find_by_id(&mut tx, car_id).await {
            Ok(Some(car)) => car.image_filename,
            Ok(None) => {
                self.discard(&filename).await;
                return Err(not_found_error("Car", &car_id.to_string()));
            }
            Err(e) => {
                self.discard(&filename).await;
                return Err(e);
            }
        };

        if let Err(e) = CarRepository::set_image(&mut tx, car_id, Some(&filename)).await {
            self.discard(&filename).await;
            return Err(e);
        }
        if let Err(e) = tx.commit().await {
            self.discard(&filename).await;
            return Err(e.into());
        }

        info!(car_id, %filename, bytes = data.len(), "🖼️ Imagen subida");

        if let Some(old) = previous.filter(|old| old != &filename) {
            self.discard(&old).await;
        }

        Ok(ImageUploadResponse {
            status: "success".to_string(),
            message: "Image uploaded successfully".to_string(),
            url: Self::download_url(car_id),
            filename,
        })
    }

    pub async fn download(&self, car_id: i64) -> Result<StoredImage, AppError> {
        let mut conn = self.pool.acquire().await?;
        let car = CarRepository::find_by_id(&mut conn, car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &car_id.to_string()))?;
        drop(conn);

        let filename = car
            .image_filename
            .ok_or_else(|| AppError::NotFound(format!("Car {} has no image", car_id)))?;
        let data = self.store.read(&filename).await?;

        Ok(StoredImage {
            content_type: ImageStore::content_type(&filename),
            filename,
            data,
        })
    }

    pub async fn delete(&self, car_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let car = CarRepository::find_by_id(&mut tx, car_id)
            .await?
            .ok_or_else(|| not_found_error("Car", &car_id.to_string()))?;
        let filename = car
            .image_filename
            .ok_or_else(|| AppError::NotFound(format!("Car {} has no image", car_id)))?;

        CarRepository::set_image(&mut tx, car_id, None).await?;
        tx.commit().await?;

        // Un fichero que ya no existe no impide limpiar la referencia
        self.store.remove(&filename).await?;
        info!(car_id, %filename, "Imagen eliminada");
        Ok(())
    }

    async fn discard(&self, filename: &str) {
        if let Err(e) = self.store.remove(filename).await {
            warn!(%filename, "No se pudo borrar la imagen: {}", e);
        }
    }
}
