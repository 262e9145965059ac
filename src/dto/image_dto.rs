use serde::Serialize;

// Respuesta tras subir una imagen
#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub status: String,
    pub message: String,
    pub filename: String,
    pub url: String,
}
