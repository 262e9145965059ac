use axum::{
    body::Body,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use crate::controllers::ImageController;
use crate::dto::image_dto::ImageUploadResponse;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, validation_error, AppError};
use crate::utils::extract::ApiPath;

/// Margen para las cabeceras multipart por encima del tamaño de la imagen
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_image_router(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/cars/:id", post(upload_car_image).delete(delete_car_image))
        .route("/cars/:id/download", get(download_car_image))
        .layer(DefaultBodyLimit::max(max_image_bytes.saturating_add(MULTIPART_OVERHEAD)))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        validation_error("file", "File too large")
    } else {
        bad_request_error(&format!("Multipart error: {}", e.body_text()))
    }
}

/// POST /api/images/cars/:id — campo multipart `file`
async fn upload_car_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    mut multipart: Multipart,
) -> Result<Json<ImageUploadResponse>, AppError> {
    let mut file_name: Option<String> = None;
    let mut data: Vec<u8> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            file_name = field.file_name().map(String::from);
            data = field.bytes().await.map_err(multipart_error)?.to_vec();
        }
    }

    let controller = ImageController::new(state.pool.clone(), state.images.clone());
    let response = controller.upload(id, file_name.as_deref(), &data).await?;
    Ok(Json(response))
}

/// GET /api/images/cars/:id/download
async fn download_car_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Response, AppError> {
    let controller = ImageController::new(state.pool.clone(), state.images.clone());
    let image = controller.download(id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", image.filename),
        )
        .header(header::CONTENT_LENGTH, image.data.len())
        .body(Body::from(image.data))
        .map_err(|e| AppError::Internal(format!("Response build failed: {}", e)))
}

async fn delete_car_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    let controller = ImageController::new(state.pool.clone(), state.images.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
