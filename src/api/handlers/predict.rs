use std::time::Instant;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::{state::AppState, types::*};

/// Uploaded file pulled out of the multipart body.
struct ImageUpload {
    filename: String,
    bytes: Vec<u8>,
}

fn multipart_error(e: MultipartError, max_body_bytes: usize) -> ApiError {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError {
            status,
            message: format!("Upload exceeds the {max_body_bytes} byte request limit"),
        };
    }
    ApiError {
        status,
        message: e.body_text(),
    }
}

/// Find the first file part named `image`.
///
/// A part without a `filename` is an ordinary form field, not a file.
async fn read_image_part(
    mut multipart: Multipart,
    max_body_bytes: usize,
) -> Result<ImageUpload, ApiError> {
    let to_api = |e: MultipartError| multipart_error(e, max_body_bytes);
    while let Some(field) = multipart.next_field().await.map_err(to_api)? {
        if field.name() != Some("image") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(ApiError::bad_request(NO_SELECTED_FILE));
        }
        let bytes = field.bytes().await.map_err(to_api)?;
        return Ok(ImageUpload {
            filename,
            bytes: bytes.to_vec(),
        });
    }
    Err(ApiError::bad_request(NO_FILE_PART))
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    let result = run_prediction(&state, multipart, request_id).await;
    if let Err(ref e) = result {
        if e.is_client_error() {
            state.metrics.inc_client_errors();
            warn!(%request_id, status = %e.status, "Rejected prediction request: {}", e.message);
        } else {
            state.metrics.inc_prediction_failures();
            error!(%request_id, status = %e.status, "Error during prediction: {}", e.message);
        }
    }
    result
}

async fn run_prediction(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    request_id: Uuid,
) -> Result<Json<PredictionResponse>, ApiError> {
    if !state.predictor.is_ready() {
        return Err(ApiError::internal(crate::error::NOT_LOADED_MESSAGE));
    }

    // A body that is not multipart at all carries no file part.
    let Ok(multipart) = multipart else {
        return Err(ApiError::bad_request(NO_FILE_PART));
    };
    let upload = read_image_part(multipart, state.max_body_bytes).await?;

    let started = Instant::now();
    let predictor = state.predictor.clone();
    let bytes = upload.bytes;
    let outcome = tokio::task::spawn_blocking(move || predictor.predict_bytes(&bytes)).await;
    let elapsed = started.elapsed();
    state.metrics.record_inference(elapsed);
    let prediction =
        outcome.map_err(|e| ApiError::internal(format!("prediction task failed: {e}")))??;
    state.metrics.inc_predictions();

    let response = PredictionResponse::from(&prediction);
    info!(
        %request_id,
        filename = %upload.filename,
        breed = %response.breed,
        confidence = %response.confidence,
        elapsed_ms = elapsed.as_millis() as u64,
        "Prediction complete"
    );

    Ok(Json(response))
}
