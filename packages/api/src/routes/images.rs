use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use whisker_core::{FaceDetail, ImageReference, Judgement, RecognizedImage};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recognition", post(recognize_image))
        .route("/faces", post(detect_faces))
        .route("/judge", post(judge_image))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionRequest {
    /// Base64 (standard alphabet) encoded image
    pub image: String,
    pub image_extension: String,
}

#[derive(Debug, Deserialize)]
pub struct FacesRequest {
    pub image: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacesResponse {
    pub face_details: Vec<FaceDetail>,
}

#[tracing::instrument(name = "POST /images/recognition", skip_all)]
pub async fn recognize_image(
    State(state): State<AppState>,
    payload: Result<Json<RecognitionRequest>, JsonRejection>,
) -> Result<Json<RecognizedImage>, ApiError> {
    let Json(request) = payload?;
    let recognized = state
        .recognition
        .recognize(&request.image, &request.image_extension)
        .await?;
    Ok(Json(recognized))
}

#[tracing::instrument(name = "POST /images/faces", skip_all)]
pub async fn detect_faces(
    State(state): State<AppState>,
    payload: Result<Json<FacesRequest>, JsonRejection>,
) -> Result<Json<FacesResponse>, ApiError> {
    let Json(request) = payload?;
    let face_details = state.recognition.detect_faces(&request.image).await?;
    Ok(Json(FacesResponse { face_details }))
}

/// Rejected extensions and non-cat images are successful responses; only a
/// detector failure is an error.
#[tracing::instrument(name = "POST /images/judge", skip_all)]
pub async fn judge_image(
    State(state): State<AppState>,
    payload: Result<Json<ImageReference>, JsonRejection>,
) -> Result<Json<Judgement>, ApiError> {
    let Json(reference) = payload?;
    let judgement = state.judge.judge(&reference).await?;
    Ok(Json(judgement))
}
