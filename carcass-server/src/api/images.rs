//! Image availability endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use carcass_common::images::{self, ImageAvailability};
use tracing::debug;

use super::ApiError;
use crate::AppState;

/// GET /api/check-images/:id
///
/// Checks the filesystem on every call. A missing image is reported as
/// `false`; only real filesystem failures produce a 500.
pub async fn check_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImageAvailability>, ApiError> {
    images::validate_image_id(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let roots = state.image_roots.clone();
    let lookup_id = id.clone();
    let availability = tokio::task::spawn_blocking(move || images::resolve(&lookup_id, &roots))
        .await
        .map_err(|e| ApiError::ImageCheck(format!("image check task failed: {}", e)))?
        .map_err(|e| ApiError::ImageCheck(e.to_string()))?;

    debug!("Image availability for {}: {:?}", id, availability);
    Ok(Json(availability))
}
