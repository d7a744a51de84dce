//! Carcass record endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use carcass_common::CarcassRecord;
use tracing::{debug, info};

use super::ApiError;
use crate::{db, AppState};

/// GET /api/carcass
///
/// Returns every record in storage order.
pub async fn list_carcasses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CarcassRecord>>, ApiError> {
    debug!("Fetching all carcass data");
    let records = db::list_carcasses(&state.db).await?;
    info!("Retrieved {} records", records.len());
    Ok(Json(records))
}

/// GET /api/carcass/:id
pub async fn get_carcass(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CarcassRecord>, ApiError> {
    debug!("Fetching carcass detail for {}", id);
    match db::get_carcass(&state.db, &id).await? {
        Some(record) => Ok(Json(record)),
        None => {
            info!("Carcass {} not found", id);
            Err(ApiError::CarcassNotFound(id))
        }
    }
}
