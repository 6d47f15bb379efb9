//! System info handlers.

use crate::dto::VersionResponse;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

pub async fn version(State(state): State<AppState>) -> Result<Json<VersionResponse>, ApiError> {
    let info = state.info.version().await?;
    Ok(Json(info.into()))
}
