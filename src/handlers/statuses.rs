// handlers/statuses.rs - /api/Statuses

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::StatusModel;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/Statuses
pub async fn get_statuses(State(state): State<AppState>) -> ApiResult<Vec<StatusModel>> {
    Ok(ApiResponse::success(state.statuses.get_statuses().await?))
}
