use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SystemStatus};
use crate::config::Config;
use crate::lifecycle::ItemStatus;

/// GET /api/system/status
///
/// Aggregates uptime, database health and per-status item counts.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let database = state.store().ping().await.is_ok();

    let teachers = state.store().count_teachers().await?;
    let lost_items = state
        .store()
        .count_items_by_status(ItemStatus::Lost)
        .await?;
    let collected_items = state
        .store()
        .count_items_by_status(ItemStatus::Collected)
        .await?;
    let archived_items = state
        .store()
        .count_items_by_status(ItemStatus::Archived)
        .await?;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        database,
        bootstrapped: teachers > 0,
        teachers,
        lost_items,
        collected_items,
        archived_items,
    })))
}

/// GET /api/system/config
///
/// Returns the running configuration. Nothing here is secret; credentials
/// live hashed in the database, not in the config file.
pub async fn get_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Config>>, ApiError> {
    let config = state.config().read().await.clone();
    Ok(Json(ApiResponse::success(config)))
}
