use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SweepResponse};

/// POST /api/system/tasks/sweep
///
/// Runs an archive sweep right now instead of waiting for the schedule.
/// Reports `ran: false` when a scheduled pass already holds the guard.
pub async fn trigger_sweep(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SweepResponse>>, ApiError> {
    let outcome = state.sweeper().run().await?;

    let response = outcome.map_or(
        SweepResponse {
            ran: false,
            examined: 0,
            archived: 0,
            skipped_malformed: 0,
        },
        |o| SweepResponse {
            ran: true,
            examined: o.examined,
            archived: o.archived,
            skipped_malformed: o.skipped_malformed,
        },
    );

    Ok(Json(ApiResponse::success(response)))
}
