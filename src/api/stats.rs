use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::constants::stats::MONTHLY_BUCKETS;
use crate::models::MonthlyCount;

/// GET /stats/monthly
///
/// Upload counts per calendar month for the trailing year, oldest first.
/// Months with no uploads are present with a zero count so the chart axis
/// stays continuous.
pub async fn monthly(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<MonthlyCount>>>, ApiError> {
    let counts = state.store().monthly_item_counts(MONTHLY_BUCKETS).await?;
    Ok(Json(ApiResponse::success(counts)))
}
