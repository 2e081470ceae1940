//! Dashboard statistics.

use axum::Json;
use axum::extract::State;
use moodyme_core::stats;

use crate::AppState;
use crate::error::AppResult;
use crate::models::DashboardResponse;

/// `GET /api/admin/stats`
pub async fn stats_handler(State(state): State<AppState>) -> AppResult<Json<DashboardResponse>> {
    let dashboard = stats::dashboard_stats(state.identity.as_ref(), state.content()).await?;
    Ok(Json(DashboardResponse {
        success: true,
        stats: dashboard.stats,
        recent_users: dashboard.recent_users,
    }))
}
