//! Handler for the analytics summary endpoint.

use axum::extract::State;
use axum::Json;
use taskhub_db::repositories::analytics_repo::AnalyticsSummary;
use taskhub_db::repositories::AnalyticsRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /projects/analytics/summary
///
/// Read-only dashboard rollup: project counts by status (zero-filled),
/// budget totals per category, and completions in the last 7 days.
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<AnalyticsSummary>> {
    let summary = AnalyticsRepo::summary(&state.pool).await?;
    Ok(Json(summary))
}
