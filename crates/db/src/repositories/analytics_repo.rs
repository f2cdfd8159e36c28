//! Read-only rollups over the project collection.
//!
//! The three aggregation queries run without a shared snapshot; a concurrent
//! write may land between them. Read-committed best effort is acceptable for
//! a dashboard metric.

use serde::Serialize;
use sqlx::PgPool;

use crate::models::project::ProjectStatus;

/// Sentinel bucket name for projects without a resolvable category.
const UNCATEGORIZED: &str = "Uncategorized";

/// Project counts per workflow status. Always carries all four keys,
/// zero-filled for statuses with no projects.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub backlog: i64,
    pub in_progress: i64,
    pub review: i64,
    pub done: i64,
}

/// Budget sum and project count for one category bucket.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CategoryRollup {
    /// Resolved category name, or the [`UNCATEGORIZED`] sentinel.
    pub category: String,
    pub total_budget: f64,
    pub project_count: i64,
}

/// The full analytics payload for the dashboard summary endpoint.
#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub by_status: StatusBreakdown,
    pub by_category: Vec<CategoryRollup>,
    pub completed_this_week: i64,
}

/// Provides read-only aggregation queries over projects.
pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Compute the dashboard summary: counts by status, budget by category,
    /// and projects completed within the rolling last-7-days window.
    pub async fn summary(pool: &PgPool) -> Result<AnalyticsSummary, sqlx::Error> {
        let by_status = Self::by_status(pool).await?;
        let by_category = Self::by_category(pool).await?;
        let completed_this_week = Self::completed_this_week(pool).await?;

        Ok(AnalyticsSummary {
            by_status,
            by_category,
            completed_this_week,
        })
    }

    async fn by_status(pool: &PgPool) -> Result<StatusBreakdown, sqlx::Error> {
        let rows: Vec<(ProjectStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM projects GROUP BY status")
                .fetch_all(pool)
                .await?;

        // Zero-fill: every status key is present even with no projects.
        let mut breakdown = StatusBreakdown::default();
        for (status, count) in rows {
            match status {
                ProjectStatus::Backlog => breakdown.backlog = count,
                ProjectStatus::InProgress => breakdown.in_progress = count,
                ProjectStatus::Review => breakdown.review = count,
                ProjectStatus::Done => breakdown.done = count,
            }
        }
        Ok(breakdown)
    }

    async fn by_category(pool: &PgPool) -> Result<Vec<CategoryRollup>, sqlx::Error> {
        sqlx::query_as::<_, CategoryRollup>(
            "SELECT COALESCE(c.name, $1) AS category,
                    COALESCE(SUM(p.budget), 0) AS total_budget,
                    COUNT(*) AS project_count
             FROM projects p
             LEFT JOIN categories c ON c.id = p.category_id
             GROUP BY c.name
             ORDER BY category",
        )
        .bind(UNCATEGORIZED)
        .fetch_all(pool)
        .await
    }

    async fn completed_this_week(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects
             WHERE status = 'done' AND updated_at >= NOW() - INTERVAL '7 days'",
        )
        .fetch_one(pool)
        .await
    }
}
