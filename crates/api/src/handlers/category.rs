//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskhub_core::error::CoreError;
use taskhub_core::types::DbId;
use taskhub_db::models::category::{Category, CreateCategory};
use taskhub_db::repositories::{CategoryRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(categories))
}

/// POST /categories (admin only)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category name must not be empty".into(),
        )));
    }
    let category = CategoryRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /categories/{id} (admin only)
///
/// Deletion is rejected while any project still references the category,
/// instead of leaving dangling references behind.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let referencing = ProjectRepo::count_by_category(&state.pool, id).await?;
    if referencing > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category is referenced by {referencing} project(s)"
        ))));
    }

    let deleted = CategoryRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: id.to_string(),
        }))
    }
}
