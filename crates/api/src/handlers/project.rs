//! Handlers for the `/projects` resource.
//!
//! Mutating operations authorize through `taskhub_core::policy::can_modify`
//! before touching the aggregate; status-change and user-assignment are
//! admin-only regardless of ownership.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskhub_core::error::CoreError;
use taskhub_core::policy::can_modify;
use taskhub_core::types::DbId;
use taskhub_db::models::project::{CreateProject, Project, ProjectStatus, ProjectView, UpdateProject};
use taskhub_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `PATCH /projects/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: ProjectStatus,
}

/// Request body for `PATCH /projects/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignUsersRequest {
    pub user_ids: Vec<DbId>,
}

/// Load a project or fail with 404.
pub(crate) async fn load_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        }))
}

/// Fail with 403 unless `user` may mutate a project owned by `owner`.
pub(crate) fn ensure_can_modify(user: &AuthUser, owner: Option<DbId>) -> AppResult<()> {
    if !can_modify(Some(&user.actor()), owner) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have permission to modify this project".into(),
        )));
    }
    Ok(())
}

/// Reject a field value that is empty after trimming.
pub(crate) fn require_non_empty(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} must not be empty"
        ))));
    }
    Ok(())
}

/// POST /projects
///
/// Authenticated callers become the project owner; the legacy anonymous
/// path creates an ownerless (admin-only) project.
pub async fn create(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectView>)> {
    require_non_empty(&input.title, "title")?;
    require_non_empty(&input.description, "description")?;

    let owner = user.map(|u| u.user_id);
    let project = ProjectRepo::create(&state.pool, &input, owner).await?;
    let view = ProjectRepo::expand(&state.pool, project).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ProjectView>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    let views = ProjectRepo::expand_many(&state.pool, projects).await?;
    Ok(Json(views))
}

/// GET /projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectView>> {
    let project = load_project(&state, id).await?;
    let view = ProjectRepo::expand(&state.pool, project).await?;
    Ok(Json(view))
}

/// PUT /projects/{id}
///
/// Applies only the allow-listed fields; everything else in the body is
/// silently ignored. The owner can never change through this path.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<ProjectView>> {
    let project = load_project(&state, id).await?;
    ensure_can_modify(&user, project.owner_id)?;

    if let Some(title) = &input.title {
        require_non_empty(title, "title")?;
    }
    if let Some(description) = &input.description {
        require_non_empty(description, "description")?;
    }

    let updated = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        }))?;
    let view = ProjectRepo::expand(&state.pool, updated).await?;
    Ok(Json(view))
}

/// DELETE /projects/{id}
///
/// Hard delete; the embedded todos and comments are removed with the row.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = load_project(&state, id).await?;
    ensure_can_modify(&user, project.owner_id)?;

    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        }))
    }
}

/// PATCH /projects/{id}/status (admin only)
///
/// Manual override: writes the status directly and deliberately bypasses the
/// todo-driven derivation. The next todo mutation overwrites it.
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<Json<ProjectView>> {
    let updated = ProjectRepo::set_status(&state.pool, id, input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        }))?;
    let view = ProjectRepo::expand(&state.pool, updated).await?;
    Ok(Json(view))
}

/// PATCH /projects/{id}/assign (admin only)
///
/// Replaces the entire assigned-user set; assigning `[]` clears it.
pub async fn assign_users(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AssignUsersRequest>,
) -> AppResult<Json<ProjectView>> {
    let updated = ProjectRepo::set_assigned_users(&state.pool, id, &input.user_ids)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        }))?;
    let view = ProjectRepo::expand(&state.pool, updated).await?;
    Ok(Json(view))
}
