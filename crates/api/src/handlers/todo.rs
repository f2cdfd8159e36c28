//! Handlers for a project's embedded todo checklist.
//!
//! Every mutation loads the aggregate, applies the change in memory,
//! recomputes the workflow status, and persists todos + status as a single
//! row write. Each returns the full updated todo list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskhub_core::error::CoreError;
use taskhub_core::types::DbId;
use taskhub_db::models::project::{recalc_status, Todo, UpdateTodo};
use taskhub_db::repositories::ProjectRepo;
use uuid::Uuid;

use super::project::{ensure_can_modify, load_project, require_non_empty};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/todos`.
#[derive(Debug, Deserialize)]
pub struct AddTodoRequest {
    pub text: String,
}

/// POST /projects/{id}/todos
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddTodoRequest>,
) -> AppResult<(StatusCode, Json<Vec<Todo>>)> {
    let project = load_project(&state, id).await?;
    ensure_can_modify(&user, project.owner_id)?;
    require_non_empty(&input.text, "Todo text")?;

    let mut todos = project.todos.0;
    todos.push(Todo::new(input.text.trim().to_string()));

    let status = recalc_status(&todos);
    ProjectRepo::save_todos(&state.pool, id, &todos, status).await?;
    Ok((StatusCode::CREATED, Json(todos)))
}

/// PATCH /projects/{id}/todos/{todo_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, todo_id)): Path<(DbId, Uuid)>,
    Json(input): Json<UpdateTodo>,
) -> AppResult<Json<Vec<Todo>>> {
    let project = load_project(&state, id).await?;
    ensure_can_modify(&user, project.owner_id)?;

    if let Some(text) = &input.text {
        require_non_empty(text, "Todo text")?;
    }

    let mut todos = project.todos.0;
    let todo = todos
        .iter_mut()
        .find(|t| t.id == todo_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Todo",
            id: todo_id.to_string(),
        }))?;

    if let Some(text) = input.text {
        todo.text = text.trim().to_string();
    }
    if let Some(done) = input.done {
        todo.done = done;
    }

    let status = recalc_status(&todos);
    ProjectRepo::save_todos(&state.pool, id, &todos, status).await?;
    Ok(Json(todos))
}

/// DELETE /projects/{id}/todos/{todo_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, todo_id)): Path<(DbId, Uuid)>,
) -> AppResult<Json<Vec<Todo>>> {
    let project = load_project(&state, id).await?;
    ensure_can_modify(&user, project.owner_id)?;

    let mut todos = project.todos.0;
    let before = todos.len();
    todos.retain(|t| t.id != todo_id);
    if todos.len() == before {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Todo",
            id: todo_id.to_string(),
        }));
    }

    let status = recalc_status(&todos);
    ProjectRepo::save_todos(&state.pool, id, &todos, status).await?;
    Ok(Json(todos))
}
