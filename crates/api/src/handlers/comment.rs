//! Handlers for a project's embedded comments.
//!
//! Commenting requires only authentication, not ownership: any logged-in
//! user may comment on any project. Reading comments is public.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskhub_core::types::DbId;
use taskhub_db::models::project::{Comment, CommentView};
use taskhub_db::repositories::ProjectRepo;

use super::project::{load_project, require_non_empty};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub text: String,
}

/// POST /projects/{id}/comments
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddCommentRequest>,
) -> AppResult<(StatusCode, Json<Vec<CommentView>>)> {
    let project = load_project(&state, id).await?;
    require_non_empty(&input.text, "Comment text")?;

    let mut comments = project.comments.0;
    comments.push(Comment::new(user.user_id, input.text.trim().to_string()));

    ProjectRepo::save_comments(&state.pool, id, &comments).await?;
    let views = ProjectRepo::expand_comments(&state.pool, &comments).await?;
    Ok((StatusCode::CREATED, Json(views)))
}

/// GET /projects/{id}/comments
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<CommentView>>> {
    let project = load_project(&state, id).await?;
    let views = ProjectRepo::expand_comments(&state.pool, &project.comments.0).await?;
    Ok(Json(views))
}
