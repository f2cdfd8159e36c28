//! Route definitions for the `/projects` resource, including the nested
//! todo/comment sub-collections and the analytics summary.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{analytics, comment, project, todo};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /analytics/summary       -> analytics summary
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
/// PATCH  /{id}/status             -> set_status (admin)
/// PATCH  /{id}/assign             -> assign_users (admin)
/// GET    /{id}/comments           -> comment list
/// POST   /{id}/comments           -> add comment
/// POST   /{id}/todos              -> add todo
/// PATCH  /{id}/todos/{todo_id}    -> update todo
/// DELETE /{id}/todos/{todo_id}    -> delete todo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/analytics/summary", get(analytics::summary))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/status", patch(project::set_status))
        .route("/{id}/assign", patch(project::assign_users))
        .route("/{id}/comments", get(comment::list).post(comment::create))
        .route("/{id}/todos", post(todo::create))
        .route(
            "/{id}/todos/{todo_id}",
            patch(todo::update).delete(todo::delete),
        )
}
