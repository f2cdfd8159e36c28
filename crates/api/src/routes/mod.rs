pub mod auth;
pub mod category;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree (everything except `/health`).
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
///
/// /projects                            list (public), create (optional auth)
/// /projects/analytics/summary          dashboard rollup (public)
/// /projects/{id}                       get (public), update, delete
/// /projects/{id}/status                admin status override (PATCH)
/// /projects/{id}/assign                admin assignment (PATCH)
/// /projects/{id}/comments              list (public), create (auth)
/// /projects/{id}/todos                 create
/// /projects/{id}/todos/{todo_id}       update, delete
///
/// /categories                          list (public), create (admin)
/// /categories/{id}                     delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/categories", category::router())
}
