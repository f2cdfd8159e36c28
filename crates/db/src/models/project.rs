//! Project aggregate model, embedded sub-collections, and DTOs.
//!
//! Todos and comments are value records owned exclusively by one project and
//! stored as JSONB arrays on the row. Their ids are meaningful only inside
//! the parent; there is no standalone table for them.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use taskhub_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::models::category::CategoryRef;
use crate::models::user::UserSummary;

/// Project workflow status.
///
/// `Review` is never produced by derivation; it is only reachable through
/// the admin status override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
pub enum ProjectStatus {
    Backlog,
    InProgress,
    Review,
    Done,
}

/// A single checklist item embedded in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub done: bool,
    pub created_at: Timestamp,
}

impl Todo {
    /// Build a new undone todo with a fresh id. `text` must already be
    /// trimmed and non-empty (validated at the handler boundary).
    pub fn new(text: String) -> Self {
        Todo {
            id: Uuid::new_v4(),
            text,
            done: false,
            created_at: chrono::Utc::now(),
        }
    }
}

/// A single comment embedded in a project. `user` is a raw user reference;
/// it is resolved to an email at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user: DbId,
    pub text: String,
    pub created_at: Timestamp,
}

impl Comment {
    pub fn new(user: DbId, text: String) -> Self {
        Comment {
            id: Uuid::new_v4(),
            user,
            text,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Recompute a project's workflow status from its todo list.
///
/// Deterministic and side-effect free; depends only on the total count and
/// the done count. Invoked after every todo mutation, never after a plain
/// field update or an admin status override.
pub fn recalc_status(todos: &[Todo]) -> ProjectStatus {
    let total = todos.len();
    if total == 0 {
        return ProjectStatus::Backlog;
    }
    let done = todos.iter().filter(|t| t.done).count();
    if done == total {
        ProjectStatus::Done
    } else if done > 0 {
        ProjectStatus::InProgress
    } else {
        ProjectStatus::Backlog
    }
}

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category_id: Option<DbId>,
    pub owner_id: Option<DbId>,
    pub deadline: Option<Timestamp>,
    pub status: ProjectStatus,
    pub assigned_users: Vec<DbId>,
    pub todos: Json<Vec<Todo>>,
    pub comments: Json<Vec<Comment>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project. The owner is never part of the body;
/// it comes from the (optional) authenticated creation path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category_id: Option<DbId>,
    pub deadline: Option<Timestamp>,
    pub assigned_users: Option<Vec<DbId>>,
}

/// DTO for updating an existing project. Only the allow-listed fields are
/// represented; anything else in the request body is silently ignored by
/// deserialization. The owner is deliberately absent.
///
/// A JSON `null` deserializes to `None` and is therefore indistinguishable
/// from an absent field: nullable columns (`category_id`, `deadline`)
/// cannot be cleared back to NULL through this path. Supporting that would
/// need a double-`Option` wrapper distinguishing null from absent.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub category_id: Option<DbId>,
    /// Direct status write -- an accepted override path distinct from the
    /// todo-driven derivation.
    pub status: Option<ProjectStatus>,
    pub deadline: Option<Timestamp>,
    pub assigned_users: Option<Vec<DbId>>,
}

/// DTO for patching a single todo. Both fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodo {
    pub text: Option<String>,
    pub done: Option<bool>,
}

/// A comment with its author reference resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub user: CommentUser,
    pub text: String,
    pub created_at: Timestamp,
}

/// The author of a comment. `email` is `None` when the referenced user no
/// longer exists.
#[derive(Debug, Clone, Serialize)]
pub struct CommentUser {
    pub id: DbId,
    pub email: Option<String>,
}

/// A project with reference fields expanded for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub category: Option<CategoryRef>,
    pub owner_id: Option<DbId>,
    pub deadline: Option<Timestamp>,
    pub status: ProjectStatus,
    pub assigned_users: Vec<UserSummary>,
    pub todos: Vec<Todo>,
    pub comments: Vec<CommentView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
