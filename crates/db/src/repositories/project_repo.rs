//! Repository for the `projects` aggregate.
//!
//! Nested todo/comment mutations are applied to an in-memory copy of the
//! aggregate by the caller and written back here as a single row UPDATE, so
//! a nested change and its derived status land atomically relative to that
//! one write. Every write also refreshes `updated_at`.

use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::PgPool;
use taskhub_core::types::DbId;

use crate::models::category::CategoryRef;
use crate::models::project::{
    Comment, CommentUser, CommentView, CreateProject, Project, ProjectStatus, ProjectView, Todo,
    UpdateProject,
};
use crate::models::user::UserSummary;
use crate::repositories::UserRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, budget, category_id, owner_id, deadline, status, \
                       assigned_users, todos, comments, created_at, updated_at";

/// Provides CRUD and nested-collection operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// `owner` is the id of the creating user when the authenticated
    /// creation path is used; the legacy path passes `None`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        owner: Option<DbId>,
    ) -> Result<Project, sqlx::Error> {
        let assigned = input.assigned_users.clone().unwrap_or_default();
        let query = format!(
            "INSERT INTO projects (title, description, budget, category_id, owner_id, deadline, assigned_users)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.budget)
            .bind(input.category_id)
            .bind(owner)
            .bind(input.deadline)
            .bind(&assigned)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied; the
    /// owner is not part of the allow-list and can never change here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                budget = COALESCE($4, budget),
                category_id = COALESCE($5, category_id),
                status = COALESCE($6, status),
                deadline = COALESCE($7, deadline),
                assigned_users = COALESCE($8, assigned_users),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.budget)
            .bind(input.category_id)
            .bind(input.status)
            .bind(input.deadline)
            .bind(&input.assigned_users)
            .fetch_optional(pool)
            .await
    }

    /// Set the workflow status directly, bypassing derivation (admin
    /// override). Returns `None` if the project does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ProjectStatus,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Replace the entire assigned-user set. Not additive: assigning an
    /// empty list clears all prior assignments.
    pub async fn set_assigned_users(
        pool: &PgPool,
        id: DbId,
        user_ids: &[DbId],
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET assigned_users = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_ids)
            .fetch_optional(pool)
            .await
    }

    /// Persist a mutated todo list together with its recomputed status as
    /// one write. Returns `true` if a row was updated.
    pub async fn save_todos(
        pool: &PgPool,
        id: DbId,
        todos: &[Todo],
        status: ProjectStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET todos = $2, status = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(Json(todos))
        .bind(status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Persist a mutated comment list. Returns `true` if a row was updated.
    pub async fn save_comments(
        pool: &PgPool,
        id: DbId,
        comments: &[Comment],
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE projects SET comments = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(Json(comments))
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a project by ID. The embedded todos and comments go with
    /// the row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count projects referencing a category. Used to guard category deletion.
    pub async fn count_by_category(pool: &PgPool, category_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(pool)
            .await
    }

    /// Expand a single project's reference fields for an API response.
    pub async fn expand(pool: &PgPool, project: Project) -> Result<ProjectView, sqlx::Error> {
        Self::expand_many(pool, vec![project])
            .await?
            .into_iter()
            .next()
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Expand a batch of projects with two lookup queries total: one for
    /// referenced categories, one for referenced users (assignees and
    /// comment authors). A strictly read-time projection.
    pub async fn expand_many(
        pool: &PgPool,
        projects: Vec<Project>,
    ) -> Result<Vec<ProjectView>, sqlx::Error> {
        let mut category_ids: Vec<DbId> = projects.iter().filter_map(|p| p.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let mut user_ids: Vec<DbId> = projects
            .iter()
            .flat_map(|p| {
                p.assigned_users
                    .iter()
                    .copied()
                    .chain(p.comments.0.iter().map(|c| c.user))
            })
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let categories = Self::category_refs_by_ids(pool, &category_ids).await?;
        let users: HashMap<DbId, UserSummary> = UserRepo::summaries_by_ids(pool, &user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(projects
            .into_iter()
            .map(|p| build_view(p, &categories, &users))
            .collect())
    }

    /// Expand a comment list, resolving author references to emails.
    pub async fn expand_comments(
        pool: &PgPool,
        comments: &[Comment],
    ) -> Result<Vec<CommentView>, sqlx::Error> {
        let mut user_ids: Vec<DbId> = comments.iter().map(|c| c.user).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users: HashMap<DbId, UserSummary> = UserRepo::summaries_by_ids(pool, &user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(comments
            .iter()
            .map(|c| comment_view(c, &users))
            .collect())
    }

    async fn category_refs_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<HashMap<DbId, CategoryRef>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(DbId, String)> =
            sqlx::query_as("SELECT id, name FROM categories WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| (id, CategoryRef { id, name }))
            .collect())
    }
}

/// Assemble an expanded view from a row and the pre-fetched lookup maps.
fn build_view(
    project: Project,
    categories: &HashMap<DbId, CategoryRef>,
    users: &HashMap<DbId, UserSummary>,
) -> ProjectView {
    let category = project
        .category_id
        .and_then(|id| categories.get(&id).cloned());

    let assigned_users = project
        .assigned_users
        .iter()
        .filter_map(|id| users.get(id).cloned())
        .collect();

    let comments = project
        .comments
        .0
        .iter()
        .map(|c| comment_view(c, users))
        .collect();

    ProjectView {
        id: project.id,
        title: project.title,
        description: project.description,
        budget: project.budget,
        category,
        owner_id: project.owner_id,
        deadline: project.deadline,
        status: project.status,
        assigned_users,
        todos: project.todos.0,
        comments,
        created_at: project.created_at,
        updated_at: project.updated_at,
    }
}

fn comment_view(comment: &Comment, users: &HashMap<DbId, UserSummary>) -> CommentView {
    CommentView {
        id: comment.id,
        user: CommentUser {
            id: comment.user,
            email: users.get(&comment.user).map(|u| u.email.clone()),
        },
        text: comment.text.clone(),
        created_at: comment.created_at,
    }
}
