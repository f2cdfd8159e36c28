//! HTTP-level integration tests for project comments.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json_auth};
use sqlx::PgPool;

async fn create_project(pool: &PgPool, token: &str) -> i64 {
    let body = serde_json::json!({
        "title": "Discussed",
        "description": "d",
        "budget": 5.0
    });
    let response = post_json_auth(common::build_test_app(pool.clone()), "/projects", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Any authenticated user can comment, ownership is not required. The stored
/// author is always the caller, and the read side resolves their email.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_owner_can_comment(pool: PgPool) {
    let owner = common::create_user(&pool, "owner@test.com", "user").await;
    let visitor = common::create_user(&pool, "visitor@test.com", "user").await;

    let id = create_project(&pool, &common::token_for(&owner)).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/projects/{id}/comments"),
        &common::token_for(&visitor),
        serde_json::json!({ "text": "  looks promising  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comments = body_json(response).await;
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"], "looks promising");
    assert_eq!(comments[0]["user"]["id"], visitor.id);
    assert_eq!(comments[0]["user"]["email"], "visitor@test.com");
    assert!(comments[0]["id"].is_string());
    assert!(comments[0]["created_at"].is_string());
}

/// Comments require authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_anonymous_comment_rejected(pool: PgPool) {
    let owner = common::create_user(&pool, "owner@test.com", "user").await;
    let id = create_project(&pool, &common::token_for(&owner)).await;

    let response = common::post_json(
        common::build_test_app(pool),
        &format!("/projects/{id}/comments"),
        serde_json::json!({ "text": "drive-by" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The comment list is public and ordered oldest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_list_is_public_and_ordered(pool: PgPool) {
    let owner = common::create_user(&pool, "owner@test.com", "user").await;
    let token = common::token_for(&owner);
    let id = create_project(&pool, &token).await;

    for text in ["first", "second", "third"] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/projects/{id}/comments"),
            &token,
            serde_json::json!({ "text": text }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(
        common::build_test_app(pool),
        &format!("/projects/{id}/comments"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let comments = body_json(response).await;
    let texts: Vec<&str> = comments
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

/// Whitespace-only comment text is a validation failure.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_empty_comment_text_rejected(pool: PgPool) {
    let owner = common::create_user(&pool, "owner@test.com", "user").await;
    let token = common::token_for(&owner);
    let id = create_project(&pool, &token).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/projects/{id}/comments"),
        &token,
        serde_json::json!({ "text": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Commenting on a missing project is 404, not a silent create.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_on_missing_project(pool: PgPool) {
    let user = common::create_user(&pool, "user@test.com", "user").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/projects/999999/comments",
        &common::token_for(&user),
        serde_json::json!({ "text": "hello?" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
