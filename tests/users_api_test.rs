//! User directory and profile endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp, ADMIN_EMAIL};
use sea_orm::EntityTrait;
use wireplant_api::entities::user;

#[tokio::test]
async fn list_users_returns_wrapped_camel_case_rows() {
    let app = TestApp::new().await;
    app.seed_user("Line Operator", "operator@wireplant.test", "operator")
        .await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/users", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let users = body["users"].as_array().expect("users array");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], ADMIN_EMAIL);
    assert_eq!(users[1]["role"], "operator");
    assert!(users[0].get("createdAt").is_some());
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn me_returns_token_subject() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/users/me", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["user"]["id"], app.admin.id.to_string());
    assert_eq!(body["user"]["name"], "Plant Admin");
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn me_for_deleted_account_is_not_found() {
    let app = TestApp::new().await;
    user::Entity::delete_by_id(app.admin.id)
        .exec(&*app.state.db)
        .await
        .expect("delete admin");

    let response = app
        .request_authenticated(Method::GET, "/api/v1/users/me", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storage_failure_answers_generic_server_error() {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let app = TestApp::new().await;
    app.state
        .db
        .execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "DROP TABLE users".to_string(),
        ))
        .await
        .expect("drop users table");

    let response = app
        .request_authenticated(Method::GET, "/api/v1/users", None)
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Server Error");
    assert!(body["request_id"].is_string());
}
