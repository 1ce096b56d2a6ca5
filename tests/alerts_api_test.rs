//! Inventory alert listing and resolution.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{response_json, TestApp};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;
use wireplant_api::entities::inventory_alert::{self, AlertLevel};

#[tokio::test]
async fn unresolved_alerts_newest_first_with_material() {
    let app = TestApp::new().await;
    let material = app.seed_material("GI-2.5", "GI").await;
    let now = Utc::now();
    let older = app
        .seed_alert(AlertLevel::Warning, None, now - Duration::hours(2))
        .await;
    let newer = app
        .seed_alert(AlertLevel::Critical, Some(material.id), now)
        .await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/alerts", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let alerts = body["data"].as_array().expect("alerts");
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["id"], newer.id.to_string());
    assert_eq!(alerts[0]["alert_level"], "CRITICAL");
    assert_eq!(alerts[0]["material"]["item_code"], "GI-2.5");
    assert_eq!(alerts[1]["id"], older.id.to_string());
    assert!(alerts[1]["material"].is_null());
}

#[tokio::test]
async fn level_filter_is_case_insensitive() {
    let app = TestApp::new().await;
    let now = Utc::now();
    app.seed_alert(AlertLevel::Warning, None, now).await;
    app.seed_alert(AlertLevel::Info, None, now).await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/alerts?level=info", None)
        .await;
    let body = response_json(response).await;
    let alerts = body["data"].as_array().expect("alerts");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_level"], "INFO");

    let bad = app
        .request_authenticated(Method::GET, "/api/v1/alerts?level=urgent", None)
        .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resolving_records_user_and_is_idempotent() {
    let app = TestApp::new().await;
    let alert = app
        .seed_alert(AlertLevel::Critical, None, Utc::now())
        .await;
    let uri = format!("/api/v1/alerts/{}/resolve", alert.id);

    let first = app.request_authenticated(Method::POST, &uri, None).await;
    assert_eq!(first.status(), StatusCode::OK);
    let body = response_json(first).await;
    assert_eq!(body["data"]["resolved"], true);
    assert_eq!(body["data"]["resolved_by"], "Plant Admin");
    assert!(body["data"]["resolved_at"].is_string());

    let second = app.request_authenticated(Method::POST, &uri, None).await;
    assert_eq!(second.status(), StatusCode::OK);
    let body = response_json(second).await;
    assert_eq!(body["data"]["resolved"], true);

    let listed = app
        .request_authenticated(Method::GET, "/api/v1/alerts", None)
        .await;
    let body = response_json(listed).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn resolving_unknown_alert_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/alerts/{}/resolve", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resolve_all_reports_count_and_clears_open_alerts() {
    let app = TestApp::new().await;
    let now = Utc::now();
    app.seed_alert(AlertLevel::Critical, None, now).await;
    app.seed_alert(AlertLevel::Warning, None, now).await;
    let already = app.seed_alert(AlertLevel::Info, None, now).await;
    let resolve_one = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/alerts/{}/resolve", already.id),
            None,
        )
        .await;
    assert_eq!(resolve_one.status(), StatusCode::OK);

    let response = app
        .request_authenticated(Method::POST, "/api/v1/alerts/resolve-all", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["resolved"], 2);

    let open = inventory_alert::Entity::find()
        .filter(inventory_alert::Column::Resolved.eq(false))
        .count(&*app.state.db)
        .await
        .expect("count open alerts");
    assert_eq!(open, 0);
}

#[tokio::test]
async fn counts_group_open_alerts_by_level() {
    let app = TestApp::new().await;
    let now = Utc::now();
    app.seed_alert(AlertLevel::Critical, None, now).await;
    app.seed_alert(AlertLevel::Critical, None, now).await;
    app.seed_alert(AlertLevel::Warning, None, now).await;

    let response = app
        .request_authenticated(Method::GET, "/api/v1/alerts/counts", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["critical"], 2);
    assert_eq!(body["data"]["warning"], 1);
    assert_eq!(body["data"]["info"], 0);
    assert_eq!(body["data"]["total"], 3);
}
