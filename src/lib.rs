//! Wireplant API Library
//!
//! Production-section records, material balance reports, inventory ledger
//! aggregation and alert handling for a wire-manufacturing plant.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod middleware_helpers;
pub mod openapi;
pub mod reports;
pub mod services;
pub mod tracing;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::compression::CompressionLayer;
use utoipa::ToSchema;

use crate::auth::{AuthConfig, AuthRouterExt, AuthService};

const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(1);

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wires every service against one shared pool.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let auth = Arc::new(AuthService::new(AuthConfig::from(&config), db.clone()));
        let services = handlers::AppServices::new(db.clone(), &config);
        Self {
            db,
            config,
            services,
            auth,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Routes mounted under `/api/v1`. Everything except status and health needs
/// a bearer token.
pub fn api_v1_routes() -> Router<AppState> {
    let users = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route("/users/me", get(handlers::users::current_user));

    let production = Router::new()
        .route(
            "/production/flattening",
            get(handlers::production::list_flattening).post(handlers::production::create_flattening),
        )
        .route(
            "/production/spiral",
            get(handlers::production::list_spiral).post(handlers::production::create_spiral),
        );

    let reports = Router::new()
        .route(
            "/reports/material-balance",
            get(handlers::reports::material_balance),
        )
        .route(
            "/reports/material-balance.csv",
            get(handlers::reports::material_balance_csv),
        );

    let ledger = Router::new()
        .route("/inventory/ledger", get(handlers::ledger::list_ledger))
        .route(
            "/inventory/ledger/summary",
            get(handlers::ledger::ledger_summary),
        );

    let alerts = Router::new()
        .route("/alerts", get(handlers::alerts::list_alerts))
        .route("/alerts/counts", get(handlers::alerts::alert_counts))
        .route(
            "/alerts/resolve-all",
            post(handlers::alerts::resolve_all_alerts),
        )
        .route("/alerts/:id/resolve", post(handlers::alerts::resolve_alert));

    let dashboard = Router::new()
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/dashboard/export", get(handlers::dashboard::export_dashboard))
        .route("/dashboard/stream", get(handlers::dashboard::dashboard_stream));

    let protected = Router::new()
        .merge(users)
        .merge(production)
        .merge(reports)
        .merge(ledger)
        .merge(alerts)
        .merge(dashboard)
        .with_auth();

    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(protected)
}

/// Full application router with the shared middleware stack. CORS is added
/// by the binary since it depends on deployment settings.
pub fn app_router(state: AppState) -> Router {
    let auth_service = state.auth.clone();

    Router::<AppState>::new()
        .route("/", get(|| async { "wireplant-api up" }))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/metrics/json", get(metrics::metrics_json_handler))
        .nest("/api/v1", api_v1_routes())
        .nest("/auth", auth::auth_routes().with_state(auth_service.clone()))
        .merge(openapi::swagger_ui())
        .layer(middleware::from_fn(request_logging_middleware))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        // Inject AuthService into request extensions for auth middleware
        .layer(middleware::from_fn_with_state(
            auth_service,
            inject_auth_service,
        ))
        // Ensure every request carries a request id for traceability
        .layer(middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

async fn inject_auth_service(
    State(auth): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(auth);
    next.run(request).await
}

async fn api_status(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "wireplant-api",
        "environment": state.config.environment,
        "timestamp": Utc::now().to_rfc3339(),
    });

    Json(ApiResponse::success(status_data))
}

async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    let db_status = match db::check_connection(&state.db).await {
        Ok(()) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    Json(ApiResponse::success(health_data))
}

// Request logging middleware
async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    ::tracing::debug!(method = %method, path = %path, "Incoming request");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();
    metrics::ENDPOINT_METRICS.record_request(duration, status.as_u16());
    crate::tracing::log_slow_request(method.as_str(), &path, duration, SLOW_REQUEST_THRESHOLD);

    ::tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        elapsed_ms = duration.as_millis() as u64,
        "Request completed"
    );

    response
}

pub mod prelude {
    pub use crate::db::*;
    pub use crate::errors::*;
    pub use crate::metrics::*;
    pub use crate::reports::*;
    pub use crate::tracing::*;
}
