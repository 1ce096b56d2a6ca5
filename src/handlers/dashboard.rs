use crate::{
    errors::{ServiceError, SERVER_ERROR_MESSAGE},
    handlers::common::attachment_response,
    services::dashboard::{DashboardService, DashboardSnapshot},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Response,
    },
    Json,
};
use futures::stream::{self, Stream};
use std::{convert::Infallible, sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error};

/// Everything the dashboard cards need
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard snapshot", body = DashboardSnapshot),
        (status = 500, description = "Server Error", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<DashboardSnapshot> {
    let snapshot = state.services.dashboard.snapshot().await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

/// Snapshot as a downloadable JSON file
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/export",
    responses((status = 200, description = "JSON attachment", content_type = "application/json")),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn export_dashboard(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let snapshot = state.services.dashboard.snapshot().await?;
    let body = serde_json::to_vec_pretty(&snapshot)?;
    let filename = format!(
        "dashboard-{}.json",
        snapshot.generated_at.format("%Y%m%dT%H%M%SZ")
    );
    Ok(attachment_response("application/json", &filename, body))
}

/// Server-sent snapshots: one immediately, then one per refresh interval.
///
/// Each connection owns its timer, so a dropped client stops its own polling.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stream",
    responses((status = 200, description = "`snapshot` and `error` events", content_type = "text/event-stream")),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn dashboard_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let refresh = Duration::from_secs(state.config.dashboard_refresh_secs.max(1));
    debug!(refresh_secs = refresh.as_secs(), "Dashboard stream opened");
    Sse::new(snapshot_stream(state.services.dashboard.clone(), refresh))
        .keep_alive(KeepAlive::default())
}

fn snapshot_stream(
    service: Arc<DashboardService>,
    refresh: Duration,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let mut ticker = interval(refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    stream::unfold((ticker, service), |(mut ticker, service)| async move {
        ticker.tick().await;
        let event = snapshot_event(&service).await;
        Some((Ok(event), (ticker, service)))
    })
}

async fn snapshot_event(service: &DashboardService) -> Event {
    let result = service
        .snapshot()
        .await
        .and_then(|snapshot| {
            Event::default()
                .event("snapshot")
                .json_data(&snapshot)
                .map_err(|e| ServiceError::SerializationError(e.to_string()))
        });

    result.unwrap_or_else(|e| {
        error!("Dashboard stream snapshot failed: {}", e);
        Event::default().event("error").data(SERVER_ERROR_MESSAGE)
    })
}
