use crate::{
    auth::AuthUser,
    entities::inventory_alert::{self, AlertLevel},
    errors::ApiError,
    services::alerts::{AlertCounts, AlertView},
    ApiResponse, AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AlertListQuery {
    /// CRITICAL, WARNING or INFO, any case
    pub level: Option<String>,
}

impl AlertListQuery {
    fn level(&self) -> Result<Option<AlertLevel>, ApiError> {
        match self.level.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => AlertLevel::from_str(raw)
                .map(Some)
                .map_err(|_| ApiError::BadRequest {
                    message: format!(
                        "Unknown alert level '{}', expected CRITICAL, WARNING or INFO",
                        raw
                    ),
                }),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResolveAllResponse {
    pub resolved: u64,
}

type AlertResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Open alerts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    params(AlertListQuery),
    responses(
        (status = 200, description = "Unresolved alerts", body = [AlertView]),
        (status = 400, description = "Unknown level", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "alerts"
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertListQuery>,
) -> AlertResult<Vec<AlertView>> {
    let level = query.level()?;
    let alerts = state.services.alerts.list_unresolved(level).await?;
    Ok(Json(ApiResponse::success(alerts)))
}

/// Open alert counts per level
#[utoipa::path(
    get,
    path = "/api/v1/alerts/counts",
    responses((status = 200, description = "Counts per level", body = AlertCounts)),
    security(("bearer_auth" = [])),
    tag = "alerts"
)]
pub async fn alert_counts(State(state): State<AppState>) -> AlertResult<AlertCounts> {
    let counts = state.services.alerts.counts().await?;
    Ok(Json(ApiResponse::success(counts)))
}

/// Mark one alert resolved by the calling user
#[utoipa::path(
    post,
    path = "/api/v1/alerts/{id}/resolve",
    params(("id" = Uuid, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Resolved alert", body = inventory_alert::Model),
        (status = 404, description = "No such alert", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "alerts"
)]
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth: AuthUser,
) -> AlertResult<inventory_alert::Model> {
    let alert = state
        .services
        .alerts
        .resolve(id, auth.display_name())
        .await?;
    Ok(Json(ApiResponse::success(alert)))
}

/// Resolve every open alert
#[utoipa::path(
    post,
    path = "/api/v1/alerts/resolve-all",
    responses((status = 200, description = "Number of alerts resolved", body = ResolveAllResponse)),
    security(("bearer_auth" = [])),
    tag = "alerts"
)]
pub async fn resolve_all_alerts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AlertResult<ResolveAllResponse> {
    let resolved = state
        .services
        .alerts
        .resolve_all(auth.display_name())
        .await?;
    Ok(Json(ApiResponse::success(ResolveAllResponse { resolved })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn level_filter_parses_any_case() {
        let query = AlertListQuery {
            level: Some("warning".into()),
        };
        assert_matches!(query.level(), Ok(Some(AlertLevel::Warning)));
    }

    #[test]
    fn blank_level_means_all() {
        let query = AlertListQuery {
            level: Some("  ".into()),
        };
        assert_matches!(query.level(), Ok(None));
    }

    #[test]
    fn unknown_level_is_bad_request() {
        let query = AlertListQuery {
            level: Some("urgent".into()),
        };
        assert_matches!(query.level(), Err(ApiError::BadRequest { .. }));
    }
}
