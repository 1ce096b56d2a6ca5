use crate::{
    errors::ServiceError,
    handlers::common::attachment_response,
    services::material_balance::{BalanceQuery, MaterialBalanceReport},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use chrono::Utc;

/// Item-wise production versus consumption
#[utoipa::path(
    get,
    path = "/api/v1/reports/material-balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Reconciled balance per item", body = MaterialBalanceReport),
        (status = 400, description = "Unknown status filter", body = crate::errors::ErrorResponse),
        (status = 500, description = "Server Error", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn material_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> ApiResult<MaterialBalanceReport> {
    let report = state.services.material_balance.generate(&query).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Same report as a CSV download
#[utoipa::path(
    get,
    path = "/api/v1/reports/material-balance.csv",
    params(BalanceQuery),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv"),
        (status = 400, description = "Unknown status filter", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn material_balance_csv(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Response, ServiceError> {
    let body = state.services.material_balance.export_csv(&query).await?;
    let filename = format!("material-balance-{}.csv", Utc::now().format("%Y%m%d"));
    Ok(attachment_response("text/csv; charset=utf-8", &filename, body))
}
