use crate::{
    entities::inventory_ledger,
    services::inventory_ledger::{LedgerOverview, LedgerQuery},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};

/// Most recent ledger entries
#[utoipa::path(
    get,
    path = "/api/v1/inventory/ledger",
    params(LedgerQuery),
    responses(
        (status = 200, description = "Ledger entries, newest first", body = [inventory_ledger::Model]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn list_ledger(
    State(state): State<AppState>,
    Query(query): Query<LedgerQuery>,
) -> ApiResult<Vec<inventory_ledger::Model>> {
    let entries = state.services.ledger.list_entries(&query).await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// Ledger totals and daily movements for the charts
#[utoipa::path(
    get,
    path = "/api/v1/inventory/ledger/summary",
    params(LedgerQuery),
    responses(
        (status = 200, description = "Summary and daily movements", body = LedgerOverview),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "inventory"
)]
pub async fn ledger_summary(
    State(state): State<AppState>,
    Query(query): Query<LedgerQuery>,
) -> ApiResult<LedgerOverview> {
    let overview = state.services.ledger.overview(&query).await?;
    Ok(Json(ApiResponse::success(overview)))
}
