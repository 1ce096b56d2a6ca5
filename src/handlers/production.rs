use crate::{
    entities::{flattening_section, spiral_section},
    errors::ServiceError,
    handlers::common::{created_response, validate_input, PaginationParams},
    services::production::{NewSectionRecord, SectionFilter, SectionPage},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};

/// Flattening output, newest first
#[utoipa::path(
    get,
    path = "/api/v1/production/flattening",
    params(SectionFilter, PaginationParams),
    responses(
        (status = 200, description = "Page of flattening records"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "production"
)]
pub async fn list_flattening(
    State(state): State<AppState>,
    Query(filter): Query<SectionFilter>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<SectionPage<flattening_section::Model>> {
    let page = state
        .services
        .production
        .list_flattening(&filter, pagination.page, pagination.per_page)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Record a flattening (production) entry
#[utoipa::path(
    post,
    path = "/api/v1/production/flattening",
    request_body = NewSectionRecord,
    responses(
        (status = 201, description = "Recorded", body = flattening_section::Model),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "production"
)]
pub async fn create_flattening(
    State(state): State<AppState>,
    Json(payload): Json<NewSectionRecord>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let record = state.services.production.record_flattening(payload).await?;
    Ok(created_response(ApiResponse::success(record)))
}

/// Spiral intake (consumption), newest first
#[utoipa::path(
    get,
    path = "/api/v1/production/spiral",
    params(SectionFilter, PaginationParams),
    responses(
        (status = 200, description = "Page of spiral records"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "production"
)]
pub async fn list_spiral(
    State(state): State<AppState>,
    Query(filter): Query<SectionFilter>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<SectionPage<spiral_section::Model>> {
    let page = state
        .services
        .production
        .list_spiral(&filter, pagination.page, pagination.per_page)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Record a spiral (consumption) entry
#[utoipa::path(
    post,
    path = "/api/v1/production/spiral",
    request_body = NewSectionRecord,
    responses(
        (status = 201, description = "Recorded", body = spiral_section::Model),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "production"
)]
pub async fn create_spiral(
    State(state): State<AppState>,
    Json(payload): Json<NewSectionRecord>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;
    let record = state.services.production.record_spiral(payload).await?;
    Ok(created_response(ApiResponse::success(record)))
}
