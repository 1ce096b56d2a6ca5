use crate::{
    auth::AuthUser,
    errors::ServiceError,
    services::users::{UserListItem, UserProfile},
    AppState,
};
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserListItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: UserProfile,
}

/// List every dashboard account
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Accounts, oldest first", body = UserListResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Server Error", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<UserListResponse>, ServiceError> {
    let users = state.services.users.list_users().await?;
    Ok(Json(UserListResponse { users }))
}

/// Profile of the account behind the bearer token
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CurrentUserResponse>, ServiceError> {
    let user = state.services.users.get_profile(auth.user_id).await?;
    Ok(Json(CurrentUserResponse { user }))
}
