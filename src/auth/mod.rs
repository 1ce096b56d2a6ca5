/*!
 * # Authentication Module
 *
 * Bearer-token authentication for the Wireplant API.
 *
 * - Login checks an argon2 password hash and issues an HS256 JWT
 * - Every protected request carries its own token; nothing is cached globally
 * - Logout revokes the presented token until it would have expired anyway
 */

use async_trait::async_trait;
use axum::{
    extract::{DefaultBodyLimit, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::user,
    metrics::PLANT_METRICS,
    services::users::{UserProfile, UserService},
};

mod password;

pub use password::{hash_password, verify_password};

/// Claim structure for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // Subject (user ID)
    pub name: String,  // User's name
    pub email: String, // User's email
    pub role: String,  // User's role
    pub jti: String,   // JWT ID (unique identifier for this token)
    pub iat: i64,      // Issued at time
    pub exp: i64,      // Expiration time
    pub nbf: i64,      // Not valid before time
    pub iss: String,   // Issuer
    pub aud: String,   // Audience
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub token_id: String,
    pub expires_at: i64,
}

impl AuthUser {
    /// Name recorded on audit columns such as `resolved_by`
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?,
            name: claims.name,
            email: claims.email,
            role: claims.role,
            token_id: claims.jti,
            expires_at: claims.exp,
        })
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub jwt_issuer: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_audience: String,
        jwt_issuer: String,
        access_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_audience,
            jwt_issuer,
            access_token_expiration,
        }
    }
}

impl From<&crate::config::AppConfig> for AuthConfig {
    fn from(cfg: &crate::config::AppConfig) -> Self {
        Self::new(
            cfg.jwt_secret.clone(),
            cfg.auth_audience.clone(),
            cfg.auth_issuer.clone(),
            Duration::from_secs(cfg.jwt_expiration),
        )
    }
}

/// Authentication service that handles login, token issuance and revocation
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
    /// Revoked token ids mapped to their expiry (unix seconds)
    revoked_tokens: Arc<RwLock<HashMap<String, i64>>>,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self {
            config,
            db,
            revoked_tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Checks credentials and returns the matching account.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<user::Model, AuthError> {
        let users = UserService::new(self.db.clone());
        let account = users
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let Some(account) = account else {
            PLANT_METRICS.logins_failed.inc();
            debug!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let hash = account.password_hash.clone();
        let candidate = password.to_string();
        let verified = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))??;

        if !verified {
            PLANT_METRICS.logins_failed.inc();
            warn!(user_id = %account.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        PLANT_METRICS.logins_succeeded.inc();
        info!(user_id = %account.id, "User logged in");
        Ok(account)
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, account: &user::Model) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: account.id.to_string(),
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a JWT token and extract the claims
    pub async fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.config.jwt_audience.as_str()]);
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        if self.is_token_revoked(&claims.jti).await {
            return Err(AuthError::RevokedToken);
        }

        Ok(claims)
    }

    /// Revoke a token until its natural expiry
    pub async fn revoke(&self, token_id: &str, expires_at: i64) {
        let mut revoked = self.revoked_tokens.write().await;
        revoked.insert(token_id.to_string(), expires_at);

        let now = Utc::now().timestamp();
        revoked.retain(|_, exp| *exp > now);
    }

    async fn is_token_revoked(&self, token_id: &str) -> bool {
        self.revoked_tokens.read().await.contains_key(token_id)
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message): (StatusCode, &str, &str) = match &self {
            Self::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING",
                "Authentication required",
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_CREDENTIALS",
                "Invalid credentials",
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token",
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired",
            ),
            Self::RevokedToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REVOKED_TOKEN",
                "Authentication token has been revoked",
            ),
            Self::TokenCreation(_) | Self::DatabaseError(_) | Self::InternalError(_) => {
                error!(error = %self, "authentication failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AUTH_INTERNAL_ERROR",
                    crate::errors::SERVER_ERROR_MESSAGE,
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Authentication middleware that extracts and validates bearer tokens
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            error!("AuthService extension missing from request");
            return AuthError::InternalError("Authentication service not available".into())
                .into_response();
        }
    };

    match extract_auth_from_headers(request.headers(), &auth_service).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

async fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingAuth)?;

    let claims = auth_service.validate_token(token).await?;
    AuthUser::try_from(claims)
}

/// Login credentials
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginCredentials {
    #[schema(example = "supervisor@plant.example")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserProfile,
}

/// Authentication routes
pub fn auth_routes() -> axum::Router<Arc<AuthService>> {
    let logout = axum::Router::new()
        .route("/logout", axum::routing::post(logout_handler))
        .with_auth();

    axum::Router::new()
        .route("/login", axum::routing::post(login_handler))
        .merge(logout)
        .layer(DefaultBodyLimit::max(1024 * 64)) // 64KB limit
}

/// Login handler
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(auth_service): State<Arc<AuthService>>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<LoginResponse>, AuthError> {
    let account = auth_service
        .authenticate(&credentials.email, &credentials.password)
        .await?;
    let token = auth_service.generate_token(&account)?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: auth_service.config.access_token_expiration.as_secs(),
        user: UserProfile::from(account),
    }))
}

/// Logout handler
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn logout_handler(
    State(auth_service): State<Arc<AuthService>>,
    auth_user: AuthUser,
) -> StatusCode {
    auth_service
        .revoke(&auth_user.token_id, auth_user.expires_at)
        .await;
    info!(user_id = %auth_user.user_id, "User logged out");
    StatusCode::NO_CONTENT
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sea_orm::Database;

    async fn service() -> AuthService {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        AuthService::new(
            AuthConfig::new(
                "unit_test_secret_with_plenty_of_entropy_0123456789".into(),
                "wireplant-dashboard".into(),
                "wireplant-api".into(),
                Duration::from_secs(600),
            ),
            Arc::new(db),
        )
    }

    fn account() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            name: "Shift Supervisor".into(),
            email: "supervisor@plant.example".into(),
            password_hash: String::new(),
            role: "supervisor".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn issued_token_validates_and_carries_profile() {
        let auth = service().await;
        let account = account();
        let token = auth.generate_token(&account).unwrap();

        let claims = auth.validate_token(&token).await.unwrap();
        assert_eq!(claims.sub, account.id.to_string());
        assert_eq!(claims.role, "supervisor");

        let user = AuthUser::try_from(claims).unwrap();
        assert_eq!(user.user_id, account.id);
        assert_eq!(user.role, "supervisor");
        assert_eq!(user.display_name(), account.name);
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() {
        let auth = service().await;
        let token = auth.generate_token(&account()).unwrap();
        let claims = auth.validate_token(&token).await.unwrap();

        auth.revoke(&claims.jti, claims.exp).await;
        assert_matches!(
            auth.validate_token(&token).await,
            Err(AuthError::RevokedToken)
        );
    }

    #[tokio::test]
    async fn token_for_other_audience_is_rejected() {
        let auth = service().await;
        let mut other = auth.clone();
        other.config.jwt_audience = "someone-else".into();
        let token = other.generate_token(&account()).unwrap();

        assert_matches!(auth.validate_token(&token).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let auth = service().await;
        assert_matches!(
            auth.validate_token("not-a-jwt").await,
            Err(AuthError::InvalidToken)
        );
    }
}
