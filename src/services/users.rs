use crate::{db::DbPool, entities::user, errors::ServiceError};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Row of the user directory
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserListItem {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            created_at: model.created_at,
        }
    }
}

/// Profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Every account, oldest first
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserListItem>, ServiceError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to list users: {}", e);
                ServiceError::db_error(e)
            })?;
        Ok(users.into_iter().map(UserListItem::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, id: Uuid) -> Result<UserProfile, ServiceError> {
        user::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to load user {}: {}", id, e);
                ServiceError::db_error(e)
            })?
            .map(UserProfile::from)
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Case-insensitive lookup used by login
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to look up user by email: {}", e);
                ServiceError::db_error(e)
            })
    }
}
