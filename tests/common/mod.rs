#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;
use wireplant_api::{
    auth::hash_password,
    config::AppConfig,
    db::{self, DbConfig},
    entities::{
        inventory_alert::{self, AlertLevel},
        flattening_section, inventory_ledger, material_master, spiral_section, user,
    },
    AppState,
};

pub const ADMIN_EMAIL: &str = "admin@wireplant.test";
pub const ADMIN_PASSWORD: &str = "coil-and-strip-2024";

/// Application backed by a private in-memory SQLite database with one seeded
/// admin account.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub admin: user::Model,
    token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Build with a tweaked configuration, e.g. a shorter dashboard refresh.
    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_wireplant_integration_tests".to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        tweak(&mut cfg);

        // A single connection keeps every query on the same in-memory database.
        let pool = db::establish_connection_with_config(&DbConfig::from(&cfg))
            .await
            .expect("failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);

        let now = Utc::now();
        let admin = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Plant Admin".to_string()),
            email: Set(ADMIN_EMAIL.to_string()),
            password_hash: Set(hash_password(ADMIN_PASSWORD).expect("hash admin password")),
            role: Set("admin".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*state.db)
        .await
        .expect("seed admin user");

        let token = state
            .auth
            .generate_token(&admin)
            .expect("issue admin token");

        let router = wireplant_api::app_router(state.clone());

        Self {
            router,
            state,
            admin,
            token,
        }
    }

    /// Bearer token for the seeded admin.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper for authenticated JSON requests.
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        self.request(method, uri, body, Some(self.token())).await
    }

    pub async fn seed_user(&self, name: &str, email: &str, role: &str) -> user::Model {
        let now = Utc::now();
        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(hash_password("irrelevant-password").expect("hash password")),
            role: Set(role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed user")
    }

    pub async fn seed_material(&self, item_code: &str, material_type: &str) -> material_master::Model {
        material_master::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_code: Set(item_code.to_string()),
            item_name: Set(format!("Material {}", item_code)),
            material_type: Set(material_type.to_string()),
            unit: Set("kg".to_string()),
            reorder_level_kg: Set(Some(100.0)),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed material master")
    }

    /// Flattening output backdated to `created_at`.
    pub async fn seed_flattening(
        &self,
        item_code: &str,
        quantity: &str,
        created_at: DateTime<Utc>,
    ) -> flattening_section::Model {
        flattening_section::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_code: Set(item_code.to_string()),
            item_name: Set(format!("Strip {}", item_code)),
            production_quantity: Set(Some(quantity.to_string())),
            unit: Set("kg".to_string()),
            created_at: Set(created_at),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed flattening record")
    }

    /// Spiral intake backdated to `created_at`.
    pub async fn seed_spiral(
        &self,
        item_code: &str,
        weight: &str,
        created_at: DateTime<Utc>,
    ) -> spiral_section::Model {
        spiral_section::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_code: Set(item_code.to_string()),
            item_name: Set(format!("Strip {}", item_code)),
            weight: Set(Some(weight.to_string())),
            unit: Set("kg".to_string()),
            created_at: Set(created_at),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed spiral record")
    }

    pub async fn seed_alert(
        &self,
        level: AlertLevel,
        material: Option<Uuid>,
        created_at: DateTime<Utc>,
    ) -> inventory_alert::Model {
        inventory_alert::ActiveModel {
            id: Set(Uuid::new_v4()),
            alert_level: Set(level),
            alert_type: Set("LOW_STOCK".to_string()),
            alert_message: Set(format!("{} stock alert", level.as_str())),
            material_master_ref: Set(material),
            resolved: Set(false),
            resolved_by: Set(None),
            resolved_at: Set(None),
            created_at: Set(created_at),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed alert")
    }

    pub async fn seed_ledger(
        &self,
        transaction_type: &str,
        quantity_kg: f64,
        balance: f64,
        created_at: DateTime<Utc>,
    ) -> inventory_ledger::Model {
        inventory_ledger::ActiveModel {
            id: Set(Uuid::new_v4()),
            transaction_type: Set(transaction_type.to_string()),
            quantity_kg: Set(quantity_kg),
            balance: Set(balance),
            reference: Set(None),
            created_at: Set(created_at),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed ledger entry")
    }
}

pub async fn response_bytes(response: Response) -> Vec<u8> {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes")
        .to_vec()
}

pub async fn response_json(response: Response) -> Value {
    let bytes = response_bytes(response).await;
    serde_json::from_slice(&bytes).expect("json response")
}
