pub mod alerts;
pub mod common;
pub mod dashboard;
pub mod ledger;
pub mod production;
pub mod reports;
pub mod users;

use crate::{config::AppConfig, db::DbPool, services};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub production: Arc<services::production::ProductionService>,
    pub material_balance: Arc<services::material_balance::MaterialBalanceService>,
    pub ledger: Arc<services::inventory_ledger::InventoryLedgerService>,
    pub alerts: Arc<services::alerts::AlertService>,
    pub users: Arc<services::users::UserService>,
    pub dashboard: Arc<services::dashboard::DashboardService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        let production = Arc::new(services::production::ProductionService::new(
            db_pool.clone(),
        ));
        let material_balance = Arc::new(
            services::material_balance::MaterialBalanceService::new(db_pool.clone()),
        );
        let ledger = Arc::new(services::inventory_ledger::InventoryLedgerService::new(
            db_pool.clone(),
            config.ledger_page_limit,
        ));
        let alerts = Arc::new(services::alerts::AlertService::new(db_pool.clone()));
        let users = Arc::new(services::users::UserService::new(db_pool));
        let dashboard = Arc::new(services::dashboard::DashboardService::new(
            material_balance.clone(),
            ledger.clone(),
            alerts.clone(),
        ));

        Self {
            production,
            material_balance,
            ledger,
            alerts,
            users,
            dashboard,
        }
    }
}
