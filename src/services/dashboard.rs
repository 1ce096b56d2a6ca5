use crate::{
    errors::ServiceError,
    reports::{self, BalanceSummary, ItemBalance, LedgerSummary},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use super::{
    alerts::{AlertCounts, AlertService},
    inventory_ledger::{InventoryLedgerService, LedgerQuery},
    material_balance::{BalanceQuery, MaterialBalanceService},
};

pub const TOP_DEFICIT_LIMIT: usize = 5;

/// Everything the dashboard cards render in one payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub balance: BalanceSummary,
    pub ledger: LedgerSummary,
    pub alerts: AlertCounts,
    pub top_deficits: Vec<ItemBalance>,
}

#[derive(Clone)]
pub struct DashboardService {
    material_balance: Arc<MaterialBalanceService>,
    ledger: Arc<InventoryLedgerService>,
    alerts: Arc<AlertService>,
}

impl DashboardService {
    pub fn new(
        material_balance: Arc<MaterialBalanceService>,
        ledger: Arc<InventoryLedgerService>,
        alerts: Arc<AlertService>,
    ) -> Self {
        Self {
            material_balance,
            ledger,
            alerts,
        }
    }

    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, ServiceError> {
        let balance_query = BalanceQuery::default();
        let ledger_query = LedgerQuery::default();
        let (report, ledger, alerts) = futures::try_join!(
            self.material_balance.generate(&balance_query),
            self.ledger.overview(&ledger_query),
            self.alerts.counts(),
        )?;

        Ok(DashboardSnapshot {
            generated_at: report.generated_at,
            top_deficits: reports::top_deficits(&report.items, TOP_DEFICIT_LIMIT),
            balance: report.summary,
            ledger: ledger.summary,
            alerts,
        })
    }
}
