use crate::{
    db::DbPool,
    entities::inventory_ledger,
    errors::ServiceError,
    reports::{self, DailyMovement, LedgerSummary},
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, instrument};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LEDGER_LIMIT: u64 = 50;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LedgerQuery {
    pub limit: Option<u64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LedgerOverview {
    pub summary: LedgerSummary,
    pub daily: Vec<DailyMovement>,
}

/// Read side of the inventory ledger
#[derive(Clone)]
pub struct InventoryLedgerService {
    db_pool: Arc<DbPool>,
    max_limit: u64,
}

impl InventoryLedgerService {
    pub fn new(db_pool: Arc<DbPool>, max_limit: u64) -> Self {
        Self {
            db_pool,
            max_limit: max_limit.max(1),
        }
    }

    /// Newest entries first, capped at the configured page limit.
    #[instrument(skip(self))]
    pub async fn list_entries(
        &self,
        query: &LedgerQuery,
    ) -> Result<Vec<inventory_ledger::Model>, ServiceError> {
        let limit = effective_limit(query.limit, self.max_limit);
        self.select(query)
            .order_by_desc(inventory_ledger::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to list ledger entries: {}", e);
                ServiceError::db_error(e)
            })
    }

    /// Totals and per-day movements over every entry in the window.
    #[instrument(skip(self))]
    pub async fn overview(&self, query: &LedgerQuery) -> Result<LedgerOverview, ServiceError> {
        let entries = self
            .select(query)
            .order_by_asc(inventory_ledger::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to load ledger entries: {}", e);
                ServiceError::db_error(e)
            })?;

        Ok(LedgerOverview {
            summary: reports::ledger::summarize(&entries),
            daily: reports::daily_movements(&entries),
        })
    }

    fn select(&self, query: &LedgerQuery) -> sea_orm::Select<inventory_ledger::Entity> {
        let mut select = inventory_ledger::Entity::find();
        if let Some(from) = query.from {
            select = select.filter(inventory_ledger::Column::CreatedAt.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(inventory_ledger::Column::CreatedAt.lte(to));
        }
        select
    }
}

fn effective_limit(requested: Option<u64>, max_limit: u64) -> u64 {
    requested.unwrap_or(DEFAULT_LEDGER_LIMIT).clamp(1, max_limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(effective_limit(None, 500), 50);
        assert_eq!(effective_limit(Some(0), 500), 1);
        assert_eq!(effective_limit(Some(10_000), 500), 500);
        assert_eq!(effective_limit(None, 20), 20);
    }
}
