use crate::{
    db::DbPool,
    entities::{flattening_section, material_master, spiral_section},
    errors::ServiceError,
    metrics::PLANT_METRICS,
    reports::{self, BalanceSummary, ItemBalance, ItemStatus},
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BalanceQuery {
    /// Restrict the report to one item code
    pub item_code: Option<String>,
    /// Only records created at or after this instant
    pub from: Option<DateTime<Utc>>,
    /// Only records created at or before this instant
    pub to: Option<DateTime<Utc>>,
    /// `Available` or `Deficit`, any case
    pub status: Option<String>,
}

impl BalanceQuery {
    /// Item code filter, trimmed the same way codes are stored.
    pub fn item_code_filter(&self) -> Option<&str> {
        self.item_code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    fn status_filter(&self) -> Result<Option<ItemStatus>, ServiceError> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                ItemStatus::from_str(s).map_err(|_| {
                    ServiceError::BadRequest(format!(
                        "Unknown status '{}', expected Available or Deficit",
                        s
                    ))
                })
            })
            .transpose()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaterialBalanceReport {
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ItemBalance>,
    /// Totals over every reconciled item, before the status filter
    pub summary: BalanceSummary,
    /// Items consumed by spiral that flattening never produced
    pub unmatched_consumption_items: usize,
}

/// Item-wise production versus consumption
#[derive(Clone)]
pub struct MaterialBalanceService {
    db_pool: Arc<DbPool>,
}

impl MaterialBalanceService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn generate(
        &self,
        query: &BalanceQuery,
    ) -> Result<MaterialBalanceReport, ServiceError> {
        let status = query.status_filter()?;

        let (production_rows, consumption_rows, material_types) = futures::try_join!(
            self.load_production(query),
            self.load_consumption(query),
            self.load_material_types(),
        )?;

        let item_code = query.item_code_filter();
        let production = reports::summarize_production(&production_rows, item_code);
        let consumption = reports::summarize_consumption(&consumption_rows, item_code);
        let reconciliation = reports::reconcile(&production, &consumption, &material_types);

        let summary = reports::summarize(&reconciliation.items);
        let mut items = reconciliation.items;
        if let Some(status) = status {
            items.retain(|item| item.status == status);
        }

        PLANT_METRICS.balance_reports_generated.inc();
        PLANT_METRICS.deficit_items.set(summary.deficit_items as f64);
        info!(
            items = items.len(),
            deficit_items = summary.deficit_items,
            "Material balance report generated"
        );

        Ok(MaterialBalanceReport {
            generated_at: Utc::now(),
            items,
            summary,
            unmatched_consumption_items: reconciliation.unmatched_consumption.len(),
        })
    }

    /// CSV rendering of [`generate`](Self::generate).
    #[instrument(skip(self))]
    pub async fn export_csv(&self, query: &BalanceQuery) -> Result<Vec<u8>, ServiceError> {
        let report = self.generate(query).await?;
        reports::write_balance_csv(&report.items)
    }

    async fn load_production(
        &self,
        query: &BalanceQuery,
    ) -> Result<Vec<flattening_section::Model>, ServiceError> {
        let mut select = flattening_section::Entity::find();
        if let Some(code) = query.item_code_filter() {
            select = select.filter(flattening_section::Column::ItemCode.eq(code));
        }
        if let Some(from) = query.from {
            select = select.filter(flattening_section::Column::CreatedAt.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(flattening_section::Column::CreatedAt.lte(to));
        }
        select
            .order_by_asc(flattening_section::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to load flattening records: {}", e);
                ServiceError::db_error(e)
            })
    }

    async fn load_consumption(
        &self,
        query: &BalanceQuery,
    ) -> Result<Vec<spiral_section::Model>, ServiceError> {
        let mut select = spiral_section::Entity::find();
        if let Some(code) = query.item_code_filter() {
            select = select.filter(spiral_section::Column::ItemCode.eq(code));
        }
        if let Some(from) = query.from {
            select = select.filter(spiral_section::Column::CreatedAt.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(spiral_section::Column::CreatedAt.lte(to));
        }
        select
            .order_by_asc(spiral_section::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to load spiral records: {}", e);
                ServiceError::db_error(e)
            })
    }

    async fn load_material_types(&self) -> Result<HashMap<String, String>, ServiceError> {
        let rows = material_master::Entity::find()
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to load material master: {}", e);
                ServiceError::db_error(e)
            })?;
        Ok(rows
            .into_iter()
            .map(|row| (row.item_code, row.material_type))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn status_filter_is_case_insensitive() {
        let query = BalanceQuery {
            status: Some("deficit".into()),
            ..Default::default()
        };
        assert_eq!(query.status_filter().unwrap(), Some(ItemStatus::Deficit));
    }

    #[test]
    fn blank_status_means_no_filter() {
        let query = BalanceQuery {
            status: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(query.status_filter().unwrap(), None);
    }

    #[test]
    fn unknown_status_is_bad_request() {
        let query = BalanceQuery {
            status: Some("surplus".into()),
            ..Default::default()
        };
        assert_matches!(query.status_filter(), Err(ServiceError::BadRequest(_)));
    }
}
