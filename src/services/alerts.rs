use crate::{
    db::DbPool,
    entities::{
        inventory_alert::{self, AlertLevel},
        material_master,
    },
    errors::ServiceError,
    metrics::PLANT_METRICS,
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Unresolved alert with its material master row, when linked
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: inventory_alert::Model,
    pub material: Option<material_master::Model>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AlertCounts {
    pub critical: u64,
    pub warning: u64,
    pub info: u64,
    pub total: u64,
}

#[derive(Debug, FromQueryResult)]
struct LevelCount {
    alert_level: AlertLevel,
    count: i64,
}

#[derive(Clone)]
pub struct AlertService {
    db_pool: Arc<DbPool>,
}

impl AlertService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Unresolved alerts, newest first, optionally for one level.
    #[instrument(skip(self))]
    pub async fn list_unresolved(
        &self,
        level: Option<AlertLevel>,
    ) -> Result<Vec<AlertView>, ServiceError> {
        let mut query =
            inventory_alert::Entity::find().filter(inventory_alert::Column::Resolved.eq(false));
        if let Some(level) = level {
            query = query.filter(inventory_alert::Column::AlertLevel.eq(level));
        }

        let rows = query
            .order_by_desc(inventory_alert::Column::CreatedAt)
            .find_also_related(material_master::Entity)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to list inventory alerts: {}", e);
                ServiceError::db_error(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(alert, material)| AlertView { alert, material })
            .collect())
    }

    /// Marks one alert resolved. Resolving twice is allowed; the later
    /// resolver and timestamp win.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        id: Uuid,
        resolved_by: &str,
    ) -> Result<inventory_alert::Model, ServiceError> {
        let db = &*self.db_pool;
        let alert = inventory_alert::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Alert {} not found", id)))?;

        if alert.resolved {
            warn!(alert_id = %id, "Alert already resolved; updating resolver");
        }

        let mut active: inventory_alert::ActiveModel = alert.into();
        active.resolved = Set(true);
        active.resolved_by = Set(Some(resolved_by.to_string()));
        active.resolved_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!("Failed to resolve alert {}: {}", id, e);
            ServiceError::db_error(e)
        })?;

        PLANT_METRICS.alerts_resolved.inc();
        info!(alert_id = %id, resolved_by, "Alert resolved");
        Ok(updated)
    }

    /// Resolves every open alert in a single statement and returns how many
    /// rows changed.
    #[instrument(skip(self))]
    pub async fn resolve_all(&self, resolved_by: &str) -> Result<u64, ServiceError> {
        let result = inventory_alert::Entity::update_many()
            .col_expr(inventory_alert::Column::Resolved, Expr::value(true))
            .col_expr(
                inventory_alert::Column::ResolvedBy,
                Expr::value(resolved_by.to_string()),
            )
            .col_expr(inventory_alert::Column::ResolvedAt, Expr::value(Utc::now()))
            .filter(inventory_alert::Column::Resolved.eq(false))
            .exec(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to bulk-resolve alerts: {}", e);
                ServiceError::db_error(e)
            })?;

        PLANT_METRICS
            .alerts_resolved
            .inc_by(result.rows_affected);
        PLANT_METRICS.unresolved_alerts.set(0.0);
        info!(resolved = result.rows_affected, resolved_by, "All alerts resolved");
        Ok(result.rows_affected)
    }

    /// Open alerts per level
    #[instrument(skip(self))]
    pub async fn counts(&self) -> Result<AlertCounts, ServiceError> {
        let rows = inventory_alert::Entity::find()
            .select_only()
            .column(inventory_alert::Column::AlertLevel)
            .column_as(Expr::col(inventory_alert::Column::Id).count(), "count")
            .filter(inventory_alert::Column::Resolved.eq(false))
            .group_by(inventory_alert::Column::AlertLevel)
            .into_model::<LevelCount>()
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to count alerts: {}", e);
                ServiceError::db_error(e)
            })?;

        let counts = tally(rows.into_iter().map(|r| (r.alert_level, r.count)));
        PLANT_METRICS.unresolved_alerts.set(counts.total as f64);
        Ok(counts)
    }
}

fn tally(rows: impl IntoIterator<Item = (AlertLevel, i64)>) -> AlertCounts {
    let mut counts = AlertCounts::default();
    for (level, count) in rows {
        let count = u64::try_from(count).unwrap_or(0);
        match level {
            AlertLevel::Critical => counts.critical += count,
            AlertLevel::Warning => counts.warning += count,
            AlertLevel::Info => counts.info += count,
        }
        counts.total += count;
    }
    counts
}
