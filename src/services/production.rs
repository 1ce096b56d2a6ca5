use crate::{
    db::DbPool,
    entities::{flattening_section, spiral_section},
    errors::ServiceError,
    metrics::PLANT_METRICS,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
    Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

const DEFAULT_UNIT: &str = "kg";

/// Floor entry for either section. `quantity` is kept as typed.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "item_code": "GI-2.5",
    "item_name": "GI strip 2.5mm",
    "quantity": "125.5",
    "unit": "kg"
}))]
pub struct NewSectionRecord {
    #[validate(length(min = 1, max = 64))]
    pub item_code: String,
    #[validate(length(min = 1, max = 255))]
    pub item_name: String,
    #[validate(length(min = 1, max = 64))]
    pub quantity: String,
    #[validate(length(min = 1, max = 16))]
    pub unit: Option<String>,
}

/// Filters shared by both section listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SectionFilter {
    pub item_code: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl SectionFilter {
    pub fn item_code_filter(&self) -> Option<&str> {
        self.item_code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionPage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Records and lists flattening output and spiral intake
#[derive(Clone)]
pub struct ProductionService {
    db_pool: Arc<DbPool>,
}

impl ProductionService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input), fields(item_code = %input.item_code))]
    pub async fn record_flattening(
        &self,
        input: NewSectionRecord,
    ) -> Result<flattening_section::Model, ServiceError> {
        input.validate()?;
        let unit = normalized_unit(input.unit.as_deref());
        let model = flattening_section::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_code: Set(input.item_code.trim().to_string()),
            item_name: Set(input.item_name.trim().to_string()),
            production_quantity: Set(Some(input.quantity.trim().to_string())),
            unit: Set(unit),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!("Failed to record flattening output: {}", e);
            ServiceError::db_error(e)
        })?;

        PLANT_METRICS.production_records_created.inc();
        info!(record_id = %model.id, "Flattening output recorded");
        Ok(model)
    }

    #[instrument(skip(self, input), fields(item_code = %input.item_code))]
    pub async fn record_spiral(
        &self,
        input: NewSectionRecord,
    ) -> Result<spiral_section::Model, ServiceError> {
        input.validate()?;
        let unit = normalized_unit(input.unit.as_deref());
        let model = spiral_section::ActiveModel {
            id: Set(Uuid::new_v4()),
            item_code: Set(input.item_code.trim().to_string()),
            item_name: Set(input.item_name.trim().to_string()),
            weight: Set(Some(input.quantity.trim().to_string())),
            unit: Set(unit),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!("Failed to record spiral intake: {}", e);
            ServiceError::db_error(e)
        })?;

        PLANT_METRICS.production_records_created.inc();
        info!(record_id = %model.id, "Spiral intake recorded");
        Ok(model)
    }

    /// Newest-first page of flattening records.
    #[instrument(skip(self))]
    pub async fn list_flattening(
        &self,
        filter: &SectionFilter,
        page: u64,
        per_page: u64,
    ) -> Result<SectionPage<flattening_section::Model>, ServiceError> {
        let mut query = flattening_section::Entity::find();
        if let Some(code) = filter.item_code_filter() {
            query = query.filter(flattening_section::Column::ItemCode.eq(code));
        }
        if let Some(from) = filter.from {
            query = query.filter(flattening_section::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(flattening_section::Column::CreatedAt.lte(to));
        }
        let query = query.order_by_desc(flattening_section::Column::CreatedAt);
        self.fetch_page(query, page, per_page).await
    }

    /// Newest-first page of spiral records.
    #[instrument(skip(self))]
    pub async fn list_spiral(
        &self,
        filter: &SectionFilter,
        page: u64,
        per_page: u64,
    ) -> Result<SectionPage<spiral_section::Model>, ServiceError> {
        let mut query = spiral_section::Entity::find();
        if let Some(code) = filter.item_code_filter() {
            query = query.filter(spiral_section::Column::ItemCode.eq(code));
        }
        if let Some(from) = filter.from {
            query = query.filter(spiral_section::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(spiral_section::Column::CreatedAt.lte(to));
        }
        let query = query.order_by_desc(spiral_section::Column::CreatedAt);
        self.fetch_page(query, page, per_page).await
    }

    async fn fetch_page<E>(
        &self,
        query: Select<E>,
        page: u64,
        per_page: u64,
    ) -> Result<SectionPage<E::Model>, ServiceError>
    where
        E: sea_orm::EntityTrait,
        E::Model: Send + Sync + 'static,
    {
        let per_page = per_page.clamp(1, 200);
        let page = page.max(1);
        let paginator = query.paginate(&*self.db_pool, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(SectionPage {
            items,
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page),
        })
    }
}

fn normalized_unit(unit: Option<&str>) -> String {
    unit.map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_UNIT)
        .to_string()
}
