use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stock movement posted by the plant's inventory jobs. Read-only here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "inventory_ledger")]
#[schema(as = LedgerEntry)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Free-form movement type (IN, OUT, ADJUSTMENT, ...)
    pub transaction_type: String,

    /// Quantity moved in kilograms; signed for adjustments
    pub quantity_kg: f64,

    /// Running stock balance after this movement
    pub balance: f64,

    pub reference: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
