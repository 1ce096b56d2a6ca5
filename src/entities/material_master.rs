use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "material_master")]
#[schema(as = MaterialMaster)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub item_code: String,
    pub item_name: String,
    pub material_type: String,
    pub unit: String,
    pub reorder_level_kg: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_alert::Entity")]
    InventoryAlerts,
}

impl Related<super::inventory_alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryAlerts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
