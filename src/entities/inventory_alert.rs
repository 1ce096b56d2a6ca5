use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Alert severity
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum AlertLevel {
    #[sea_orm(string_value = "CRITICAL")]
    Critical,
    #[sea_orm(string_value = "WARNING")]
    Warning,
    #[sea_orm(string_value = "INFO")]
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "inventory_alerts")]
#[schema(as = InventoryAlert)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub alert_level: AlertLevel,
    pub alert_type: String,
    #[sea_orm(column_type = "Text")]
    pub alert_message: String,
    pub material_master_ref: Option<Uuid>,
    pub resolved: bool,
    pub resolved_by: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material_master::Entity",
        from = "Column::MaterialMasterRef",
        to = "super::material_master::Column::Id",
        on_delete = "SetNull"
    )]
    MaterialMaster,
}

impl Related<super::material_master::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialMaster.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Critical => "CRITICAL",
            AlertLevel::Warning => "WARNING",
            AlertLevel::Info => "INFO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn alert_level_parses_any_case() {
        assert_eq!(AlertLevel::from_str("critical").unwrap(), AlertLevel::Critical);
        assert_eq!(AlertLevel::from_str("Warning").unwrap(), AlertLevel::Warning);
        assert!(AlertLevel::from_str("urgent").is_err());
    }

    #[test]
    fn alert_level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&AlertLevel::Info).unwrap(), "\"INFO\"");
        assert_eq!(AlertLevel::Critical.as_str(), "CRITICAL");
    }
}
