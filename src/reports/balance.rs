use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

use super::quantity::{parse_quantity, serialize_round2};
use crate::entities::{flattening_section, spiral_section};

/// A section row that carries an item code and a free-text quantity.
pub trait SectionRecord {
    fn item_code(&self) -> &str;
    fn item_name(&self) -> &str;
    fn unit(&self) -> &str;
    fn raw_quantity(&self) -> Option<&str>;
}

impl SectionRecord for flattening_section::Model {
    fn item_code(&self) -> &str {
        &self.item_code
    }
    fn item_name(&self) -> &str {
        &self.item_name
    }
    fn unit(&self) -> &str {
        &self.unit
    }
    fn raw_quantity(&self) -> Option<&str> {
        self.production_quantity.as_deref()
    }
}

impl SectionRecord for spiral_section::Model {
    fn item_code(&self) -> &str {
        &self.item_code
    }
    fn item_name(&self) -> &str {
        &self.item_name
    }
    fn unit(&self) -> &str {
        &self.unit
    }
    fn raw_quantity(&self) -> Option<&str> {
        self.weight.as_deref()
    }
}

/// Per-item total from one section
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTotal {
    pub item_name: String,
    pub total: f64,
    pub unit: String,
}

fn summarize_section<R: SectionRecord>(
    records: &[R],
    item_code: Option<&str>,
) -> BTreeMap<String, ItemTotal> {
    let mut totals: BTreeMap<String, ItemTotal> = BTreeMap::new();
    for record in records {
        if item_code.is_some_and(|code| code != record.item_code()) {
            continue;
        }
        let quantity = parse_quantity(record.raw_quantity());
        totals
            .entry(record.item_code().to_string())
            .and_modify(|entry| entry.total += quantity)
            .or_insert_with(|| ItemTotal {
                item_name: record.item_name().to_string(),
                total: quantity,
                unit: record.unit().to_string(),
            });
    }
    totals
}

/// Groups flattening output by item code.
pub fn summarize_production(
    records: &[flattening_section::Model],
    item_code: Option<&str>,
) -> BTreeMap<String, ItemTotal> {
    summarize_section(records, item_code)
}

/// Groups spiral intake by item code.
pub fn summarize_consumption(
    records: &[spiral_section::Model],
    item_code: Option<&str>,
) -> BTreeMap<String, ItemTotal> {
    summarize_section(records, item_code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ItemStatus {
    Available,
    Deficit,
}

impl ItemStatus {
    pub fn from_balance(balance: f64) -> Self {
        if balance > 0.0 {
            ItemStatus::Available
        } else {
            ItemStatus::Deficit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "Available",
            ItemStatus::Deficit => "Deficit",
        }
    }
}

/// Reconciled row of the material balance report
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ItemBalance {
    pub item_code: String,
    pub item_name: String,
    pub material_type: String,
    #[serde(serialize_with = "serialize_round2")]
    pub total_production: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub total_consumption: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub balance: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub efficiency: f64,
    pub unit: String,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub items: Vec<ItemBalance>,
    /// Item codes consumed by spiral without any flattening output
    pub unmatched_consumption: Vec<String>,
}

/// Joins production and consumption totals into one row per produced item.
///
/// Items that only appear on the consumption side are left out of `items`
/// and reported in `unmatched_consumption`.
pub fn reconcile(
    production: &BTreeMap<String, ItemTotal>,
    consumption: &BTreeMap<String, ItemTotal>,
    material_types: &HashMap<String, String>,
) -> Reconciliation {
    let items = production
        .iter()
        .map(|(item_code, produced)| {
            let consumed = consumption.get(item_code).map_or(0.0, |c| c.total);
            let balance = produced.total - consumed;
            let efficiency = if produced.total > 0.0 {
                consumed / produced.total * 100.0
            } else {
                0.0
            };
            ItemBalance {
                item_code: item_code.clone(),
                item_name: produced.item_name.clone(),
                material_type: material_types.get(item_code).cloned().unwrap_or_default(),
                total_production: produced.total,
                total_consumption: consumed,
                balance,
                efficiency,
                unit: produced.unit.clone(),
                status: ItemStatus::from_balance(balance),
            }
        })
        .collect();

    let unmatched_consumption = consumption
        .keys()
        .filter(|code| !production.contains_key(*code))
        .cloned()
        .collect::<Vec<_>>();
    if !unmatched_consumption.is_empty() {
        tracing::debug!(
            items = ?unmatched_consumption,
            "consumption recorded for items with no production"
        );
    }

    Reconciliation {
        items,
        unmatched_consumption,
    }
}

/// Flattening-inventory totals across the reconciled rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BalanceSummary {
    pub total_items: usize,
    pub available_items: usize,
    pub deficit_items: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub total_production: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub total_consumption: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub net_balance: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub overall_efficiency: f64,
}

pub fn summarize(items: &[ItemBalance]) -> BalanceSummary {
    let mut summary = BalanceSummary {
        total_items: items.len(),
        ..Default::default()
    };
    for item in items {
        match item.status {
            ItemStatus::Available => summary.available_items += 1,
            ItemStatus::Deficit => summary.deficit_items += 1,
        }
        summary.total_production += item.total_production;
        summary.total_consumption += item.total_consumption;
    }
    summary.net_balance = summary.total_production - summary.total_consumption;
    if summary.total_production > 0.0 {
        summary.overall_efficiency = summary.total_consumption / summary.total_production * 100.0;
    }
    summary
}

/// Deficit rows, most negative balance first.
pub fn top_deficits(items: &[ItemBalance], limit: usize) -> Vec<ItemBalance> {
    let mut deficits: Vec<ItemBalance> = items
        .iter()
        .filter(|item| item.status == ItemStatus::Deficit)
        .cloned()
        .collect();
    deficits.sort_by(|a, b| a.balance.total_cmp(&b.balance));
    deficits.truncate(limit);
    deficits
}
