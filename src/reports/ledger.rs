use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::quantity::{serialize_round2, serialize_round2_map};
use crate::entities::inventory_ledger;

/// How a ledger transaction type moves stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerDirection {
    Inflow,
    Outflow,
    /// Signed quantity; positive adds stock
    Adjustment,
    Other,
}

impl LedgerDirection {
    pub fn classify(transaction_type: &str) -> Self {
        match transaction_type.trim().to_ascii_uppercase().as_str() {
            "IN" | "RECEIPT" | "PRODUCTION" => LedgerDirection::Inflow,
            "OUT" | "ISSUE" | "CONSUMPTION" => LedgerDirection::Outflow,
            "ADJUSTMENT" => LedgerDirection::Adjustment,
            _ => LedgerDirection::Other,
        }
    }

    /// Splits a quantity into (in, out) contributions.
    fn split(self, quantity: f64) -> (f64, f64) {
        match self {
            LedgerDirection::Inflow => (quantity.abs(), 0.0),
            LedgerDirection::Outflow => (0.0, quantity.abs()),
            LedgerDirection::Adjustment if quantity >= 0.0 => (quantity, 0.0),
            LedgerDirection::Adjustment => (0.0, -quantity),
            LedgerDirection::Other => (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct LedgerSummary {
    #[serde(serialize_with = "serialize_round2")]
    pub total_in_kg: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub total_out_kg: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub net_movement_kg: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub current_balance_kg: f64,
    pub entry_count: usize,
    /// Total kilograms per upper-cased transaction type
    #[serde(serialize_with = "serialize_round2_map")]
    pub by_type: BTreeMap<String, f64>,
}

/// Aggregates ledger entries. The current balance is taken from the newest
/// entry by `created_at`, whatever order `entries` arrives in.
pub fn summarize(entries: &[inventory_ledger::Model]) -> LedgerSummary {
    let mut summary = LedgerSummary {
        entry_count: entries.len(),
        ..Default::default()
    };

    for entry in entries {
        let (inflow, outflow) =
            LedgerDirection::classify(&entry.transaction_type).split(entry.quantity_kg);
        summary.total_in_kg += inflow;
        summary.total_out_kg += outflow;
        *summary
            .by_type
            .entry(entry.transaction_type.trim().to_ascii_uppercase())
            .or_insert(0.0) += entry.quantity_kg;
    }

    summary.net_movement_kg = summary.total_in_kg - summary.total_out_kg;
    summary.current_balance_kg = entries
        .iter()
        .max_by_key(|entry| entry.created_at)
        .map_or(0.0, |entry| entry.balance);
    summary
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyMovement {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_round2")]
    pub in_kg: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub out_kg: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub closing_balance_kg: f64,
}

/// Buckets entries per UTC calendar day, oldest day first.
pub fn daily_movements(entries: &[inventory_ledger::Model]) -> Vec<DailyMovement> {
    let mut sorted: Vec<&inventory_ledger::Model> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.created_at);

    let mut days: BTreeMap<NaiveDate, DailyMovement> = BTreeMap::new();
    for entry in sorted {
        let date = entry.created_at.date_naive();
        let (inflow, outflow) =
            LedgerDirection::classify(&entry.transaction_type).split(entry.quantity_kg);
        let day = days.entry(date).or_insert(DailyMovement {
            date,
            in_kg: 0.0,
            out_kg: 0.0,
            closing_balance_kg: entry.balance,
        });
        day.in_kg += inflow;
        day.out_kg += outflow;
        day.closing_balance_kg = entry.balance;
    }
    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn entry(kind: &str, qty: f64, balance: f64, created_at: DateTime<Utc>) -> inventory_ledger::Model {
        inventory_ledger::Model {
            id: Uuid::new_v4(),
            transaction_type: kind.into(),
            quantity_kg: qty,
            balance,
            reference: None,
            created_at,
        }
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(LedgerDirection::classify("in"), LedgerDirection::Inflow);
        assert_eq!(LedgerDirection::classify("Receipt"), LedgerDirection::Inflow);
        assert_eq!(LedgerDirection::classify("ISSUE"), LedgerDirection::Outflow);
        assert_eq!(LedgerDirection::classify(" adjustment "), LedgerDirection::Adjustment);
        assert_eq!(LedgerDirection::classify("transfer"), LedgerDirection::Other);
    }

    #[test]
    fn summary_totals_and_current_balance() {
        let entries = vec![
            entry("OUT", 30.0, 170.0, at(2, 9)),
            entry("IN", 200.0, 200.0, at(1, 8)),
            entry("adjustment", -5.0, 165.0, at(2, 12)),
            entry("TRANSFER", 12.0, 165.0, at(2, 10)),
        ];
        let summary = summarize(&entries);

        assert_eq!(summary.entry_count, 4);
        assert_eq!(summary.total_in_kg, 200.0);
        assert_eq!(summary.total_out_kg, 35.0);
        assert_eq!(summary.net_movement_kg, 165.0);
        assert_eq!(summary.current_balance_kg, 165.0);
        assert_eq!(summary.by_type["TRANSFER"], 12.0);
        assert_eq!(summary.by_type["ADJUSTMENT"], -5.0);
    }

    #[test]
    fn by_type_totals_serialize_rounded() {
        let entries = vec![
            entry("IN", 0.1, 0.1, at(1, 8)),
            entry("in", 0.2, 0.3, at(1, 9)),
        ];
        let summary = summarize(&entries);
        assert!((summary.by_type["IN"] - 0.3).abs() < 1e-9);

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["by_type"]["IN"], serde_json::json!(0.3));
        assert_eq!(value["total_in_kg"], serde_json::json!(0.3));
    }

    #[test]
    fn empty_ledger_has_zero_balance() {
        let summary = summarize(&[]);
        assert_eq!(summary.current_balance_kg, 0.0);
        assert_eq!(summary.entry_count, 0);
        assert!(daily_movements(&[]).is_empty());
    }

    #[test]
    fn daily_movements_are_ascending_with_closing_balance() {
        let entries = vec![
            entry("OUT", 20.0, 80.0, at(3, 15)),
            entry("IN", 100.0, 100.0, at(3, 7)),
            entry("IN", 10.0, 60.0, at(1, 7)),
        ];
        let days = daily_movements(&entries);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(days[0].closing_balance_kg, 60.0);
        assert_eq!(days[1].in_kg, 100.0);
        assert_eq!(days[1].out_kg, 20.0);
        assert_eq!(days[1].closing_balance_kg, 80.0);
    }
}
