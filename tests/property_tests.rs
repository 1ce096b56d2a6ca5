//! Property-based tests for the material balance aggregation.
//!
//! These tests use proptest to check the reconciliation invariants across a
//! wide range of shop-floor inputs.

use chrono::Utc;
use proptest::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;
use wireplant_api::entities::{flattening_section, spiral_section};
use wireplant_api::reports::{
    parse_quantity, reconcile, summarize, summarize_consumption, summarize_production, ItemStatus,
};

fn item_code_strategy() -> impl Strategy<Value = String> {
    prop_oneof!["A", "B", "C", "D"].prop_map(|s| s.to_string())
}

fn quantity_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..100_000, 0u8..100).prop_map(|(whole, cents)| format!("{}.{:02}", whole, cents)),
        (0u32..1000).prop_map(|kg| format!("{}kg", kg)),
        Just(String::new()),
        Just("n/a".to_string()),
    ]
}

fn production(code: String, qty: String) -> flattening_section::Model {
    flattening_section::Model {
        id: Uuid::new_v4(),
        item_code: code.clone(),
        item_name: format!("Strip {}", code),
        production_quantity: Some(qty),
        unit: "kg".to_string(),
        created_at: Utc::now(),
    }
}

fn consumption(code: String, qty: String) -> spiral_section::Model {
    spiral_section::Model {
        id: Uuid::new_v4(),
        item_code: code.clone(),
        item_name: format!("Strip {}", code),
        weight: Some(qty),
        unit: "kg".to_string(),
        created_at: Utc::now(),
    }
}

fn floor_strategy() -> impl Strategy<
    Value = (
        Vec<flattening_section::Model>,
        Vec<spiral_section::Model>,
    ),
> {
    (
        prop::collection::vec((item_code_strategy(), quantity_strategy()), 0..20),
        prop::collection::vec((item_code_strategy(), quantity_strategy()), 0..20),
    )
        .prop_map(|(prod, cons)| {
            (
                prod.into_iter().map(|(c, q)| production(c, q)).collect(),
                cons.into_iter().map(|(c, q)| consumption(c, q)).collect(),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn balance_is_production_minus_consumption((prod, cons) in floor_strategy()) {
        let produced = summarize_production(&prod, None);
        let consumed = summarize_consumption(&cons, None);
        let result = reconcile(&produced, &consumed, &HashMap::new());

        for item in &result.items {
            let expected_prod: f64 = prod
                .iter()
                .filter(|r| r.item_code == item.item_code)
                .map(|r| parse_quantity(r.production_quantity.as_deref()))
                .sum();
            let expected_cons: f64 = cons
                .iter()
                .filter(|r| r.item_code == item.item_code)
                .map(|r| parse_quantity(r.weight.as_deref()))
                .sum();
            prop_assert!((item.total_production - expected_prod).abs() < 1e-6);
            prop_assert!((item.total_consumption - expected_cons).abs() < 1e-6);
            prop_assert!((item.balance - (item.total_production - item.total_consumption)).abs() < 1e-9);
        }
    }

    #[test]
    fn status_follows_sign_of_balance((prod, cons) in floor_strategy()) {
        let result = reconcile(
            &summarize_production(&prod, None),
            &summarize_consumption(&cons, None),
            &HashMap::new(),
        );
        for item in &result.items {
            let expected = if item.balance > 0.0 { ItemStatus::Available } else { ItemStatus::Deficit };
            prop_assert_eq!(item.status, expected);
        }
    }

    #[test]
    fn every_produced_item_is_reported_once((prod, cons) in floor_strategy()) {
        let produced = summarize_production(&prod, None);
        let consumed = summarize_consumption(&cons, None);
        let result = reconcile(&produced, &consumed, &HashMap::new());

        prop_assert_eq!(result.items.len(), produced.len());
        for code in &result.unmatched_consumption {
            prop_assert!(!produced.contains_key(code));
            prop_assert!(consumed.contains_key(code));
        }
    }

    #[test]
    fn summary_counts_partition_items((prod, cons) in floor_strategy()) {
        let result = reconcile(
            &summarize_production(&prod, None),
            &summarize_consumption(&cons, None),
            &HashMap::new(),
        );
        let summary = summarize(&result.items);
        prop_assert_eq!(summary.total_items, result.items.len());
        prop_assert_eq!(summary.available_items + summary.deficit_items, summary.total_items);
    }

    #[test]
    fn quantity_parsing_never_panics_or_goes_non_finite(raw in ".{0,24}") {
        let value = parse_quantity(Some(&raw));
        prop_assert!(value.is_finite());
    }
}

#[test]
fn empty_record_sets_sum_to_zero() {
    let produced = summarize_production(&[], None);
    assert!(produced.is_empty());
    let summary = summarize(&[]);
    assert_eq!(summary.total_production, 0.0);
}
