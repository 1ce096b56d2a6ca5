//! Stateless aggregation over production, consumption and ledger rows.

pub mod balance;
pub mod export;
pub mod ledger;
pub mod quantity;

pub use balance::{
    reconcile, summarize, summarize_consumption, summarize_production, top_deficits,
    BalanceSummary, ItemBalance, ItemStatus, ItemTotal, Reconciliation, SectionRecord,
};
pub use export::{write_balance_csv, BALANCE_CSV_HEADER};
pub use ledger::{daily_movements, DailyMovement, LedgerDirection, LedgerSummary};
pub use quantity::{parse_quantity, round2};
