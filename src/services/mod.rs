// Production floor records
pub mod production;

// Reporting
pub mod dashboard;
pub mod inventory_ledger;
pub mod material_balance;

pub mod alerts;
pub mod users;
