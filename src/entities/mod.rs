pub mod flattening_section;
pub mod inventory_alert;
pub mod inventory_ledger;
pub mod material_master;
pub mod spiral_section;
pub mod user;
