use super::balance::ItemBalance;
use super::quantity::round2;
use crate::errors::ServiceError;

pub const BALANCE_CSV_HEADER: [&str; 8] = [
    "Item Code",
    "Item Name",
    "Material Type",
    "Production(Kg)",
    "Consumption(Kg)",
    "Balance(Kg)",
    "Efficiency%",
    "Status",
];

fn fixed2(value: f64) -> String {
    format!("{:.2}", round2(value))
}

/// Renders the material balance rows as CSV with a fixed header row.
pub fn write_balance_csv(items: &[ItemBalance]) -> Result<Vec<u8>, ServiceError> {
    let mut writer = ::csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(BALANCE_CSV_HEADER)?;

    for item in items {
        let production = fixed2(item.total_production);
        let consumption = fixed2(item.total_consumption);
        let balance = fixed2(item.balance);
        let efficiency = fixed2(item.efficiency);
        writer.write_record([
            item.item_code.as_str(),
            item.item_name.as_str(),
            item.material_type.as_str(),
            production.as_str(),
            consumption.as_str(),
            balance.as_str(),
            efficiency.as_str(),
            item.status.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ServiceError::SerializationError(e.to_string()))
}
