use super::{PropertyRecord, Table};
use crate::Result;

const RESIDENTIAL: &str = "سكني";
const LAND_PLOT: &str = "قطعة أرض";

/// (neighborhood, area in square meters, price in SAR)
const SALES: [(&str, f64, f64); 11] = [
    ("حي/ال غليط", 540.0, 500_000.0),
    ("حي/السودة", 900.0, 300_000.0),
    ("حي/السودة", 900.0, 450_000.0),
    ("حي/المحالة ابو نخله", 735.0, 530_000.0),
    ("حي/المحالة بمدينة سلطان", 750.0, 125_000.0),
    ("حي/الواقعة في قرية القرية", 4590.0, 3_000_000.0),
    ("حي/سد/السرحة حجاب مدينة سلطان", 530.97, 300_000.0),
    ("حي/سد/السرحة حجاب مدينة سلطان", 536.0, 300_000.0),
    ("حي/سد/السرحة حجاب مدينة سلطان", 300.0, 150_000.0),
    ("حي/سد/السرحة حجاب مدينة سلطان", 337.23, 150_000.0),
    ("حي/سد/السرحة حجاب مدينة سلطان", 335.0, 150_000.0),
];

/// The embedded sample of residential land sales in Abha.
pub fn sample_records() -> Vec<PropertyRecord> {
    SALES
        .iter()
        .map(|&(neighborhood, area, price)| PropertyRecord {
            neighborhood_name: neighborhood.to_string(),
            classification_name: Some(RESIDENTIAL.to_string()),
            property_type_name: Some(LAND_PLOT.to_string()),
            area,
            price_in_sar: price,
        })
        .collect()
}

/// The embedded sample as a `Table`.
pub fn sample_table() -> Result<Table> {
    Table::from_records(sample_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    #[test]
    fn sample_has_every_column() {
        let table = sample_table().unwrap();

        assert_eq!(table.len(), 11);
        for column in Column::ALL {
            assert!(table.has(column), "missing {column}");
        }
        assert_eq!(table.row(2).neighborhood_name, Some("حي/السودة"));
        assert_eq!(table.row(2).price_in_sar, Some(450_000.0));
    }
}
