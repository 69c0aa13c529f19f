use serde::Serialize;

use super::Column;
use crate::{PredictorError, Result};

/// A single property sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub neighborhood_name: String,
    pub classification_name: Option<String>,
    pub property_type_name: Option<String>,
    pub area: f64,
    #[serde(rename = "price_in_SAR")]
    pub price_in_sar: f64,
}

/// A borrowed row of a `Table`. Fields are `None` when the table lacks that column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Row<'a> {
    pub neighborhood_name: Option<&'a str>,
    pub classification_name: Option<&'a str>,
    pub property_type_name: Option<&'a str>,
    pub area: Option<f64>,
    #[serde(rename = "price_in_SAR")]
    pub price_in_sar: Option<f64>,
}

/// A columnar table of property sales.
///
/// Every column is optional so a table lacking one can be represented and rejected by whichever
/// layer needs it. Present columns always have `len()` values, areas are positive and prices
/// non negative.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    len: usize,
    neighborhoods: Option<Vec<String>>,
    classifications: Option<Vec<String>>,
    property_types: Option<Vec<String>>,
    areas: Option<Vec<f64>>,
    prices: Option<Vec<f64>>,
}

impl Table {
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    /// Builds a table holding every column from complete records.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = PropertyRecord>,
    {
        let records: Vec<PropertyRecord> = records.into_iter().collect();
        let classifications = records
            .iter()
            .any(|r| r.classification_name.is_some())
            .then(|| {
                records
                    .iter()
                    .map(|r| r.classification_name.clone().unwrap_or_default())
                    .collect()
            });
        let property_types = records
            .iter()
            .any(|r| r.property_type_name.is_some())
            .then(|| {
                records
                    .iter()
                    .map(|r| r.property_type_name.clone().unwrap_or_default())
                    .collect()
            });

        let builder = TableBuilder {
            neighborhoods: None,
            classifications,
            property_types,
            areas: Some(records.iter().map(|r| r.area).collect()),
            prices: Some(records.iter().map(|r| r.price_in_sar).collect()),
        };

        builder
            .neighborhoods(records.into_iter().map(|r| r.neighborhood_name).collect())
            .build()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn has(&self, column: Column) -> bool {
        match column {
            Column::Neighborhood => self.neighborhoods.is_some(),
            Column::Area => self.areas.is_some(),
            Column::Price => self.prices.is_some(),
            Column::Classification => self.classifications.is_some(),
            Column::PropertyType => self.property_types.is_some(),
        }
    }

    pub fn neighborhoods(&self) -> Option<&[String]> {
        self.neighborhoods.as_deref()
    }

    pub fn areas(&self) -> Option<&[f64]> {
        self.areas.as_deref()
    }

    pub fn prices(&self) -> Option<&[f64]> {
        self.prices.as_deref()
    }

    /// Returns the row at `idx`.
    ///
    /// # Panics
    /// If `idx >= len()`.
    pub fn row(&self, idx: usize) -> Row<'_> {
        assert!(idx < self.len, "row {idx} out of bounds ({} rows)", self.len);

        Row {
            neighborhood_name: self.neighborhoods.as_ref().map(|c| c[idx].as_str()),
            classification_name: self.classifications.as_ref().map(|c| c[idx].as_str()),
            property_type_name: self.property_types.as_ref().map(|c| c[idx].as_str()),
            area: self.areas.as_ref().map(|c| c[idx]),
            price_in_sar: self.prices.as_ref().map(|c| c[idx]),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.len).map(|idx| self.row(idx))
    }
}

/// Assembles a `Table` column by column.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    neighborhoods: Option<Vec<String>>,
    classifications: Option<Vec<String>>,
    property_types: Option<Vec<String>>,
    areas: Option<Vec<f64>>,
    prices: Option<Vec<f64>>,
}

impl TableBuilder {
    pub fn neighborhoods(mut self, values: Vec<String>) -> Self {
        self.neighborhoods = Some(values);
        self
    }

    pub fn classifications(mut self, values: Vec<String>) -> Self {
        self.classifications = Some(values);
        self
    }

    pub fn property_types(mut self, values: Vec<String>) -> Self {
        self.property_types = Some(values);
        self
    }

    pub fn areas(mut self, values: Vec<f64>) -> Self {
        self.areas = Some(values);
        self
    }

    pub fn prices(mut self, values: Vec<f64>) -> Self {
        self.prices = Some(values);
        self
    }

    /// Validates and builds the table. Rows in errors are 1-based.
    ///
    /// # Returns
    /// An error if the columns have different lengths, an area isn't positive or a price is
    /// negative.
    pub fn build(self) -> Result<Table> {
        let lengths = [
            (Column::Neighborhood, self.neighborhoods.as_ref().map(Vec::len)),
            (Column::Area, self.areas.as_ref().map(Vec::len)),
            (Column::Price, self.prices.as_ref().map(Vec::len)),
            (Column::Classification, self.classifications.as_ref().map(Vec::len)),
            (Column::PropertyType, self.property_types.as_ref().map(Vec::len)),
        ];

        let mut present = lengths
            .into_iter()
            .filter_map(|(column, len)| len.map(|len| (column, len)));
        let len = present.next().map(|(_, len)| len).unwrap_or_default();
        if let Some((column, got)) = present.find(|&(_, got)| got != len) {
            return Err(PredictorError::RaggedColumns {
                column,
                got,
                expected: len,
            });
        }

        if let Some(areas) = &self.areas {
            check_values(areas, Column::Area, |area| area.is_finite() && area > 0.0)?;
        }

        if let Some(prices) = &self.prices {
            check_values(prices, Column::Price, |price| price.is_finite() && price >= 0.0)?;
        }

        Ok(Table {
            len,
            neighborhoods: self.neighborhoods,
            classifications: self.classifications,
            property_types: self.property_types,
            areas: self.areas,
            prices: self.prices,
        })
    }
}

fn check_values<F>(values: &[f64], column: Column, valid: F) -> Result<()>
where
    F: Fn(f64) -> bool,
{
    match values.iter().position(|&v| !valid(v)) {
        Some(idx) => Err(PredictorError::InvalidValue {
            row: idx + 1,
            column,
            value: values[idx],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, area: f64, price: f64) -> PropertyRecord {
        PropertyRecord {
            neighborhood_name: name.to_string(),
            classification_name: None,
            property_type_name: None,
            area,
            price_in_sar: price,
        }
    }

    #[test]
    fn from_records_keeps_required_columns_only_when_optional_ones_are_empty() {
        let table = Table::from_records([record("a", 100.0, 1.0), record("b", 200.0, 2.0)]).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has(Column::Neighborhood));
        assert!(table.has(Column::Area));
        assert!(table.has(Column::Price));
        assert!(!table.has(Column::Classification));
        assert_eq!(table.row(1).neighborhood_name, Some("b"));
        assert_eq!(table.row(1).classification_name, None);
    }

    #[test]
    fn zero_area_is_rejected() {
        let err = Table::from_records([record("a", 100.0, 1.0), record("b", 0.0, 2.0)]).unwrap_err();
        assert!(matches!(
            err,
            PredictorError::InvalidValue {
                row: 2,
                column: Column::Area,
                ..
            }
        ));
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Table::from_records([record("a", 100.0, -1.0)]).unwrap_err();
        assert!(matches!(
            err,
            PredictorError::InvalidValue {
                row: 1,
                column: Column::Price,
                ..
            }
        ));
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Table::builder()
            .neighborhoods(vec!["a".into(), "b".into()])
            .areas(vec![1.0])
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            PredictorError::RaggedColumns {
                column: Column::Area,
                got: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn builder_allows_missing_columns() {
        let table = Table::builder()
            .neighborhoods(vec!["a".into(), "b".into()])
            .areas(vec![100.0, 250.0])
            .build()
            .unwrap();

        assert!(!table.has(Column::Price));
        assert_eq!(table.row(0).price_in_sar, None);
        assert_eq!(table.rows().count(), 2);
    }
}
