use machine_learning::dataset::Dataset;
use ndarray::Array1;
use serde::Serialize;

use crate::{
    PredictorError, Result,
    data::{Column, EncodedTable},
};

/// A model input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    NeighborhoodCode,
    Area,
}

/// The features the price model is trained on, in column order.
///
/// Resolved once from an `EncodedTable`: the area is required, the neighborhood code is used
/// whenever the table has neighborhoods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    features: Vec<Feature>,
}

impl FeatureSet {
    /// Resolves the features available in `encoded`.
    ///
    /// # Returns
    /// A `MissingColumn` error if the table has no areas.
    pub fn resolve(encoded: &EncodedTable) -> Result<Self> {
        if !encoded.table().has(Column::Area) {
            return Err(missing(Column::Area));
        }

        let mut features = Vec::with_capacity(2);
        if encoded.neighborhood_codes().is_some() {
            features.push(Feature::NeighborhoodCode);
        }
        features.push(Feature::Area);

        Ok(Self { features })
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn uses_neighborhood(&self) -> bool {
        self.features.contains(&Feature::NeighborhoodCode)
    }

    /// Builds a single input row.
    ///
    /// # Arguments
    /// * `code` - The neighborhood code, ignored when the set doesn't use neighborhoods.
    /// * `area` - The property area.
    pub fn row(&self, code: usize, area: f64) -> Array1<f64> {
        self.features
            .iter()
            .map(|feature| match feature {
                Feature::NeighborhoodCode => code as f64,
                Feature::Area => area,
            })
            .collect()
    }

    /// Builds the training dataset: these features as inputs and the price as target.
    ///
    /// # Returns
    /// A `MissingColumn` error if the table has no prices (or lost a resolved feature).
    pub fn dataset(&self, encoded: &EncodedTable) -> Result<Dataset> {
        let table = encoded.table();
        let prices = table.prices().ok_or_else(|| missing(Column::Price))?;
        let areas = table.areas().ok_or_else(|| missing(Column::Area))?;
        let codes = if self.uses_neighborhood() {
            let codes = encoded.neighborhood_codes();
            Some(codes.ok_or_else(|| missing(Column::Neighborhood))?)
        } else {
            None
        };

        let mut rows = Vec::with_capacity(table.len() * self.features.len());
        for (i, &area) in areas.iter().enumerate() {
            let code = codes.map_or(0, |codes| codes[i]);
            rows.extend(self.row(code, area).iter());
        }

        Ok(Dataset::from_rows(rows, self.features.len(), prices.to_vec())?)
    }
}

fn missing(column: Column) -> PredictorError {
    PredictorError::MissingColumn {
        column,
        accepted: column.synonyms(),
    }
}
