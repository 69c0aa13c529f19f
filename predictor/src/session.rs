use std::sync::Arc;

use machine_learning::{metrics::Evaluation, training::TrainedModel};
use serde::Serialize;

use crate::{
    PredictorError, Result,
    configs::{FeatureSet, PredictorConfig, TrainingConfig},
    data::{
        AreaBounds, Column, DatasetSummary, EncodedTable, NeighborhoodEncoding, Table,
        TableCache, encode,
    },
};

/// A single price estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub neighborhood: String,
    pub area: f64,
    /// Price in SAR.
    pub price: f64,
    pub price_per_area: f64,
}

/// A trained price model together with the table it was trained on.
///
/// Everything a prediction request needs is resolved once here: the neighborhood encoding,
/// the feature set and the observed area bounds.
#[derive(Debug, Clone)]
pub struct Session {
    encoded: EncodedTable,
    features: FeatureSet,
    model: TrainedModel,
    area_bounds: AreaBounds,
}

impl Session {
    /// Loads the configured source through `cache` and trains over it.
    ///
    /// # Errors
    /// An invalid config, any load error, a missing column or a training failure.
    pub fn open(config: &PredictorConfig, cache: &TableCache) -> Result<Self> {
        config.validate()?;
        let table = cache.get_or_load(&config.source)?;
        Self::train(table, &config.training)
    }

    /// Encodes `table` and trains a model over it.
    ///
    /// # Arguments
    /// * `table` - The loaded property table.
    /// * `training` - The model hyperparameters.
    ///
    /// # Returns
    /// A `MissingColumn` error if the table has no prices or areas, or the training error.
    pub fn train(table: Arc<Table>, training: &TrainingConfig) -> Result<Self> {
        let trainer = training.trainer()?;
        for column in [Column::Price, Column::Area] {
            if !table.has(column) {
                return Err(PredictorError::MissingColumn {
                    column,
                    accepted: column.synonyms(),
                });
            }
        }

        let area_bounds = AreaBounds::of(&table).ok_or(PredictorError::EmptyTable {
            origin: "table".to_string(),
        })?;
        let encoded = encode(table);
        let features = FeatureSet::resolve(&encoded)?;
        let dataset = features.dataset(&encoded)?;
        log::debug!(
            "training on {} rows with features {:?}",
            dataset.len(),
            features.features()
        );

        let model = trainer.train(&dataset)?;

        Ok(Self {
            encoded,
            features,
            model,
            area_bounds,
        })
    }

    /// Estimates the price of a property.
    ///
    /// # Arguments
    /// * `neighborhood` - A neighborhood name as written in the table, ignored when the table
    ///   has no neighborhoods.
    /// * `area` - The area in square meters, within the observed area bounds.
    ///
    /// # Errors
    /// `InvalidArea`, `AreaOutOfRange` or `UnknownNeighborhood`, checked in that order.
    pub fn predict(&self, neighborhood: &str, area: f64) -> Result<Prediction> {
        if !area.is_finite() || area <= 0.0 {
            log::warn!(area = area; "rejected invalid area");
            return Err(PredictorError::InvalidArea(area));
        }

        let AreaBounds { min, max } = self.area_bounds;
        if !self.area_bounds.contains(area) {
            log::warn!(
                area = area, min = min, max = max;
                "rejected area outside the observed range"
            );
            return Err(PredictorError::AreaOutOfRange { area, min, max });
        }

        let code = if self.features.uses_neighborhood() {
            self.encoded
                .encoding()
                .and_then(|encoding| encoding.code(neighborhood))
                .ok_or_else(|| {
                    log::warn!(neighborhood = neighborhood; "rejected unknown neighborhood");
                    PredictorError::UnknownNeighborhood(neighborhood.to_string())
                })?
        } else {
            0
        };

        let row = self.features.row(code, area);
        let price = self.model.predict(row.view())?;
        log::debug!("predicted {price:.2} for {neighborhood:?} at {area}");

        Ok(Prediction {
            neighborhood: neighborhood.to_string(),
            area,
            price,
            price_per_area: price / area,
        })
    }

    /// The scores over the held-out rows.
    pub fn metrics(&self) -> &Evaluation {
        self.model.evaluation()
    }

    /// The encoded neighborhoods, `None` if the table has none.
    pub fn neighborhoods(&self) -> Option<&NeighborhoodEncoding> {
        self.encoded.encoding()
    }

    pub fn area_bounds(&self) -> AreaBounds {
        self.area_bounds
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary::new(self.encoded.table(), self.encoded.price_per_area())
    }

    pub fn table(&self) -> &Table {
        self.encoded.table()
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    pub fn train_len(&self) -> usize {
        self.model.train_len()
    }

    pub fn test_len(&self) -> usize {
        self.model.test_len()
    }
}
