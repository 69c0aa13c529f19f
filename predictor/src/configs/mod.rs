mod features;
mod json;
mod source;
mod training;

use serde::{Deserialize, Serialize};

pub use features::{Feature, FeatureSet};
pub use json::load_config;
pub use source::SourceConfig;
pub use training::TrainingConfig;

use crate::Result;

/// Everything a `Session` needs: where the data comes from and how the model is trained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredictorConfig {
    pub source: SourceConfig,
    pub training: TrainingConfig,
}

impl PredictorConfig {
    /// Validates the whole config before anything gets loaded.
    pub fn validate(&self) -> Result<()> {
        self.source.validate()?;
        self.training.trainer()?;
        Ok(())
    }
}
