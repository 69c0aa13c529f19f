use machine_learning::{
    arch::TreeParams,
    training::{Trainer, TrainerBuilder},
};
use serde::{Deserialize, Serialize};

use crate::{PredictorError, Result};

/// Hyperparameters of the price model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    pub n_trees: usize,
    pub seed: u64,
    pub test_fraction: f64,
    pub bootstrap: bool,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            test_fraction: 0.2,
            bootstrap: true,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TrainingConfig {
    /// Builds the trainer described by this config.
    ///
    /// # Returns
    /// An `InvalidConfig` error if any hyperparameter is out of range.
    pub fn trainer(&self) -> Result<Trainer> {
        let tree = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        };

        TrainerBuilder::new()
            .n_trees(self.n_trees)
            .seed(self.seed)
            .test_fraction(self.test_fraction)
            .bootstrap(self.bootstrap)
            .tree(tree)
            .build()
            .map_err(|e| PredictorError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: TrainingConfig = serde_json::from_str(r#"{ "n_trees": 10 }"#).unwrap();
        assert_eq!(
            config,
            TrainingConfig {
                n_trees: 10,
                ..TrainingConfig::default()
            }
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<TrainingConfig>(r#"{ "trees": 10 }"#).is_err());
    }

    #[test]
    fn invalid_values_become_config_errors() {
        let config = TrainingConfig {
            test_fraction: 0.0,
            ..TrainingConfig::default()
        };
        assert!(matches!(
            config.trainer(),
            Err(PredictorError::InvalidConfig(_))
        ));
    }
}
