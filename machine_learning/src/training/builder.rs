use super::Trainer;
use crate::{
    MlErr, Result,
    arch::{ForestParams, TreeParams},
};

/// Builds `Trainer`s, validating the hyperparameters once before any data is touched.
#[derive(Debug, Clone, Copy)]
pub struct TrainerBuilder {
    params: ForestParams,
    test_fraction: f64,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self {
            params: ForestParams::default(),
            test_fraction: 0.2,
        }
    }
}

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder` with 100 trees, seed 42 and a 20% test split.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.params.n_trees = n_trees;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = seed;
        self
    }

    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.params.bootstrap = bootstrap;
        self
    }

    pub fn test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    pub fn tree(mut self, tree: TreeParams) -> Self {
        self.params.tree = tree;
        self
    }

    /// Builds a new `Trainer`.
    ///
    /// # Returns
    /// An error if any hyperparameter is out of its valid range.
    pub fn build(self) -> Result<Trainer> {
        if self.params.n_trees == 0 {
            return Err(MlErr::InvalidHyperParam {
                name: "n_trees",
                reason: "must be greater than 0",
            });
        }

        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(MlErr::InvalidTestFraction(self.test_fraction));
        }

        self.params.tree.validate()?;
        Ok(Trainer::new(self.params, self.test_fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let trainer = TrainerBuilder::new().build().unwrap();
        assert_eq!(trainer.params().n_trees, 100);
        assert_eq!(trainer.params().seed, 42);
        assert!(trainer.params().bootstrap);
        assert_eq!(trainer.test_fraction(), 0.2);
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(TrainerBuilder::new().n_trees(0).build().is_err());
        assert!(TrainerBuilder::new().test_fraction(0.0).build().is_err());
        assert!(TrainerBuilder::new().test_fraction(1.5).build().is_err());

        let tree = TreeParams {
            min_samples_leaf: 0,
            ..TreeParams::default()
        };
        assert!(TrainerBuilder::new().tree(tree).build().is_err());
    }
}
