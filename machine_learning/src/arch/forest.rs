use ndarray::ArrayView1;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use super::{DecisionTree, Regressor, TreeParams, model::check_row};
use crate::{MlErr, Result, dataset::Dataset};

/// Hyperparameters of a `RandomForest`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    /// Amount of trees in the ensemble.
    pub n_trees: usize,
    /// Whether each tree is fitted on a bootstrap sample (drawn with replacement) or on every row.
    pub bootstrap: bool,
    /// Seed for the per-tree random number generators.
    pub seed: u64,
    pub tree: TreeParams,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            bootstrap: true,
            seed: 42,
            tree: TreeParams::default(),
        }
    }
}

/// A random forest regressor: an ensemble of `DecisionTree`s whose predictions are averaged.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<DecisionTree>,
    n_features: Option<usize>,
}

impl RandomForest {
    /// Creates a new, unfitted `RandomForest`.
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            n_features: None,
        }
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Draws one seed per tree from the master seed. Seeds are taken sequentially so the
    /// ensemble doesn't depend on the order in which trees get fitted.
    fn tree_seeds(&self) -> Vec<u64> {
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        (0..self.params.n_trees).map(|_| rng.random()).collect()
    }
}

impl Regressor for RandomForest {
    fn fit(&mut self, data: &Dataset) -> Result<()> {
        if self.params.n_trees == 0 {
            return Err(MlErr::InvalidHyperParam {
                name: "n_trees",
                reason: "must be greater than 0",
            });
        }

        if data.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        let n = data.len();
        let bootstrap = self.params.bootstrap;
        let tree_params = self.params.tree;

        log::debug!(
            "fitting {} trees over {n} samples (bootstrap: {bootstrap})",
            self.params.n_trees
        );

        let trees = self
            .tree_seeds()
            .into_par_iter()
            .map(|seed| {
                let indices: Vec<usize> = if bootstrap {
                    let mut rng = StdRng::seed_from_u64(seed);
                    (0..n).map(|_| rng.random_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };

                let mut tree = DecisionTree::new(tree_params);
                tree.fit_indices(data, &indices).map(|()| tree)
            })
            .collect::<Result<Vec<_>>>()?;

        self.trees = trees;
        self.n_features = Some(data.n_features());
        Ok(())
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        check_row(self.n_features, &row)?;

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_row(row)?;
        }

        Ok(sum / self.trees.len() as f64)
    }
}
