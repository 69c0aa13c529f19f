use ndarray::ArrayView1;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    Result,
    arch::{ForestParams, RandomForest, Regressor},
    dataset::Dataset,
    metrics::Evaluation,
};

/// Runs a single training pass: seeded train/test split, forest fit and evaluation over the
/// held-out rows. Built through `TrainerBuilder`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trainer {
    params: ForestParams,
    test_fraction: f64,
}

/// A fitted forest alongside its scores on the held-out rows.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    forest: RandomForest,
    evaluation: Evaluation,
    train_len: usize,
    test_len: usize,
}

impl Trainer {
    pub(super) fn new(params: ForestParams, test_fraction: f64) -> Self {
        Self {
            params,
            test_fraction,
        }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Trains a new forest over `dataset`.
    ///
    /// The split and the forest share the same seed, so training twice over the same dataset
    /// yields identical models and scores.
    ///
    /// # Returns
    /// The trained model or an error if the dataset can't be split or fitted.
    pub fn train(&self, dataset: &Dataset) -> Result<TrainedModel> {
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let (train, test) = dataset.split(self.test_fraction, &mut rng)?;
        log::debug!(
            "split {} samples into {} train and {} test",
            dataset.len(),
            train.len(),
            test.len()
        );

        let mut forest = RandomForest::new(self.params);
        forest.fit(&train)?;

        let y_pred = forest.predict(test.x())?;
        let evaluation = Evaluation::compute(y_pred.view(), test.y())?;
        log::info!(
            "trained {} trees: mae {:.2}, rmse {:.2}, r2 {:.4}",
            self.params.n_trees,
            evaluation.mean_absolute_error,
            evaluation.root_mean_squared_error,
            evaluation.r_squared
        );

        Ok(TrainedModel {
            forest,
            evaluation,
            train_len: train.len(),
            test_len: test.len(),
        })
    }
}

impl TrainedModel {
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn train_len(&self) -> usize {
        self.train_len
    }

    pub fn test_len(&self) -> usize {
        self.test_len
    }

    /// Predicts the target of a single row of features. No bounds are enforced, rows outside
    /// the training range extrapolate to the nearest leaves.
    pub fn predict(&self, row: ArrayView1<f64>) -> Result<f64> {
        self.forest.predict_row(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MlErr, training::TrainerBuilder};
    use ndarray::array;

    fn dataset(n: usize) -> Dataset {
        let rows = (0..n)
            .flat_map(|i| [(i % 4) as f64, 200.0 + 37.0 * i as f64])
            .collect();
        let y = (0..n)
            .map(|i| 50_000.0 * (i % 4) as f64 + 400.0 * (200.0 + 37.0 * i as f64))
            .collect();
        Dataset::from_rows(rows, 2, y).unwrap()
    }

    #[test]
    fn train_reports_split_sizes() {
        let trainer = TrainerBuilder::new().n_trees(10).build().unwrap();
        let model = trainer.train(&dataset(25)).unwrap();

        assert_eq!(model.test_len(), 5);
        assert_eq!(model.train_len(), 20);
        assert_eq!(model.forest().trees().len(), 10);
    }

    #[test]
    fn training_is_deterministic() {
        let trainer = TrainerBuilder::new().build().unwrap();
        let ds = dataset(40);

        let a = trainer.train(&ds).unwrap();
        let b = trainer.train(&ds).unwrap();

        let bits = |e: &Evaluation| {
            [
                e.mean_absolute_error.to_bits(),
                e.root_mean_squared_error.to_bits(),
                e.r_squared.to_bits(),
            ]
        };
        assert_eq!(bits(a.evaluation()), bits(b.evaluation()));

        let query = array![2.0, 700.0];
        assert_eq!(
            a.predict(query.view()).unwrap().to_bits(),
            b.predict(query.view()).unwrap().to_bits()
        );
    }

    #[test]
    fn learns_a_simple_relation() {
        let trainer = TrainerBuilder::new().build().unwrap();
        let model = trainer.train(&dataset(80)).unwrap();

        assert!(model.evaluation().r_squared > 0.8);
    }

    #[test]
    fn too_few_samples_fail() {
        let trainer = TrainerBuilder::new().build().unwrap();
        let err = trainer.train(&dataset(1)).unwrap_err();
        assert!(matches!(err, MlErr::NotEnoughSamples { .. }));
    }
}
