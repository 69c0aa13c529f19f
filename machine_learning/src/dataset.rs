use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::{Rng, seq::SliceRandom};

use crate::{MlErr, Result};

/// A supervised regression dataset: a feature matrix with one row per sample and a
/// target vector of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `x` - The features, shaped `(samples, features)`.
    /// * `y` - The targets, one per sample.
    ///
    /// # Returns
    /// An error if the amount of rows differ or a value is not finite.
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(MlErr::SizeMismatch {
                a: "features",
                b: "targets",
                got: x.nrows(),
                expected: y.len(),
            });
        }

        if let Some(row) = x
            .axis_iter(Axis(0))
            .position(|r| r.iter().any(|v| !v.is_finite()))
        {
            return Err(MlErr::NonFiniteValue {
                what: "features",
                row,
            });
        }

        if let Some(row) = y.iter().position(|v| !v.is_finite()) {
            return Err(MlErr::NonFiniteValue {
                what: "targets",
                row,
            });
        }

        Ok(Self { x, y })
    }

    /// Builds a dataset from row-major feature rows.
    ///
    /// # Arguments
    /// * `rows` - The feature rows, all of them of length `n_features`.
    /// * `n_features` - The amount of columns per row.
    /// * `y` - The targets.
    pub fn from_rows(rows: Vec<f64>, n_features: usize, y: Vec<f64>) -> Result<Self> {
        if n_features == 0 || rows.len() != n_features * y.len() {
            return Err(MlErr::SizeMismatch {
                a: "feature rows",
                b: "targets",
                got: rows.len(),
                expected: n_features * y.len(),
            });
        }

        let x = Array2::from_shape_vec((y.len(), n_features), rows).map_err(|_| {
            MlErr::SizeMismatch {
                a: "feature rows",
                b: "shape",
                got: 0,
                expected: n_features,
            }
        })?;

        Self::new(x, Array1::from_vec(y))
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn x(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }

    /// Returns a new dataset made of the given rows, in the given order. Rows may repeat.
    ///
    /// # Panics
    /// If any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }

    /// Shuffles the row indices and partitions them into a train and a test dataset.
    ///
    /// The test partition receives `ceil(len * test_fraction)` rows, the train partition the rest.
    ///
    /// # Arguments
    /// * `test_fraction` - The fraction of rows held out, strictly between 0 and 1.
    /// * `rng` - The random number generator driving the permutation.
    ///
    /// # Returns
    /// `(train, test)` or an error if either side would end up empty.
    pub fn split<R: Rng>(&self, test_fraction: f64, rng: &mut R) -> Result<(Self, Self)> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(MlErr::InvalidTestFraction(test_fraction));
        }

        let n = self.len();
        let n_test = (n as f64 * test_fraction).ceil() as usize;
        if n < 2 || n_test >= n {
            return Err(MlErr::NotEnoughSamples {
                what: "train/test split",
                got: n,
                needed: 2,
            });
        }

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);
        let (test, train) = indices.split_at(n_test);

        Ok((self.select(train), self.select(test)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn dataset(n: usize) -> Dataset {
        let rows = (0..n).flat_map(|i| [i as f64, 10.0 * i as f64]).collect();
        let y = (0..n).map(|i| 100.0 * i as f64).collect();
        Dataset::from_rows(rows, 2, y).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = Dataset::from_rows(vec![1.0, 2.0, 3.0], 2, vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, MlErr::SizeMismatch { .. }));
    }

    #[test]
    fn new_rejects_non_finite_targets() {
        let x = Array2::zeros((2, 1));
        let y = Array1::from_vec(vec![1.0, f64::NAN]);
        assert_eq!(
            Dataset::new(x, y).unwrap_err(),
            MlErr::NonFiniteValue {
                what: "targets",
                row: 1
            }
        );
    }

    #[test]
    fn split_sizes_follow_ceil_of_fraction() {
        let ds = dataset(11);
        let mut rng = StdRng::seed_from_u64(42);
        let (train, test) = ds.split(0.2, &mut rng).unwrap();

        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn split_partitions_every_row_once() {
        let ds = dataset(10);
        let mut rng = StdRng::seed_from_u64(7);
        let (train, test) = ds.split(0.2, &mut rng).unwrap();

        let mut seen: Vec<f64> = train.y().iter().chain(test.y().iter()).copied().collect();
        seen.sort_by(f64::total_cmp);
        let expected: Vec<f64> = (0..10).map(|i| 100.0 * i as f64).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn split_is_reproducible_with_the_same_seed() {
        let ds = dataset(20);
        let a = ds.split(0.2, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = ds.split(0.2, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn split_rejects_degenerate_inputs() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(matches!(
            dataset(1).split(0.2, &mut rng),
            Err(MlErr::NotEnoughSamples { .. })
        ));
        assert!(matches!(
            dataset(10).split(1.0, &mut rng),
            Err(MlErr::InvalidTestFraction(_))
        ));
    }
}
