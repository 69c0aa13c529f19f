use ndarray::ArrayView1;
use serde::Serialize;

use super::{Mae, Metric, R2, Rmse};
use crate::{MlErr, Result};

/// The scores of a model over a held-out dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub mean_absolute_error: f64,
    pub root_mean_squared_error: f64,
    pub r_squared: f64,
}

impl Evaluation {
    /// Scores `y_pred` against `y`.
    ///
    /// # Returns
    /// An error if the lengths differ or there's nothing to score.
    pub fn compute(y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<Self> {
        if y_pred.len() != y.len() {
            return Err(MlErr::SizeMismatch {
                a: "predictions",
                b: "targets",
                got: y_pred.len(),
                expected: y.len(),
            });
        }

        if y.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        Ok(Self {
            mean_absolute_error: Mae.score(y_pred, y),
            root_mean_squared_error: Rmse.score(y_pred, y),
            r_squared: R2.score(y_pred, y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn known_scores() {
        let y = array![3.0, -0.5, 2.0, 7.0];
        let y_pred = array![2.5, 0.0, 2.0, 8.0];
        let eval = Evaluation::compute(y_pred.view(), y.view()).unwrap();

        assert!((eval.mean_absolute_error - 0.5).abs() < 1e-12);
        assert!((eval.root_mean_squared_error - 0.375_f64.sqrt()).abs() < 1e-12);
        assert!((eval.r_squared - 0.948_608_137_044_967_9).abs() < 1e-9);
    }

    #[test]
    fn perfect_prediction() {
        let y = array![1.0, 2.0, 3.0];
        let eval = Evaluation::compute(y.view(), y.view()).unwrap();

        assert_eq!(eval.mean_absolute_error, 0.0);
        assert_eq!(eval.root_mean_squared_error, 0.0);
        assert_eq!(eval.r_squared, 1.0);
    }

    #[test]
    fn constant_targets_do_not_divide_by_zero() {
        let y = array![150_000.0, 150_000.0];
        let off = array![150_000.0, 160_000.0];

        assert_eq!(
            Evaluation::compute(y.view(), y.view()).unwrap().r_squared,
            1.0
        );
        assert_eq!(
            Evaluation::compute(off.view(), y.view()).unwrap().r_squared,
            0.0
        );
    }

    #[test]
    fn mismatched_lengths_fail() {
        let err = Evaluation::compute(array![1.0].view(), array![1.0, 2.0].view()).unwrap_err();
        assert!(matches!(err, MlErr::SizeMismatch { .. }));
    }
}
