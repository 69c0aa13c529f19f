use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::{MlErr, Result, dataset::Dataset};

/// A regression model mapping a row of features to a single target value.
pub trait Regressor {
    /// Fits the model from scratch over every sample in `data`, discarding any previous fit.
    fn fit(&mut self, data: &Dataset) -> Result<()>;

    /// Returns the amount of features the model was fitted with, `None` if it wasn't fitted yet.
    fn n_features(&self) -> Option<usize>;

    /// Predicts the target for a single row of features.
    ///
    /// # Arguments
    /// * `row` - The features, in the same order used when fitting.
    ///
    /// # Returns
    /// The prediction or an error if the model isn't fitted or the row has the wrong length.
    fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64>;

    /// Predicts the target for every row of `x`.
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        x.axis_iter(Axis(0))
            .map(|row| self.predict_row(row))
            .collect::<Result<Vec<_>>>()
            .map(Array1::from_vec)
    }
}

/// Checks that `row` matches the amount of features the model was fitted with.
pub(crate) fn check_row(n_features: Option<usize>, row: &ArrayView1<f64>) -> Result<()> {
    let expected = n_features.ok_or(MlErr::NotFitted)?;
    if row.len() != expected {
        return Err(MlErr::SizeMismatch {
            a: "row",
            b: "fitted features",
            got: row.len(),
            expected,
        });
    }

    Ok(())
}
