use ndarray::ArrayView1;

use super::Metric;

/// Root mean squared error.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rmse;

impl Metric for Rmse {
    fn score(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        (&y_pred - &y)
            .mapv(|x| x.powi(2))
            .mean()
            .unwrap_or_default()
            .sqrt()
    }
}
