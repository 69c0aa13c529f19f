use ndarray::ArrayView1;

use super::Metric;

/// Mean absolute error.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mae;

impl Metric for Mae {
    fn score(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        (&y_pred - &y).mapv(f64::abs).mean().unwrap_or_default()
    }
}
