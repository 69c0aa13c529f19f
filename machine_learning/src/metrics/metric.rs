use ndarray::ArrayView1;

/// A regression score comparing predictions against the expected targets.
///
/// Both views are assumed to have the same, non zero, length.
pub trait Metric {
    fn score(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> f64;
}
