use ndarray::ArrayView1;

use super::Metric;

/// Coefficient of determination.
///
/// When the targets are constant the score is `1.0` for a perfect prediction and `0.0`
/// otherwise, instead of dividing by a zero variance.
#[derive(Debug, Default, Clone, Copy)]
pub struct R2;

impl Metric for R2 {
    fn score(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let mean = y.mean().unwrap_or_default();
        let ss_res = (&y - &y_pred).mapv(|x| x.powi(2)).sum();
        let ss_tot = y.mapv(|x| (x - mean).powi(2)).sum();

        if ss_tot == 0.0 {
            return if ss_res == 0.0 { 1.0 } else { 0.0 };
        }

        1.0 - ss_res / ss_tot
    }
}
