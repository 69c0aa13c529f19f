use ndarray::ArrayView1;

use super::{Regressor, model::check_row};
use crate::{MlErr, Result, dataset::Dataset};

/// Stopping rules for growing a `DecisionTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Maximum depth of the tree, `None` grows until the leaves are pure. Growth uses a heap
    /// allocated stack, so deep trees cost memory, not call stack.
    pub max_depth: Option<usize>,
    /// Minimum amount of samples a node needs to be considered for splitting.
    pub min_samples_split: usize,
    /// Minimum amount of samples each side of a split must keep.
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TreeParams {
    /// Validates the parameters.
    ///
    /// # Returns
    /// An error naming the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(MlErr::InvalidHyperParam {
                name: "min_samples_split",
                reason: "must be at least 2",
            });
        }

        if self.min_samples_leaf < 1 {
            return Err(MlErr::InvalidHyperParam {
                name: "min_samples_leaf",
                reason: "must be at least 1",
            });
        }

        if self.max_depth == Some(0) {
            return Err(MlErr::InvalidHyperParam {
                name: "max_depth",
                reason: "must be greater than 0 when set",
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
}

/// A CART regression tree. Splits minimize the summed squared error of both children and
/// leaves predict the mean target of the samples that reached them.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    params: TreeParams,
    nodes: Vec<Node>,
    n_features: Option<usize>,
}

impl DecisionTree {
    /// Creates a new, unfitted `DecisionTree`.
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            nodes: Vec::new(),
            n_features: None,
        }
    }

    /// Fits the tree over the given rows of `data`. Rows may repeat, which is how bootstrap
    /// samples are fed to the tree.
    ///
    /// # Arguments
    /// * `data` - The full dataset.
    /// * `indices` - The rows to fit on.
    pub fn fit_indices(&mut self, data: &Dataset, indices: &[usize]) -> Result<()> {
        self.params.validate()?;
        if indices.is_empty() {
            return Err(MlErr::EmptyDataset);
        }

        if let Some(&bad) = indices.iter().find(|&&i| i >= data.len()) {
            return Err(MlErr::SizeMismatch {
                a: "sample index",
                b: "dataset",
                got: bad,
                expected: data.len(),
            });
        }

        self.nodes.clear();
        self.n_features = Some(data.n_features());

        let mut indices = indices.to_vec();
        self.grow(data, &mut indices);
        Ok(())
    }

    /// Returns the depth of the fitted tree, a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut pending = vec![(0, 0)];
        while let Some((idx, level)) = pending.pop() {
            depth = depth.max(level);
            if let Some(Node::Split { left, right, .. }) = self.nodes.get(idx) {
                pending.push((*left, level + 1));
                pending.push((*right, level + 1));
            }
        }

        depth
    }

    /// Returns the amount of leaves of the fitted tree.
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Grows the tree from an explicit stack of pending nodes, each owning a disjoint range of
    /// `indices`, so unbounded depth never grows the call stack.
    fn grow(&mut self, data: &Dataset, indices: &mut [usize]) {
        let x = data.x();
        let root = self.push_leaf(data, indices);
        let mut pending = vec![(root, 0..indices.len(), 0)];

        while let Some((node, range, depth)) = pending.pop() {
            let rows = &mut indices[range.clone()];
            if !self.splittable(data, rows, depth) {
                continue;
            }

            let Some(best) = self.best_split(data, rows) else {
                continue;
            };

            let mid = range.start + partition(rows, |&i| x[[i, best.feature]] <= best.threshold);
            let left = self.push_leaf(data, &indices[range.start..mid]);
            let right = self.push_leaf(data, &indices[mid..range.end]);
            self.nodes[node] = Node::Split {
                feature: best.feature,
                threshold: best.threshold,
                left,
                right,
            };

            pending.push((right, mid..range.end, depth + 1));
            pending.push((left, range.start..mid, depth + 1));
        }
    }

    /// Appends a leaf predicting the mean target of `rows`, returning its index.
    fn push_leaf(&mut self, data: &Dataset, rows: &[usize]) -> usize {
        let y = data.y();
        let mean = rows.iter().map(|&i| y[i]).sum::<f64>() / rows.len() as f64;
        self.nodes.push(Node::Leaf { value: mean });
        self.nodes.len() - 1
    }

    fn splittable(&self, data: &Dataset, rows: &[usize], depth: usize) -> bool {
        let y = data.y();
        let first = y[rows[0]];
        let pure = rows.iter().all(|&i| y[i] == first);
        let too_deep = self.params.max_depth.is_some_and(|max| depth >= max);
        !(pure || too_deep || rows.len() < self.params.min_samples_split)
    }

    fn best_split(&self, data: &Dataset, indices: &[usize]) -> Option<BestSplit> {
        let (x, y) = (data.x(), data.y());
        let n = indices.len();
        let min_leaf = self.params.min_samples_leaf;
        let mut best: Option<BestSplit> = None;

        let total: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();

        let mut sorted = indices.to_vec();
        for feature in 0..data.n_features() {
            sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for count in 1..n {
                let prev = sorted[count - 1];
                left_sum += y[prev];
                left_sq += y[prev] * y[prev];

                if count < min_leaf || n - count < min_leaf {
                    continue;
                }

                let (lo, hi) = (x[[prev, feature]], x[[sorted[count], feature]]);
                if lo >= hi {
                    continue;
                }

                let right_count = (n - count) as f64;
                let right_sum = total - left_sum;
                let left_sse = left_sq - left_sum * left_sum / count as f64;
                let right_sse = (total_sq - left_sq) - right_sum * right_sum / right_count;
                let sse = left_sse + right_sse;

                if best.is_none_or(|b| sse < b.sse) {
                    best = Some(BestSplit {
                        feature,
                        threshold: midpoint(lo, hi),
                        sse,
                    });
                }
            }
        }

        best
    }
}

impl Regressor for DecisionTree {
    fn fit(&mut self, data: &Dataset) -> Result<()> {
        let indices: Vec<usize> = (0..data.len()).collect();
        self.fit_indices(data, &indices)
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> Result<f64> {
        check_row(self.n_features, &row)?;

        let mut idx = 0;
        loop {
            match self.nodes.get(idx).ok_or(MlErr::NotFitted)? {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if row[*feature] <= *threshold { *left } else { *right },
            }
        }
    }
}

/// The threshold between two adjacent distinct values. Falls back to `lo` when the midpoint
/// rounds up to `hi`, so `hi` always goes right.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid < hi { mid } else { lo }
}

/// Moves the elements satisfying `pred` to the front, returning how many there are.
fn partition<F>(items: &mut [usize], pred: F) -> usize
where
    F: Fn(&usize) -> bool,
{
    let mut mid = 0;
    for i in 0..items.len() {
        if pred(&items[i]) {
            items.swap(mid, i);
            mid += 1;
        }
    }

    mid
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn step_dataset() -> Dataset {
        // y jumps from 10 to 50 between x = 3 and x = 4.
        Dataset::from_rows(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            1,
            vec![10.0, 10.0, 10.0, 50.0, 50.0, 50.0],
        )
        .unwrap()
    }

    #[test]
    fn finds_the_step() {
        let mut tree = DecisionTree::new(TreeParams::default());
        tree.fit(&step_dataset()).unwrap();

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict_row(array![3.4].view()).unwrap(), 10.0);
        assert_eq!(tree.predict_row(array![3.6].view()).unwrap(), 50.0);
    }

    #[test]
    fn fully_grown_tree_memorizes_distinct_points() {
        let ds = Dataset::from_rows(
            vec![1.0, 5.0, 2.0, 3.0, 3.0, 8.0, 4.0, 1.0],
            2,
            vec![7.0, -2.0, 13.0, 4.0],
        )
        .unwrap();

        let mut tree = DecisionTree::new(TreeParams::default());
        tree.fit(&ds).unwrap();

        let pred = tree.predict(ds.x()).unwrap();
        assert_eq!(pred, ds.y());
    }

    #[test]
    fn identical_features_average_their_targets() {
        let ds = Dataset::from_rows(vec![1.0, 1.0, 2.0], 1, vec![300.0, 450.0, 10.0]).unwrap();

        let mut tree = DecisionTree::new(TreeParams::default());
        tree.fit(&ds).unwrap();

        assert_eq!(tree.predict_row(array![1.0].view()).unwrap(), 375.0);
    }

    #[test]
    fn max_depth_limits_growth() {
        let ds = Dataset::from_rows(
            (0..16).map(|i| i as f64).collect(),
            1,
            (0..16).map(|i| (i * i) as f64).collect(),
        )
        .unwrap();

        let params = TreeParams {
            max_depth: Some(2),
            ..TreeParams::default()
        };
        let mut tree = DecisionTree::new(params);
        tree.fit(&ds).unwrap();

        assert_eq!(tree.depth(), 2);
        assert!(tree.n_leaves() <= 4);
    }

    #[test]
    fn min_samples_leaf_is_respected() {
        let params = TreeParams {
            min_samples_leaf: 4,
            ..TreeParams::default()
        };
        let mut tree = DecisionTree::new(params);
        tree.fit(&step_dataset()).unwrap();

        // No split can keep 4 samples on both sides of 6.
        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.predict_row(array![1.0].view()).unwrap(), 30.0);
    }

    #[test]
    fn many_rows_fit_without_recursion() {
        let n = 20_000;
        let ds = Dataset::from_rows(
            (0..n).map(|i| i as f64).collect(),
            1,
            (0..n).map(|i| (i % 7) as f64).collect(),
        )
        .unwrap();

        let mut tree = DecisionTree::new(TreeParams::default());
        tree.fit(&ds).unwrap();

        let pred = tree.predict(ds.x()).unwrap();
        assert_eq!(pred, ds.y());
        assert!(tree.depth() >= 14);
    }

    #[test]
    fn predicting_before_fitting_fails() {
        let tree = DecisionTree::new(TreeParams::default());
        assert_eq!(
            tree.predict_row(array![1.0].view()).unwrap_err(),
            MlErr::NotFitted
        );
    }

    #[test]
    fn wrong_row_length_fails() {
        let mut tree = DecisionTree::new(TreeParams::default());
        tree.fit(&step_dataset()).unwrap();

        let err = tree.predict_row(array![1.0, 2.0].view()).unwrap_err();
        assert!(matches!(err, MlErr::SizeMismatch { got: 2, expected: 1, .. }));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = TreeParams {
            min_samples_split: 1,
            ..TreeParams::default()
        };
        let mut tree = DecisionTree::new(params);
        assert!(matches!(
            tree.fit(&step_dataset()),
            Err(MlErr::InvalidHyperParam {
                name: "min_samples_split",
                ..
            })
        ));
    }
}
