mod forest;
mod model;
mod tree;

pub use forest::{ForestParams, RandomForest};
pub use model::Regressor;
pub use tree::{DecisionTree, TreeParams};
