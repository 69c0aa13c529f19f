mod evaluation;
mod mae;
mod metric;
mod r2;
mod rmse;

pub use evaluation::Evaluation;
pub use mae::Mae;
pub use metric::Metric;
pub use r2::R2;
pub use rmse::Rmse;
