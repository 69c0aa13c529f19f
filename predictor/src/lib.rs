pub mod configs;
pub mod data;
pub mod error;
mod session;

use configs::PredictorConfig;
use data::TableCache;

pub use error::{PredictorError, Result};
pub use session::{Prediction, Session};

/// Loads the configured table and trains a price model over it.
///
/// # Errors
/// Returns a `PredictorError` if the config is invalid, the table can't be loaded or lacks a
/// required column, or the model fails to train.
pub fn train(config: &PredictorConfig, cache: &TableCache) -> Result<Session> {
    log::info!("opening session over {}", config.source);
    let session = Session::open(config, cache)?;
    log::info!(
        "session ready: {} train and {} test rows",
        session.train_len(),
        session.test_len()
    );
    Ok(session)
}
