use std::{fmt, io, path::PathBuf};

use machine_learning::MlErr;

use crate::data::Column;

/// The predictor's result type.
pub type Result<T> = std::result::Result<T, PredictorError>;

/// All errors that can occur while loading data, training or predicting.
#[derive(Debug)]
pub enum PredictorError {
    /// Invalid configuration, caught before loading anything.
    InvalidConfig(String),
    /// The configuration file couldn't be read or parsed.
    ConfigFile { path: PathBuf, reason: String },
    /// The remote source couldn't be reached or answered with an error.
    Fetch { origin: String, reason: String },
    /// A local source couldn't be read.
    Io { path: PathBuf, source: io::Error },
    /// The source isn't valid CSV.
    Malformed { origin: String, reason: String },
    /// The source has a header but no records.
    EmptyTable { origin: String },
    /// A required column isn't present under any of its accepted names.
    MissingColumn {
        column: Column,
        accepted: &'static [&'static str],
    },
    /// Two columns of the same table have different lengths.
    RaggedColumns {
        column: Column,
        got: usize,
        expected: usize,
    },
    /// A cell is empty or couldn't be parsed.
    InvalidCell {
        row: usize,
        column: Column,
        value: String,
    },
    /// A numeric cell is outside its domain (area <= 0, price < 0).
    InvalidValue {
        row: usize,
        column: Column,
        value: f64,
    },
    /// The machine learning core failed to split, fit or evaluate.
    Training(MlErr),
    /// The requested neighborhood isn't part of the training encoding.
    UnknownNeighborhood(String),
    /// The requested area isn't a positive finite number.
    InvalidArea(f64),
    /// The requested area is outside the areas observed in the dataset.
    AreaOutOfRange { area: f64, min: f64, max: f64 },
}

impl fmt::Display for PredictorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::ConfigFile { path, reason } => {
                write!(f, "cannot load config '{}': {reason}", path.display())
            }
            Self::Fetch { origin, reason } => write!(f, "failed to fetch {origin}: {reason}"),
            Self::Io { path, source } => write!(f, "cannot read '{}': {source}", path.display()),
            Self::Malformed { origin, reason } => write!(f, "malformed csv in {origin}: {reason}"),
            Self::EmptyTable { origin } => write!(f, "{origin} has no records"),
            Self::MissingColumn { column, accepted } => write!(
                f,
                "missing required column {column}, accepted names: {}",
                accepted.join(", ")
            ),
            Self::RaggedColumns {
                column,
                got,
                expected,
            } => write!(f, "column {column} has {got} values, expected {expected}"),
            Self::InvalidCell { row, column, value } => {
                write!(f, "row {row}: invalid {column} value {value:?}")
            }
            Self::InvalidValue { row, column, value } => match column {
                Column::Area => write!(f, "row {row}: area must be positive, got {value}"),
                _ => write!(f, "row {row}: {column} must not be negative, got {value}"),
            },
            Self::Training(e) => write!(f, "training failed: {e}"),
            Self::UnknownNeighborhood(name) => write!(f, "unknown neighborhood: {name}"),
            Self::InvalidArea(area) => {
                write!(f, "area must be a positive finite number, got {area}")
            }
            Self::AreaOutOfRange { area, min, max } => {
                write!(f, "area {area} is outside the observed range [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for PredictorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Training(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for PredictorError {
    fn from(e: MlErr) -> Self {
        Self::Training(e)
    }
}
