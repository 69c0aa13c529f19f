use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum MlErr {
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyDataset,
    NotEnoughSamples {
        what: &'static str,
        got: usize,
        needed: usize,
    },
    InvalidTestFraction(f64),
    InvalidHyperParam {
        name: &'static str,
        reason: &'static str,
    },
    NonFiniteValue {
        what: &'static str,
        row: usize,
    },
    NotFitted,
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => {
                format!(
                    "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
                )
            }
            MlErr::EmptyDataset => "The dataset has no samples".to_string(),
            MlErr::NotEnoughSamples { what, got, needed } => {
                format!("Not enough samples for the {what}, got {got} and needed at least {needed}")
            }
            MlErr::InvalidTestFraction(fraction) => {
                format!("The test fraction must lie strictly between 0 and 1, got {fraction}")
            }
            MlErr::InvalidHyperParam { name, reason } => {
                format!("Invalid hyperparameter {name}: {reason}")
            }
            MlErr::NonFiniteValue { what, row } => {
                format!("Found a non finite value in {what} at row {row}")
            }
            MlErr::NotFitted => "The model must be fitted before predicting".to_string(),
        };

        write!(f, "{s}")
    }
}

impl Error for MlErr {}
