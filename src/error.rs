//! Error type shared by every stage of the pipeline.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RegressionError>;

/// Everything that can go wrong between reading the CSV and predicting a price.
#[derive(Debug)]
pub enum RegressionError {
    /// File system failure (unreadable dataset, unwritable model file).
    Io(std::io::Error),
    /// Malformed CSV (bad quoting, ragged rows).
    Csv(csv::Error),
    /// A required column is absent from the CSV header.
    MissingColumn(String),
    /// A cell could not be parsed as a number.
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// Min-max scaling of a column whose values are all equal.
    ConstantColumn { value: f64 },
    /// Non-finite values in the input or during training.
    NumericalError(String),
    /// Tensor length or shape differs from what the operation expects.
    ShapeMismatch { expected: String, got: String },
    /// Invalid hyperparameter or configuration value.
    InvalidParameter(String),
    /// Serialization or deserialization failure.
    Serialization(String),
    /// A model file written with a different record layout.
    UnsupportedFormat { found: u32, expected: u32 },
    /// `test`, `save` or `predict` before any model was trained or loaded.
    NoModel,
    /// The controller received an action that is currently disabled.
    ActionDisabled(String),
}

impl fmt::Display for RegressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressionError::Io(err) => write!(f, "I/O error: {}", err),
            RegressionError::Csv(err) => write!(f, "CSV error: {}", err),
            RegressionError::MissingColumn(name) => {
                write!(f, "Missing column: '{}' not found in header", name)
            }
            RegressionError::InvalidValue { row, column, value } => write!(
                f,
                "Invalid value: row {} column '{}' is not a number: {:?}",
                row, column, value
            ),
            RegressionError::EmptyData(msg) => write!(f, "Empty data: {}", msg),
            RegressionError::ConstantColumn { value } => write!(
                f,
                "Constant column: every value equals {}, cannot scale to [0, 1]",
                value
            ),
            RegressionError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            RegressionError::ShapeMismatch { expected, got } => {
                write!(f, "Shape mismatch: expected {}, got {}", expected, got)
            }
            RegressionError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            RegressionError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            RegressionError::UnsupportedFormat { found, expected } => write!(
                f,
                "Unsupported model format: version {} (expected {})",
                found, expected
            ),
            RegressionError::NoModel => write!(f, "No model: train or load a model first"),
            RegressionError::ActionDisabled(action) => {
                write!(f, "Action disabled: '{}' is not available right now", action)
            }
        }
    }
}

impl std::error::Error for RegressionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegressionError::Io(err) => Some(err),
            RegressionError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RegressionError {
    fn from(err: std::io::Error) -> Self {
        RegressionError::Io(err)
    }
}

impl From<csv::Error> for RegressionError {
    fn from(err: csv::Error) -> Self {
        RegressionError::Csv(err)
    }
}

impl From<bincode::Error> for RegressionError {
    fn from(err: bincode::Error) -> Self {
        RegressionError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for RegressionError {
    fn from(err: serde_json::Error) -> Self {
        RegressionError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_column() {
        let err = RegressionError::MissingColumn("sqft_living".to_string());
        assert!(err.to_string().contains("sqft_living"));
    }

    #[test]
    fn test_error_display_invalid_value() {
        let err = RegressionError::InvalidValue {
            row: 3,
            column: "price".to_string(),
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("price"));
    }

    #[test]
    fn test_error_display_constant_column() {
        let err = RegressionError::ConstantColumn { value: 7.0 };
        assert!(err.to_string().contains("Constant column"));
    }

    #[test]
    fn test_error_display_unsupported_format() {
        let err = RegressionError::UnsupportedFormat {
            found: 9,
            expected: 1,
        };
        assert!(err.to_string().contains("version 9"));
    }

    #[test]
    fn test_error_display_no_model() {
        assert!(RegressionError::NoModel.to_string().contains("No model"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: RegressionError = io_err.into();
        assert!(matches!(err, RegressionError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: std::result::Result<String, bincode::Error> =
            bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: RegressionError = e.into();
            assert!(matches!(err, RegressionError::Serialization(_)));
        }
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: RegressionError = json_err.into();
        assert!(matches!(err, RegressionError::Serialization(_)));
    }
}
