//! Core error types for Tidyflow.

use thiserror::Error;

/// Result type alias using `FlowError`.
pub type FlowResult<T> = std::result::Result<T, FlowError>;

/// Core error type for Tidyflow operations.
///
/// Construction-time failures (bad builder parameters, malformed JSON, unknown
/// names) and pipeline shape failures are reported through the same type so
/// callers can propagate them with `?`. The runner decides which of them abort
/// a run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowError {
    /// Operands of an operation have the wrong or mismatched types.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Column not present in a dataframe or row.
    #[error("ColumnNotFound: {0}")]
    ColumnNotFound(String),

    /// Rows of a dataframe disagree about their columns.
    #[error("SchemaError: {0}")]
    SchemaError(String),

    /// Invalid parameter passed to a builder.
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// Pipeline does not have a runnable shape.
    #[error("ShapeError: {0}")]
    ShapeError(String),

    /// Unknown operation, expression kind, or stage name.
    #[error("UnknownName: {0}")]
    UnknownName(String),

    /// Named result has not been published.
    #[error("ResultNotFound: {0}")]
    ResultNotFound(String),

    /// The host could not supply data for a path.
    #[error("DataSource: {0}")]
    DataSource(String),

    /// Failure while executing a stage.
    #[error("ExecutionError: {0}")]
    ExecutionError(String),

    /// Internal error (bug in Tidyflow).
    #[error("InternalError: {0}")]
    InternalError(String),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl FlowError {
    /// Create a new `TypeError`.
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a new `ColumnNotFound` error.
    pub fn column_not_found<S: Into<String>>(name: S) -> Self {
        Self::ColumnNotFound(name.into())
    }

    /// Create a new `SchemaError`.
    pub fn schema_error<S: Into<String>>(msg: S) -> Self {
        Self::SchemaError(msg.into())
    }

    /// Create a new `InvalidParameter` error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new `ShapeError`.
    pub fn shape<S: Into<String>>(msg: S) -> Self {
        Self::ShapeError(msg.into())
    }

    /// Create a new `UnknownName` error.
    pub fn unknown_name<S: Into<String>>(msg: S) -> Self {
        Self::UnknownName(msg.into())
    }

    /// Create a new `ResultNotFound` error.
    pub fn result_not_found<S: Into<String>>(name: S) -> Self {
        Self::ResultNotFound(name.into())
    }

    /// Create a new `DataSource` error.
    pub fn data_source<S: Into<String>>(msg: S) -> Self {
        Self::DataSource(msg.into())
    }

    /// Create a new `ExecutionError`.
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        Self::ExecutionError(msg.into())
    }

    /// Create a new `InternalError`.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }
}

/// Return early with the named error variant if a condition does not hold.
///
/// ```
/// # use common_error::{ensure, FlowResult};
/// fn positive(bins: u32) -> FlowResult<u32> {
///     ensure!(bins > 0, InvalidParameter: "bins must be positive, got {bins}");
///     Ok(bins)
/// }
/// assert!(positive(0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::FlowError::$variant(format!($($msg)*)));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlowError::type_error("values 1 and 'a' have different types");
        assert_eq!(
            err.to_string(),
            "TypeError: values 1 and 'a' have different types"
        );
    }

    fn checked(flag: bool) -> FlowResult<()> {
        crate::ensure!(flag, InvalidParameter: "flag was {}", flag);
        Ok(())
    }

    #[test]
    fn test_ensure_macro() {
        assert!(checked(true).is_ok());
        let err = checked(false).unwrap_err();
        assert_eq!(err.to_string(), "InvalidParameter: flag was false");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: FlowError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("SerdeJsonError"));
    }
}
