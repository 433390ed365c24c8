//! Type invariant checks shared by comparison and aggregation code.

use common_error::{FlowError, FlowResult};

use super::{Value, ValueKind};

/// Check that two values may be compared.
///
/// Missing values compare with anything; two present values must share a kind.
pub fn check_comparable(left: &Value, right: &Value) -> FlowResult<()> {
    if left.is_missing() || right.is_missing() || left.kind() == right.kind() {
        return Ok(());
    }
    Err(FlowError::type_error(format!(
        "cannot compare {} '{left}' with {} '{right}'",
        left.kind(),
        right.kind()
    )))
}

/// Check that a value is either missing or of the expected kind.
pub fn check_kind(value: &Value, expected: ValueKind, context: &str) -> FlowResult<()> {
    if value.is_missing() || value.kind() == expected {
        return Ok(());
    }
    Err(FlowError::type_error(format!(
        "{context} requires {expected}, got {} '{value}'",
        value.kind()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparable_kinds() {
        assert!(check_comparable(&Value::from(1), &Value::from(2)).is_ok());
        assert!(check_comparable(&Value::Missing, &Value::from("a")).is_ok());
        let err = check_comparable(&Value::from(1), &Value::from("a")).unwrap_err();
        assert!(matches!(err, FlowError::TypeError(_)));
    }

    #[test]
    fn test_check_kind() {
        assert!(check_kind(&Value::from(1.5), ValueKind::Number, "mean").is_ok());
        assert!(check_kind(&Value::Missing, ValueKind::Number, "mean").is_ok());
        let err = check_kind(&Value::from(true), ValueKind::Number, "mean").unwrap_err();
        assert_eq!(err.to_string(), "TypeError: mean requires number, got bool 'true'");
    }
}
