//! Type checks, conversions and datetime extraction.

use chrono::{Datelike, Timelike};

use common_error::{FlowError, FlowResult};
use tidyflow_core::types::datetime::{from_millis, parse_datetime, to_millis};
use tidyflow_core::{Value, ValueKind};
use tidyflow_logical::UnaryOp;

/// Truthiness of a present value, following the `toBool` table.
pub fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Missing => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(*n != 0.0 && !n.is_nan()),
        Value::Text(s) => Some(!s.is_empty()),
        Value::Datetime(_) => Some(true),
    }
}

/// Classify a value; never missing.
pub fn type_check(op: UnaryOp, value: &Value) -> Value {
    let expected = match op {
        UnaryOp::IsBool => ValueKind::Bool,
        UnaryOp::IsDatetime => ValueKind::Datetime,
        UnaryOp::IsNumber => ValueKind::Number,
        UnaryOp::IsText => ValueKind::Text,
        _ => ValueKind::Missing,
    };
    Value::Bool(value.kind() == expected)
}

/// Convert to boolean.
pub fn to_bool(value: &Value) -> Value {
    truthy(value).map_or(Value::Missing, Value::Bool)
}

/// Convert to number; unparseable text becomes missing.
pub fn to_number(value: &Value) -> Value {
    match value {
        Value::Missing => Value::Missing,
        Value::Bool(b) => Value::Number(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Value::Number(*n),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_or(Value::Missing, Value::number_or_missing),
        Value::Datetime(dt) => Value::Number(to_millis(dt) as f64),
    }
}

/// Convert to text using the display form.
pub fn to_text(value: &Value) -> Value {
    match value {
        Value::Missing => Value::Missing,
        Value::Text(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

/// Convert to datetime; numbers are milliseconds since the epoch.
pub fn to_datetime(value: &Value) -> Value {
    let converted = match value {
        Value::Datetime(dt) => Some(*dt),
        Value::Number(n) if n.is_finite() => from_millis(n.trunc() as i64),
        Value::Text(s) => parse_datetime(s),
        _ => None,
    };
    converted.map_or(Value::Missing, Value::Datetime)
}

/// Extract a calendar component from a datetime.
pub fn datetime_part(op: UnaryOp, value: &Value) -> FlowResult<Value> {
    let dt = match value {
        Value::Missing => return Ok(Value::Missing),
        Value::Datetime(dt) => dt,
        other => {
            return Err(FlowError::type_error(format!(
                "{op} requires a datetime, got {} '{other}'",
                other.kind()
            )))
        }
    };
    let part = match op {
        UnaryOp::Year => dt.year(),
        UnaryOp::Month => dt.month() as i32,
        UnaryOp::Day => dt.day() as i32,
        UnaryOp::Weekday => dt.weekday().num_days_from_sunday() as i32,
        UnaryOp::Hours => dt.hour() as i32,
        UnaryOp::Minutes => dt.minute() as i32,
        UnaryOp::Seconds => dt.second() as i32,
        other => {
            return Err(FlowError::internal(format!(
                "{other} is not a datetime extraction"
            )))
        }
    };
    Ok(Value::from(part))
}
