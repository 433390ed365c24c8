//! Runtime value representation.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::datetime::{format_datetime, parse_datetime};
use super::ValueKind;

/// Largest magnitude at which every integer is exactly representable in `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Key used to persist datetime constants as `{"datetime": "..."}`.
const DATETIME_TAG: &str = "datetime";

/// A single table cell.
///
/// `Missing` is the sentinel for absent or unknown data and propagates through
/// nearly every operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent or unknown value.
    #[default]
    Missing,
    /// Boolean value.
    Bool(bool),
    /// Double-precision number.
    Number(f64),
    /// UTF-8 text.
    Text(String),
    /// UTC date and time.
    Datetime(NaiveDateTime),
}

/// Hashable identity of a [`Value`], used for grouping, deduplication and joins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    /// Missing value.
    Missing,
    /// Boolean value.
    Bool(bool),
    /// Bit pattern of a number (negative zero folded into zero).
    Number(u64),
    /// Text value.
    Text(String),
    /// Datetime value.
    Datetime(NaiveDateTime),
}

impl Value {
    /// Semantic kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Missing => ValueKind::Missing,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::Text(_) => ValueKind::Text,
            Self::Datetime(_) => ValueKind::Datetime,
        }
    }

    /// Check if this value is missing.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Try to get as boolean.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as number.
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as datetime.
    pub const fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Datetime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Wrap a number, mapping non-finite results to `Missing`.
    pub fn number_or_missing(n: f64) -> Self {
        if n.is_finite() {
            Self::Number(n)
        } else {
            Self::Missing
        }
    }

    /// Hashable key for this value.
    pub fn key(&self) -> ValueKey {
        match self {
            Self::Missing => ValueKey::Missing,
            Self::Bool(b) => ValueKey::Bool(*b),
            Self::Number(n) => {
                let n = if *n == 0.0 { 0.0 } else { *n };
                ValueKey::Number(n.to_bits())
            }
            Self::Text(s) => ValueKey::Text(s.clone()),
            Self::Datetime(dt) => ValueKey::Datetime(*dt),
        }
    }

    /// Order two present values of the same kind.
    ///
    /// Returns `None` when either value is missing, the kinds differ, or a
    /// number is NaN.
    pub fn cmp_same_kind(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Datetime(a), Self::Datetime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting.
    ///
    /// Numbers follow `f64::total_cmp`, so NaN sorts after every other number.
    /// Missing sorts last and values of different kinds order by kind.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Missing, Self::Missing) => Ordering::Equal,
            (Self::Missing, _) => Ordering::Greater,
            (_, Self::Missing) => Ordering::Less,
            _ => self
                .cmp_same_kind(other)
                .unwrap_or_else(|| self.kind().cmp(&other.kind())),
        }
    }

    /// Convert to plain JSON for hosts (datetimes become RFC 3339 strings).
    pub fn to_plain_json(&self) -> serde_json::Value {
        match self {
            Self::Missing => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Datetime(dt) => serde_json::Value::String(format_datetime(dt)),
        }
    }
}

/// Render a number as JSON, writing integral values as JSON integers.
pub fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        #[allow(clippy::cast_possible_truncation)]
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

/// Serialize a number so that integral values are written without a fraction.
///
/// Used for numeric stage parameters so persisted documents round-trip exactly.
pub fn serialize_number<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        #[allow(clippy::cast_possible_truncation)]
        serializer.serialize_i64(*n as i64)
    } else {
        serializer.serialize_f64(*n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "MISSING"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
                    #[allow(clippy::cast_possible_truncation)]
                    let whole = *n as i64;
                    write!(f, "{whole}")
                } else {
                    write!(f, "{n}")
                }
            }
            Self::Text(s) => write!(f, "{s}"),
            Self::Datetime(dt) => write!(f, "{}", format_datetime(dt)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Missing => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serialize_number(n, serializer),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Datetime(dt) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(DATETIME_TAG, &format_datetime(dt))?;
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, a boolean, a number, a string, or {\"datetime\": \"...\"}")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Missing)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let Some((key, text)) = map.next_entry::<String, String>()? else {
            return Err(de::Error::custom("empty object is not a value"));
        };
        if key != DATETIME_TAG {
            return Err(de::Error::unknown_field(&key, &[DATETIME_TAG]));
        }
        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom("datetime object must have a single field"));
        }
        let dt = parse_datetime(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid datetime '{text}'")))?;
        // Only the canonical form is accepted so saved documents write back unchanged.
        let canonical = format_datetime(&dt);
        if canonical != text {
            return Err(de::Error::custom(format!(
                "datetime '{text}' is not in canonical form '{canonical}'"
            )));
        }
        Ok(Value::Datetime(dt))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Datetime(dt)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn concert() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1983, 12, 2)
            .and_then(|d| d.and_hms_opt(7, 55, 19))
            .unwrap()
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(42).as_number(), Some(42.0));
        assert_eq!(Value::from("hello").as_text(), Some("hello"));
        assert_eq!(Value::from(None::<bool>), Value::Missing);
        assert!(Value::Missing.is_missing());
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(Value::Missing.kind(), ValueKind::Missing);
        assert_eq!(Value::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(Value::Number(1.5).kind(), ValueKind::Number);
        assert_eq!(Value::Datetime(concert()).kind(), ValueKind::Datetime);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(-123.0).to_string(), "-123");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(
            Value::Datetime(concert()).to_string(),
            "1983-12-02T07:55:19.000Z"
        );
    }

    #[test]
    fn test_keys_fold_negative_zero() {
        assert_eq!(Value::Number(0.0).key(), Value::Number(-0.0).key());
        assert_ne!(Value::Number(1.0).key(), Value::Text("1".into()).key());
    }

    #[test]
    fn test_cmp_same_kind() {
        assert_eq!(
            Value::from("abc").cmp_same_kind(&Value::from("pqr")),
            Some(Ordering::Less)
        );
        assert_eq!(Value::from(1).cmp_same_kind(&Value::from("1")), None);
        assert_eq!(Value::Missing.cmp_same_kind(&Value::Missing), None);
    }

    #[test]
    fn test_total_cmp_places_nan_and_missing_last() {
        let mut values = vec![
            Value::Missing,
            Value::Number(f64::NAN),
            Value::from(3),
            Value::from(-1),
        ];
        values.sort_by(Value::total_cmp);
        assert_eq!(values[0], Value::from(-1));
        assert_eq!(values[1], Value::from(3));
        assert!(values[2].as_number().is_some_and(f64::is_nan));
        assert!(values[3].is_missing());
        assert_eq!(
            Value::Number(f64::NAN).total_cmp(&Value::Number(f64::NAN)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_json_representation() {
        assert_eq!(serde_json::to_value(Value::Number(123.0)).unwrap(), json!(123));
        assert_eq!(serde_json::to_value(Value::Number(0.5)).unwrap(), json!(0.5));
        assert_eq!(serde_json::to_value(Value::Missing).unwrap(), json!(null));
        assert_eq!(
            serde_json::to_value(Value::Datetime(concert())).unwrap(),
            json!({"datetime": "1983-12-02T07:55:19.000Z"})
        );
    }

    #[test]
    fn test_json_parsing() {
        let parsed: Value = serde_json::from_value(json!("something")).unwrap();
        assert_eq!(parsed, Value::from("something"));
        let parsed: Value = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(parsed, Value::Missing);
        let parsed: Value =
            serde_json::from_value(json!({"datetime": "1983-12-02T07:55:19.000Z"})).unwrap();
        assert_eq!(parsed, Value::Datetime(concert()));
        assert!(serde_json::from_value::<Value>(json!({"date": "1983-12-02"})).is_err());
        assert!(serde_json::from_value::<Value>(json!([1, 2])).is_err());
    }

    #[test]
    fn test_datetime_json_must_be_canonical() {
        for text in ["1983-12-02T07:55:19Z", "1983-12-02", "1983-12-02T09:55:19.000+02:00"] {
            let err = serde_json::from_value::<Value>(json!({ "datetime": text })).unwrap_err();
            assert!(err.to_string().contains("canonical"), "{text}: {err}");
        }
        let json = json!({"datetime": "1983-12-02T07:55:19.000Z"});
        let parsed: Value = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json);
    }
}
