//! Testing utilities and fixtures shared by the Tidyflow crates.
//!
//! Each fixture returns plain rows so callers can wrap them in whatever table
//! type they are testing.

use chrono::NaiveDate;

use crate::row::{rows_from, Row};
use crate::types::Value;

const M: Value = Value::Missing;

fn n(v: i32) -> Value {
    Value::from(v)
}

fn t(s: &str) -> Value {
    Value::from(s)
}

/// Two numeric columns `left` and `right` with scattered missing values.
pub fn number_rows() -> Vec<Row> {
    rows_from(
        &["left", "right"],
        vec![
            vec![n(2), n(2)],
            vec![n(5), n(2)],
            vec![n(2), n(0)],
            vec![M, n(3)],
            vec![n(4), M],
            vec![M, M],
        ],
    )
}

/// Two text columns `left` and `right` with scattered missing values.
pub fn string_rows() -> Vec<Row> {
    rows_from(
        &["left", "right"],
        vec![
            vec![t("abc"), t("abc")],
            vec![t("abc"), t("def")],
            vec![t("def"), t("abc")],
            vec![t("pqr"), t("def")],
            vec![M, t("abc")],
            vec![t("abc"), M],
            vec![M, M],
        ],
    )
}

/// Personal and family names.
pub fn name_rows() -> Vec<Row> {
    rows_from(
        &["personal", "family"],
        vec![
            vec![t("Jackson"), t("Ahmed")],
            vec![t("Hannah"), t("Brown")],
            vec![t("Anil"), t("Chatterjee")],
            vec![t("Hannah"), t("Dubois")],
        ],
    )
}

/// One fully populated row of every kind followed by an all-missing row.
pub fn mixed_rows() -> Vec<Row> {
    let date = NaiveDate::from_ymd_opt(1983, 12, 2)
        .and_then(|d| d.and_hms_opt(7, 55, 19))
        .map_or(Value::Missing, Value::Datetime);
    rows_from(
        &["bool", "num", "str", "date"],
        vec![
            vec![Value::Bool(true), Value::Number(-1.5), t("abc"), date],
            vec![M, M, M, M],
        ],
    )
}

/// Web colour names with their red, green and blue components.
pub fn color_rows() -> Vec<Row> {
    let colors: [(&str, i32, i32, i32); 11] = [
        ("black", 0, 0, 0),
        ("red", 255, 0, 0),
        ("maroon", 128, 0, 0),
        ("lime", 0, 255, 0),
        ("green", 0, 128, 0),
        ("blue", 0, 0, 255),
        ("navy", 0, 0, 128),
        ("yellow", 255, 255, 0),
        ("fuchsia", 255, 0, 255),
        ("aqua", 0, 255, 255),
        ("white", 255, 255, 255),
    ];
    rows_from(
        &["name", "red", "green", "blue"],
        colors
            .iter()
            .map(|&(name, r, g, b)| vec![t(name), n(r), n(g), n(b)])
            .collect(),
    )
}

/// Column values of `rows`, in row order.
pub fn column_values(rows: &[Row], column: &str) -> Vec<Value> {
    rows.iter()
        .map(|row| row.get(column).cloned().unwrap_or_default())
        .collect()
}
