//! Rows and reserved column names.

use std::collections::BTreeMap;

use crate::types::Value;

/// A single table row: column name to cell.
pub type Row = BTreeMap<String, Value>;

/// Reserved column holding the group identifier of a grouped frame.
pub const GROUP_COL: &str = "_group_";

/// Reserved column holding the matched key of a join result.
pub const JOIN_COL: &str = "_join_";

/// Whether a column name is one of the reserved markers.
pub fn is_reserved(name: &str) -> bool {
    name == GROUP_COL || name == JOIN_COL
}

/// Build a row from `(column, value)` pairs.
pub fn make_row<K, V, I>(pairs: I) -> Row
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Build rows from a column header and value tuples laid out in header order.
///
/// Extra values are ignored; short tuples leave the trailing columns missing.
pub fn rows_from<S: AsRef<str>>(columns: &[S], data: Vec<Vec<Value>>) -> Vec<Row> {
    data.into_iter()
        .map(|values| {
            let mut values = values.into_iter();
            columns
                .iter()
                .map(|c| (c.as_ref().to_string(), values.next().unwrap_or_default()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved(GROUP_COL));
        assert!(is_reserved(JOIN_COL));
        assert!(!is_reserved("group"));
    }

    #[test]
    fn test_rows_from_pads_missing() {
        let rows = rows_from(&["a", "b"], vec![vec![Value::from(1)], vec![]]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], Value::from(1));
        assert_eq!(rows[0]["b"], Value::Missing);
        assert_eq!(rows[1]["a"], Value::Missing);
    }

    #[test]
    fn test_make_row() {
        let row = make_row([("name", Value::from("red")), ("red", Value::from(255))]);
        assert_eq!(row.len(), 2);
        assert_eq!(row["name"].as_text(), Some("red"));
    }
}
