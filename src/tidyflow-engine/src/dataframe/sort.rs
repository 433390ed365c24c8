//! Stable multi-key sorting.

use std::cmp::Ordering;

use common_error::{FlowError, FlowResult};
use tidyflow_core::{Value, ValueKind};

use super::DataFrame;

impl DataFrame {
    /// Sort rows by `columns`, left to right.
    ///
    /// Missing values sort after every present value, also when `reverse`
    /// is set. Ties keep their original order. Each key column must hold a
    /// single kind of present value.
    pub fn sort<S: AsRef<str>>(&self, columns: &[S], reverse: bool) -> FlowResult<Self> {
        let keys: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
        self.require_columns(keys.iter().copied())?;
        for key in &keys {
            self.check_sortable(key)?;
        }

        let mut data = self.data.clone();
        data.sort_by(|left, right| {
            keys.iter()
                .map(|key| {
                    let missing = Value::Missing;
                    let l = left.get(*key).unwrap_or(&missing);
                    let r = right.get(*key).unwrap_or(&missing);
                    compare_cells(l, r, reverse)
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        Ok(Self::from_parts(data, self.columns.clone()))
    }

    fn check_sortable(&self, column: &str) -> FlowResult<()> {
        let mut seen: Option<ValueKind> = None;
        for value in self.data.iter().filter_map(|row| row.get(column)) {
            if value.is_missing() {
                continue;
            }
            match seen {
                None => seen = Some(value.kind()),
                Some(kind) if kind != value.kind() => {
                    return Err(FlowError::type_error(format!(
                        "cannot sort column '{column}' holding both {kind} and {} values",
                        value.kind()
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

fn compare_cells(left: &Value, right: &Value, reverse: bool) -> Ordering {
    match (left.is_missing(), right.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = left.total_cmp(right);
            if reverse {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidyflow_core::testing::{color_rows, column_values, number_rows};
    use tidyflow_core::{make_row, rows_from};

    fn texts(values: &[Option<&str>]) -> Vec<Value> {
        values
            .iter()
            .map(|v| v.map_or(Value::Missing, Value::from))
            .collect()
    }

    #[test]
    fn test_missing_sorts_last() {
        let rows = rows_from(
            &["name"],
            vec![
                vec![Value::from("pqr")],
                vec![Value::Missing],
                vec![Value::from("abc")],
            ],
        );
        let df = DataFrame::new(rows).unwrap();

        let sorted = df.sort(&["name"], false).unwrap();
        assert_eq!(
            column_values(sorted.rows(), "name"),
            texts(&[Some("abc"), Some("pqr"), None])
        );

        let reversed = df.sort(&["name"], true).unwrap();
        assert_eq!(
            column_values(reversed.rows(), "name"),
            texts(&[Some("pqr"), Some("abc"), None])
        );
    }

    #[test]
    fn test_nan_sorts_after_numbers() {
        let rows = rows_from(
            &["x", "id"],
            vec![
                vec![Value::Number(f64::NAN), Value::from("nan")],
                vec![Value::from(2), Value::from("two")],
                vec![Value::Missing, Value::from("missing")],
                vec![Value::from(1), Value::from("one")],
            ],
        );
        let df = DataFrame::new(rows).unwrap();
        let sorted = df.sort(&["x"], false).unwrap();
        assert_eq!(
            column_values(sorted.rows(), "id"),
            texts(&[Some("one"), Some("two"), Some("nan"), Some("missing")])
        );
    }

    #[test]
    fn test_multi_key_sort_is_stable() {
        let df = DataFrame::new(color_rows()).unwrap();
        let sorted = df.sort(&["red", "green"], false).unwrap();
        let names: Vec<Value> = column_values(sorted.rows(), "name");
        assert_eq!(
            names,
            [
                "black", "blue", "navy", "green", "lime", "aqua", "maroon", "red", "fuchsia",
                "yellow", "white"
            ]
            .into_iter()
            .map(Value::from)
            .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_numbers_with_missing() {
        let df = DataFrame::new(number_rows()).unwrap();
        let sorted = df.sort(&["left", "right"], false).unwrap();
        let pairs: Vec<(Value, Value)> = sorted
            .rows()
            .iter()
            .map(|row| (row["left"].clone(), row["right"].clone()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Value::from(2), Value::from(0)),
                (Value::from(2), Value::from(2)),
                (Value::from(4), Value::Missing),
                (Value::from(5), Value::from(2)),
                (Value::Missing, Value::from(3)),
                (Value::Missing, Value::Missing),
            ]
        );
    }

    #[test]
    fn test_mixed_kinds_rejected() {
        let df = DataFrame::new(vec![
            make_row([("x", Value::from(1))]),
            make_row([("x", Value::from("a"))]),
        ])
        .unwrap();
        let err = df.sort(&["x"], false).unwrap_err();
        assert!(matches!(err, FlowError::TypeError(_)));
    }

    #[test]
    fn test_unknown_column() {
        let df = DataFrame::new(color_rows()).unwrap();
        assert!(matches!(
            df.sort(&["nope"], false).unwrap_err(),
            FlowError::ColumnNotFound(_)
        ));
    }
}
