//! Inner equi-join of two named frames.

use std::collections::{BTreeSet, HashMap};

use common_error::{FlowError, FlowResult};
use tidyflow_core::{is_reserved, Row, ValueKey, JOIN_COL};

use super::DataFrame;

impl DataFrame {
    /// Join `left` and `right` where `left[left_col]` equals `right[right_col]`.
    ///
    /// Every non-key column is renamed `<table>_<column>` after the frame it
    /// came from, and the matched key is stored in the join marker column.
    /// Missing keys never match. Output order is left-major, then right.
    pub fn join(
        left_name: &str,
        left: &Self,
        left_col: &str,
        right_name: &str,
        right: &Self,
        right_col: &str,
    ) -> FlowResult<Self> {
        left.require_columns([left_col])?;
        right.require_columns([right_col])?;

        let left_columns: BTreeSet<String> = prefixed_columns(left_name, left, left_col).collect();
        let right_columns: BTreeSet<String> =
            prefixed_columns(right_name, right, right_col).collect();
        if let Some(clash) = left_columns.intersection(&right_columns).next() {
            return Err(FlowError::invalid_parameter(format!(
                "joining '{left_name}' with '{right_name}' yields column '{clash}' twice"
            )));
        }

        let mut index: HashMap<ValueKey, Vec<usize>> = HashMap::new();
        for (i, row) in right.data.iter().enumerate() {
            if let Some(value) = row.get(right_col).filter(|v| !v.is_missing()) {
                index.entry(value.key()).or_default().push(i);
            }
        }

        let mut data = Vec::new();
        for left_row in &left.data {
            let Some(key) = left_row.get(left_col).filter(|v| !v.is_missing()) else {
                continue;
            };
            let Some(matches) = index.get(&key.key()) else {
                continue;
            };
            for &i in matches {
                let mut row = Row::new();
                copy_prefixed(&mut row, left_name, left_row, left_col);
                copy_prefixed(&mut row, right_name, &right.data[i], right_col);
                row.insert(JOIN_COL.to_string(), key.clone());
                data.push(row);
            }
        }

        let mut columns = left_columns;
        columns.extend(right_columns);
        columns.insert(JOIN_COL.to_string());
        Ok(Self::from_parts(data, columns))
    }
}

fn copy_prefixed(out: &mut Row, table: &str, row: &Row, key_col: &str) {
    for (name, value) in row {
        if name != key_col && !is_reserved(name) {
            out.insert(format!("{table}_{name}"), value.clone());
        }
    }
}

fn prefixed_columns<'a>(
    table: &'a str,
    df: &'a DataFrame,
    key_col: &'a str,
) -> impl Iterator<Item = String> + 'a {
    df.columns
        .iter()
        .filter(move |name| name.as_str() != key_col && !is_reserved(name))
        .map(move |name| format!("{table}_{name}"))
}
