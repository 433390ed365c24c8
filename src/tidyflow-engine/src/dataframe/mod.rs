//! Row-oriented relational tables.
//!
//! A [`DataFrame`] is an ordered list of rows plus the set of columns every
//! row carries. Every operation returns a new frame; the receiver is never
//! modified, so frames can be shared between stages and the result store
//! behind an `Arc`.
//!
//! | Operation | Module | Notes |
//! |-----------|--------|-------|
//! | `select` / `drop` / `filter` / `mutate` | here | Row order preserved |
//! | `sort` | [`sort`] | Stable, missing values last |
//! | `group_by` / `ungroup` / `unique` | [`group`] | Group ids start at 1 |
//! | `join` | [`join`] | Inner equi-join of two named frames |
//! | `summarize` | [`summarize`] | Per group when grouped |

mod group;
mod join;
mod sort;
mod summarize;

use std::collections::BTreeSet;
use std::fmt;

use common_display::truncate_string;
use common_error::{FlowError, FlowResult};
use tidyflow_core::{Row, Value, GROUP_COL};
use tidyflow_logical::Expr;

use crate::expr::ExprEvaluator;

pub use summarize::summarize_values;

/// Rows shown by the `Display` preview.
const PREVIEW_ROWS: usize = 10;

/// Widest cell shown by the `Display` preview.
const PREVIEW_WIDTH: usize = 16;

/// An immutable table of rows sharing one column set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    data: Vec<Row>,
    columns: BTreeSet<String>,
}

impl DataFrame {
    /// Create a frame from source rows.
    ///
    /// Fails with a schema error if the rows disagree about their columns.
    pub fn new(rows: Vec<Row>) -> FlowResult<Self> {
        let columns: BTreeSet<String> = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() || !row.keys().all(|k| columns.contains(k)) {
                return Err(FlowError::schema_error(format!(
                    "row {index} has columns {:?}, expected {:?}",
                    row.keys().collect::<Vec<_>>(),
                    columns
                )));
            }
        }
        Ok(Self {
            data: rows,
            columns,
        })
    }

    /// Build a frame whose rows are already known to match `columns`.
    pub(crate) fn from_parts(data: Vec<Row>, columns: BTreeSet<String>) -> Self {
        Self { data, columns }
    }

    /// Get the rows, in order.
    pub fn rows(&self) -> &[Row] {
        &self.data
    }

    /// Get the column names, including any reserved markers present.
    pub fn columns(&self) -> &BTreeSet<String> {
        &self.columns
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A frame is grouped when it carries the group marker column.
    pub fn is_grouped(&self) -> bool {
        self.has_column(GROUP_COL)
    }

    /// Column values, in row order.
    pub fn column(&self, name: &str) -> FlowResult<Vec<&Value>> {
        self.require_columns([name])?;
        Ok(self.data.iter().filter_map(|row| row.get(name)).collect())
    }

    /// Check that two frames hold the same columns and the same rows in order.
    pub fn equal(&self, other: &Self) -> bool {
        self == other
    }

    /// Keep only the named columns. Reserved marker columns are carried along.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> FlowResult<Self> {
        self.require_columns(columns.iter().map(|c| c.as_ref()))?;
        let mut keep: BTreeSet<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        keep.extend(
            self.columns
                .iter()
                .filter(|c| tidyflow_core::is_reserved(c))
                .cloned(),
        );
        let data = self
            .data
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|(k, _)| keep.contains(*k))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .collect();
        Ok(Self::from_parts(data, keep))
    }

    /// Remove the named columns.
    pub fn drop<S: AsRef<str>>(&self, columns: &[S]) -> FlowResult<Self> {
        self.require_columns(columns.iter().map(|c| c.as_ref()))?;
        let mut data = self.data.clone();
        let mut remaining = self.columns.clone();
        for column in columns {
            let column = column.as_ref();
            remaining.remove(column);
            for row in &mut data {
                row.remove(column);
            }
        }
        Ok(Self::from_parts(data, remaining))
    }

    /// Keep the rows for which `predicate` is exactly `true`.
    pub fn filter(&self, predicate: &Expr) -> FlowResult<Self> {
        let evaluator = ExprEvaluator::new();
        let mut data = Vec::with_capacity(self.data.len());
        for row in &self.data {
            if evaluator.evaluate_predicate(predicate, row)? {
                data.push(row.clone());
            }
        }
        Ok(Self::from_parts(data, self.columns.clone()))
    }

    /// Add or replace `new_name` with the value of `expr` for each row.
    pub fn mutate(&self, new_name: &str, expr: &Expr) -> FlowResult<Self> {
        let evaluator = ExprEvaluator::new();
        let mut data = Vec::with_capacity(self.data.len());
        for row in &self.data {
            let value = evaluator.evaluate(expr, row)?;
            let mut row = row.clone();
            row.insert(new_name.to_string(), value);
            data.push(row);
        }
        let mut columns = self.columns.clone();
        columns.insert(new_name.to_string());
        Ok(Self::from_parts(data, columns))
    }

    /// Fail with `ColumnNotFound` for the first name the frame lacks.
    pub(crate) fn require_columns<'a, I>(&self, names: I) -> FlowResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            if !self.has_column(name) {
                return Err(FlowError::column_not_found(format!(
                    "{name} (available: {})",
                    self.columns.iter().cloned().collect::<Vec<_>>().join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Convert the rows to plain JSON objects for hosts.
    pub fn to_json_rows(&self) -> Vec<serde_json::Value> {
        self.data
            .iter()
            .map(|row| {
                serde_json::Value::Object(
                    row.iter()
                        .map(|(k, v)| (k.clone(), v.to_plain_json()))
                        .collect(),
                )
            })
            .collect()
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = self
            .columns
            .iter()
            .map(|c| truncate_string(c, PREVIEW_WIDTH))
            .collect();
        writeln!(f, "{}", header.join(" | "))?;
        for row in self.data.iter().take(PREVIEW_ROWS) {
            let cells: Vec<String> = self
                .columns
                .iter()
                .map(|c| {
                    let cell = row.get(c).map(ToString::to_string).unwrap_or_default();
                    truncate_string(&cell, PREVIEW_WIDTH)
                })
                .collect();
            writeln!(f, "{}", cells.join(" | "))?;
        }
        if self.data.len() > PREVIEW_ROWS {
            writeln!(f, "... {} more rows", self.data.len() - PREVIEW_ROWS)?;
        }
        Ok(())
    }
}
