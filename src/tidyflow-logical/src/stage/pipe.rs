//! Builders for data stages.
//!
//! Each builder validates its parameters and fails with
//! `FlowError::InvalidParameter` before any pipeline runs.

use common_error::FlowResult;

use super::{Stage, SummaryOp};
use crate::expr::Expr;

fn names<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).collect()
}

/// Read rows from the host's data source.
pub fn read(path: impl Into<String>) -> FlowResult<Stage> {
    Stage::Read { path: path.into() }.checked()
}

/// Drop columns.
pub fn drop<I, S>(columns: I) -> FlowResult<Stage>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Stage::Drop {
        columns: names(columns),
    }
    .checked()
}

/// Select columns.
pub fn select<I, S>(columns: I) -> FlowResult<Stage>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Stage::Select {
        columns: names(columns),
    }
    .checked()
}

/// Filter rows.
pub fn filter(op: Expr) -> FlowResult<Stage> {
    Stage::Filter { op }.checked()
}

/// Group rows by distinct key combinations.
pub fn group_by<I, S>(columns: I) -> FlowResult<Stage>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Stage::GroupBy {
        columns: names(columns),
    }
    .checked()
}

/// Remove grouping.
pub fn ungroup() -> FlowResult<Stage> {
    Ok(Stage::Ungroup {})
}

/// Keep the first row for each distinct key.
pub fn unique<I, S>(columns: I) -> FlowResult<Stage>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Stage::Unique {
        columns: names(columns),
    }
    .checked()
}

/// Sort rows, optionally in descending order.
pub fn sort<I, S>(columns: I, reverse: bool) -> FlowResult<Stage>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Stage::Sort {
        columns: names(columns),
        reverse,
    }
    .checked()
}

/// Add or replace a column.
pub fn mutate(new_name: impl Into<String>, op: Expr) -> FlowResult<Stage> {
    Stage::Mutate {
        new_name: new_name.into(),
        op,
    }
    .checked()
}

/// Join two published results on equal key values.
pub fn join(
    left_name: impl Into<String>,
    left_col: impl Into<String>,
    right_name: impl Into<String>,
    right_col: impl Into<String>,
) -> FlowResult<Stage> {
    Stage::Join {
        left_name: left_name.into(),
        left_col: left_col.into(),
        right_name: right_name.into(),
        right_col: right_col.into(),
    }
    .checked()
}

/// Publish the incoming frame under `label`.
pub fn notify(label: impl Into<String>) -> FlowResult<Stage> {
    Stage::Notify {
        label: label.into(),
    }
    .checked()
}

/// Add a `<column>_<action>` summary column.
pub fn summarize(action: SummaryOp, column: impl Into<String>) -> FlowResult<Stage> {
    Stage::Summarize {
        action,
        column: column.into(),
    }
    .checked()
}
