//! Summary columns.


use common_error::{FlowError, FlowResult};
use tidyflow_core::{check_kind, Value, ValueKind};
use tidyflow_logical::SummaryOp;

use super::DataFrame;

impl DataFrame {
    /// Add `<column>_<action>` holding the summary of `column`.
    ///
    /// Grouped frames are summarized per group and each row receives its
    /// group's value; ungrouped frames are summarized once.
    pub fn summarize(&self, action: SummaryOp, column: &str) -> FlowResult<Self> {
        self.require_columns([column])?;
        let target = format!("{column}_{}", action.as_str());

        let mut data = self.data.clone();
        for members in self.partition() {
            let values: Vec<&Value> = members
                .iter()
                .filter_map(|&i| self.data[i].get(column))
                .collect();
            let summary = summarize_values(action, &values)?;
            for &i in &members {
                data[i].insert(target.clone(), summary.clone());
            }
        }

        let mut columns = self.columns.clone();
        columns.insert(target);
        Ok(Self::from_parts(data, columns))
    }
}

/// Compute one summary over a list of cells.
///
/// `count` counts every cell. The other summaries skip missing cells and
/// yield missing when nothing is left.
pub fn summarize_values(action: SummaryOp, values: &[&Value]) -> FlowResult<Value> {
    if action == SummaryOp::Count {
        return Ok(Value::from(values.len() as f64));
    }
    let present: Vec<&Value> = values.iter().copied().filter(|v| !v.is_missing()).collect();
    if present.is_empty() {
        return Ok(Value::Missing);
    }

    match action {
        SummaryOp::Maximum | SummaryOp::Minimum | SummaryOp::Median => {
            let mut ordered = ordered_values(action, present)?;
            let picked = match action {
                SummaryOp::Maximum => ordered.pop(),
                SummaryOp::Minimum => ordered.first().copied(),
                _ => ordered.get(ordered.len() / 2).copied(),
            };
            Ok(picked.cloned().unwrap_or_default())
        }
        _ => {
            let numbers = numeric_values(action, &present)?;
            let count = numbers.len() as f64;
            let sum: f64 = numbers.iter().sum();
            let mean = sum / count;
            let variance = numbers.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / count;
            let result = match action {
                SummaryOp::Sum => sum,
                SummaryOp::Mean => mean,
                SummaryOp::Variance => variance,
                _ => variance.sqrt(),
            };
            Ok(Value::number_or_missing(result))
        }
    }
}

/// Present values sorted ascending; all must share one ordered kind.
fn ordered_values(action: SummaryOp, mut present: Vec<&Value>) -> FlowResult<Vec<&Value>> {
    let kind = present[0].kind();
    if !kind.is_ordered() {
        return Err(FlowError::type_error(format!(
            "{} requires ordered values, got {kind}",
            action.as_str()
        )));
    }
    for value in &present {
        check_kind(value, kind, action.as_str())?;
    }
    present.sort_by(|a, b| a.total_cmp(b));
    Ok(present)
}

fn numeric_values(action: SummaryOp, present: &[&Value]) -> FlowResult<Vec<f64>> {
    present
        .iter()
        .map(|value| {
            check_kind(value, ValueKind::Number, action.as_str())?;
            Ok(value.as_number().unwrap_or_default())
        })
        .collect()
}
