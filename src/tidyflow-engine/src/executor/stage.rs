//! Execution of individual stages.

use std::sync::Arc;

use common_error::{FlowError, FlowResult};
use log::debug;
use tidyflow_logical::persist::stage_to_json;
use tidyflow_logical::Stage;

use super::Runner;
use crate::dataframe::DataFrame;
use crate::host::Host;
use crate::metrics::ExecutionTimer;
use crate::plot::plot_spec;

type Frame = Option<Arc<DataFrame>>;

impl<H: Host> Runner<H> {
    /// Run one stage over the frame produced by the previous one.
    pub(super) fn run_stage(&mut self, stage: &Stage, input: Frame) -> FlowResult<Frame> {
        if self.config.record_log {
            self.log.push(stage_to_json(stage)?.to_string());
        }
        debug!("running {}", stage.pretty());

        let rows_in = input.as_ref().map_or(0, |df| df.len());
        let timer = ExecutionTimer::start();
        let output = self.apply(stage, input)?;
        let elapsed = timer.stop();

        if self.config.collect_metrics {
            let rows_out = output.as_ref().map_or(0, |df| df.len());
            self.metrics.record(stage.name(), rows_in, rows_out, elapsed);
        }
        Ok(output)
    }

    fn apply(&mut self, stage: &Stage, input: Frame) -> FlowResult<Frame> {
        let transformed = match stage {
            Stage::Read { path } => {
                let rows = self.host.get_data(path)?;
                DataFrame::new(rows)?
            }
            Stage::Join {
                left_name,
                left_col,
                right_name,
                right_col,
            } => {
                let left = self.get_result(left_name)?;
                let right = self.get_result(right_name)?;
                DataFrame::join(left_name, &left, left_col, right_name, &right, right_col)?
            }
            _ => {
                let df = input.ok_or_else(|| {
                    FlowError::execution(format!("{} stage received no data", stage.name()))
                })?;
                return self.apply_to(stage, df);
            }
        };
        Ok(Some(Arc::new(transformed)))
    }

    fn apply_to(&mut self, stage: &Stage, df: Arc<DataFrame>) -> FlowResult<Frame> {
        let frame: &DataFrame = &df;
        let transformed = match stage {
            Stage::Drop { columns } => frame.drop(columns)?,
            Stage::Select { columns } => frame.select(columns)?,
            Stage::Filter { op } => frame.filter(op)?,
            Stage::GroupBy { columns } => frame.group_by(columns)?,
            Stage::Ungroup {} => frame.ungroup()?,
            Stage::Unique { columns } => frame.unique(columns)?,
            Stage::Sort { columns, reverse } => frame.sort(columns, *reverse)?,
            Stage::Mutate { new_name, op } => frame.mutate(new_name, op)?,
            Stage::Summarize { action, column } => frame.summarize(*action, column)?,
            Stage::Notify { .. } => return Ok(Some(df)),
            _ if stage.is_plot() => {
                let spec = plot_spec(stage, frame)?;
                self.host.display_plot(&spec);
                return Ok(None);
            }
            _ if stage.is_stats() => {
                let report = self.host.compute_statistics(stage, frame)?;
                self.host.display_statistics(&report);
                return Ok(None);
            }
            other => {
                return Err(FlowError::internal(format!(
                    "{} stage cannot take input",
                    other.name()
                )))
            }
        };
        Ok(Some(Arc::new(transformed)))
    }
}
