//! Host environment trait.
//!
//! The runner never talks to files, screens or statistics libraries itself.
//! Everything outside the engine is reached through a [`Host`] passed to the
//! runner at construction.
//!
//! # Contract
//!
//! - `get_data` is the only way rows enter a run
//! - Display hooks are notifications; their failure cannot abort a run
//! - `compute_statistics` is the statistics collaborator; the engine only
//!   forwards the report it returns

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use common_error::{FlowError, FlowResult};
use tidyflow_core::Row;
use tidyflow_logical::Stage;

use crate::dataframe::DataFrame;

/// Result of a statistical test, as handed to the host for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    /// Named result values (statistic, p-value, decision, ...).
    pub result: JsonValue,
    /// Human-readable description of each result entry.
    pub legend: JsonValue,
}

impl StatsReport {
    /// Create a new report.
    pub fn new(result: JsonValue, legend: JsonValue) -> Self {
        Self { result, legend }
    }
}

/// Environment that embeds the runner.
pub trait Host {
    /// Supply the rows stored under `path`.
    fn get_data(&mut self, path: &str) -> FlowResult<Vec<Row>>;

    /// Clear whatever the host shows before a new run.
    fn reset(&mut self) {}

    /// Show the error of the last run, or clear it with `None`.
    fn display_error(&mut self, _message: Option<&str>) {}

    /// Show the stage log of the last run, or clear it with `None`.
    fn display_log(&mut self, _message: Option<&str>) {}

    /// Show a chart specification.
    fn display_plot(&mut self, _spec: &JsonValue) {}

    /// Show the report of a statistical test.
    fn display_statistics(&mut self, _report: &StatsReport) {}

    /// Show a result published under `name`.
    fn set_result(&mut self, _name: &str, _data: Arc<DataFrame>) {}

    /// Run the statistical test described by `test` over `data`.
    fn compute_statistics(&mut self, test: &Stage, _data: &DataFrame) -> FlowResult<StatsReport> {
        Err(FlowError::execution(format!(
            "host cannot compute {} statistics",
            test.name()
        )))
    }
}

impl<H: Host + ?Sized> Host for Box<H> {
    fn get_data(&mut self, path: &str) -> FlowResult<Vec<Row>> {
        (**self).get_data(path)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn display_error(&mut self, message: Option<&str>) {
        (**self).display_error(message);
    }

    fn display_log(&mut self, message: Option<&str>) {
        (**self).display_log(message);
    }

    fn display_plot(&mut self, spec: &JsonValue) {
        (**self).display_plot(spec);
    }

    fn display_statistics(&mut self, report: &StatsReport) {
        (**self).display_statistics(report);
    }

    fn set_result(&mut self, name: &str, data: Arc<DataFrame>) {
        (**self).set_result(name, data);
    }

    fn compute_statistics(&mut self, test: &Stage, data: &DataFrame) -> FlowResult<StatsReport> {
        (**self).compute_statistics(test, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidyflow_logical::stage::stats;

    struct Bare;

    impl Host for Bare {
        fn get_data(&mut self, path: &str) -> FlowResult<Vec<Row>> {
            Err(FlowError::data_source(path))
        }
    }

    #[test]
    fn test_default_statistics_fail() {
        let mut host = Bare;
        let test = stats::t_test_one_sample(0.0, 0.05, "x").unwrap();
        let err = host
            .compute_statistics(&test, &DataFrame::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "ExecutionError: host cannot compute TTestOneSample statistics"
        );
    }

    #[test]
    fn test_boxed_host_forwards() {
        let mut host: Box<dyn Host> = Box::new(Bare);
        let err = host.get_data("colors.csv").unwrap_err();
        assert!(matches!(err, FlowError::DataSource(_)));
    }
}
