//! In-memory host for tests.
//!
//! [`TestHost`] serves named datasets from memory and records everything the
//! runner shows, so tests can assert on plots, statistics, logs and errors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use common_error::{FlowError, FlowResult};
use tidyflow_core::Row;
use tidyflow_logical::{Stage, SummaryOp};

use crate::dataframe::{summarize_values, DataFrame};
use crate::host::{Host, StatsReport};

/// Statistics callback used by [`TestHost`].
pub type StatsFn = Box<dyn FnMut(&Stage, &DataFrame) -> FlowResult<StatsReport>>;

/// Host that keeps datasets in memory and records what it is shown.
pub struct TestHost {
    datasets: HashMap<String, Vec<Row>>,
    stats: StatsFn,
    /// Results published during the current run.
    pub results: HashMap<String, Arc<DataFrame>>,
    /// Last chart specification shown.
    pub plot: Option<JsonValue>,
    /// Last statistics report shown.
    pub statistics: Option<StatsReport>,
    /// Last stage log shown.
    pub log: Option<String>,
    /// Last error shown.
    pub error: Option<String>,
    /// Number of times the host was reset.
    pub resets: usize,
}

impl TestHost {
    /// Create a host with no datasets.
    pub fn new() -> Self {
        Self {
            datasets: HashMap::new(),
            stats: Box::new(summary_report),
            results: HashMap::new(),
            plot: None,
            statistics: None,
            log: None,
            error: None,
            resets: 0,
        }
    }

    /// Add a dataset served under `path`.
    pub fn with_dataset(mut self, path: impl Into<String>, rows: Vec<Row>) -> Self {
        self.datasets.insert(path.into(), rows);
        self
    }

    /// Replace the statistics callback.
    pub fn with_stats<F>(mut self, stats: F) -> Self
    where
        F: FnMut(&Stage, &DataFrame) -> FlowResult<StatsReport> + 'static,
    {
        self.stats = Box::new(stats);
        self
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TestHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestHost")
            .field("datasets", &self.datasets.keys().collect::<Vec<_>>())
            .field("results", &self.results.keys().collect::<Vec<_>>())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Host for TestHost {
    fn get_data(&mut self, path: &str) -> FlowResult<Vec<Row>> {
        if path.is_empty() {
            return Err(FlowError::data_source("cannot read from an empty path"));
        }
        self.datasets
            .get(path)
            .cloned()
            .ok_or_else(|| FlowError::data_source(format!("no dataset at '{path}'")))
    }

    fn reset(&mut self) {
        self.results.clear();
        self.plot = None;
        self.statistics = None;
        self.log = None;
        self.error = None;
        self.resets += 1;
    }

    fn display_error(&mut self, message: Option<&str>) {
        self.error = message.map(str::to_string);
    }

    fn display_log(&mut self, message: Option<&str>) {
        self.log = message.map(str::to_string);
    }

    fn display_plot(&mut self, spec: &JsonValue) {
        self.plot = Some(spec.clone());
    }

    fn display_statistics(&mut self, report: &StatsReport) {
        self.statistics = Some(report.clone());
    }

    fn set_result(&mut self, name: &str, data: Arc<DataFrame>) {
        self.results.insert(name.to_string(), data);
    }

    fn compute_statistics(&mut self, test: &Stage, data: &DataFrame) -> FlowResult<StatsReport> {
        (self.stats)(test, data)
    }
}

/// Canned report: test name, sample size and mean of the tested column.
fn summary_report(test: &Stage, data: &DataFrame) -> FlowResult<StatsReport> {
    let column = match test {
        Stage::Anova { value_name, .. } | Stage::KruskalWallis { value_name, .. } => value_name,
        Stage::KolmogorovSmirnov { col_name, .. }
        | Stage::TTestOneSample { col_name, .. }
        | Stage::ZTestOneSample { col_name, .. } => col_name,
        Stage::TTestPaired { left_col, .. } => left_col,
        other => {
            return Err(FlowError::internal(format!(
                "{} is not a statistical test",
                other.name()
            )))
        }
    };
    let values = data.column(column)?;
    let mean = summarize_values(SummaryOp::Mean, &values)?;
    let present = values.iter().filter(|v| !v.is_missing()).count();
    Ok(StatsReport::new(
        json!({
            "test": test.name(),
            "n": present,
            "mean": mean.to_plain_json(),
        }),
        json!({
            "test": "name of the test",
            "n": "number of values",
            "mean": "mean of the tested column",
        }),
    ))
}
