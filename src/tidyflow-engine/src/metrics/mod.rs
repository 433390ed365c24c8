//! Metrics collection for pipeline execution.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::{Duration, Instant};

/// Metrics for one kind of stage, accumulated over every invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageMetrics {
    /// Number of input rows processed.
    pub rows_in: u64,
    /// Number of output rows produced.
    pub rows_out: u64,
    /// Total execution time.
    pub exec_time: Duration,
    /// Number of times the stage ran.
    pub invocations: u64,
}

impl StageMetrics {
    /// Create new metrics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows_in: 0,
            rows_out: 0,
            exec_time: Duration::new(0, 0),
            invocations: 0,
        }
    }

    /// Add rows processed.
    pub fn add_rows_in(&mut self, count: usize) {
        self.rows_in += count as u64;
    }

    /// Add rows produced.
    pub fn add_rows_out(&mut self, count: usize) {
        self.rows_out += count as u64;
    }

    /// Add execution time.
    pub fn add_time(&mut self, duration: Duration) {
        self.exec_time += duration;
    }

    /// Increment invocation count.
    pub fn add_invocation(&mut self) {
        self.invocations += 1;
    }

    /// Get selectivity (`rows_out` / `rows_in`).
    pub fn selectivity(&self) -> f64 {
        if self.rows_in == 0 {
            1.0
        } else {
            self.rows_out as f64 / self.rows_in as f64
        }
    }
}

impl std::fmt::Display for StageMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rows_in={}, rows_out={}, time={:?}, invocations={}",
            self.rows_in, self.rows_out, self.exec_time, self.invocations
        )
    }
}

/// Sink for collecting stage metrics, keyed by stage name.
#[derive(Debug, Clone, Default)]
pub struct MetricsSink {
    metrics: BTreeMap<String, StageMetrics>,
}

impl MetricsSink {
    /// Create a new metrics sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one stage invocation.
    pub fn record(&mut self, stage: &str, rows_in: usize, rows_out: usize, elapsed: Duration) {
        self.update(stage, |m| {
            m.add_rows_in(rows_in);
            m.add_rows_out(rows_out);
            m.add_time(elapsed);
            m.add_invocation();
        });
    }

    /// Update metrics for a stage using a closure.
    pub fn update<F>(&mut self, stage: &str, f: F)
    where
        F: FnOnce(&mut StageMetrics),
    {
        f(self.metrics.entry(stage.to_string()).or_default());
    }

    /// Get metrics for a stage.
    pub fn get(&self, stage: &str) -> Option<&StageMetrics> {
        self.metrics.get(stage)
    }

    /// Get all metrics, ordered by stage name.
    pub fn all(&self) -> &BTreeMap<String, StageMetrics> {
        &self.metrics
    }

    /// Clear all metrics.
    pub fn clear(&mut self) {
        self.metrics.clear();
    }

    /// Get total rows processed across all stages.
    pub fn total_rows_in(&self) -> u64 {
        self.metrics.values().map(|m| m.rows_in).sum()
    }

    /// Get total execution time across all stages.
    pub fn total_time(&self) -> Duration {
        self.metrics.values().map(|m| m.exec_time).sum()
    }

    /// Format metrics as one line per stage.
    pub fn report(&self) -> String {
        let mut output = String::new();

        for (stage, m) in &self.metrics {
            let _ = writeln!(output, "{stage}: {m}");
        }

        if output.is_empty() {
            output.push_str("No metrics collected.\n");
        }

        output
    }
}

/// Timer for measuring stage execution time.
#[derive(Debug)]
pub struct ExecutionTimer {
    start: Instant,
}

impl ExecutionTimer {
    /// Start a new timer.
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time without stopping.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop and return elapsed time.
    #[must_use]
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for ExecutionTimer {
    fn default() -> Self {
        Self::start()
    }
}
