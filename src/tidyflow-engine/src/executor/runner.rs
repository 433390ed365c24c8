//! Dependency-driven pipeline runner.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use common_config::RunnerConfig;
use common_error::{FlowError, FlowResult};
use log::{debug, info, warn};
use tidyflow_logical::{Pipeline, Program};

use crate::dataframe::DataFrame;
use crate::host::Host;
use crate::metrics::MetricsSink;

/// Opaque id of a registered pipeline.
///
/// Handles are assigned in registration order, so ordering handles orders
/// pipelines by when they were registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineHandle(u64);

impl fmt::Display for PipelineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pipeline#{}", self.0)
    }
}

/// Result of executing one pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Name the result is published under, if the pipeline ends in `notify`.
    pub name: Option<String>,
    /// Frame produced by the last stage, if it produces one.
    pub data: Option<Arc<DataFrame>>,
}

/// Scheduler and executor for a set of pipelines.
///
/// Pipelines whose first stage needs no published results are ready as soon
/// as they are registered. The others wait until every name they require
/// has been published with [`Runner::notify`]. [`Runner::run`] executes
/// ready pipelines in FIFO order; publishing a result may make more
/// pipelines ready. The first error aborts the rest of the run.
pub struct Runner<H: Host> {
    pub(super) host: H,
    pub(super) config: RunnerConfig,
    next_handle: u64,
    pipelines: HashMap<PipelineHandle, Arc<Pipeline>>,
    queue: VecDeque<PipelineHandle>,
    waiting: BTreeMap<PipelineHandle, BTreeSet<String>>,
    pub(super) results: HashMap<String, Arc<DataFrame>>,
    pub(super) log: Vec<String>,
    errors: Vec<String>,
    pub(super) metrics: MetricsSink,
}

impl<H: Host> Runner<H> {
    /// Create a runner with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, RunnerConfig::default())
    }

    /// Create a runner with a custom configuration.
    pub fn with_config(mut host: H, config: RunnerConfig) -> Self {
        host.reset();
        Self {
            host,
            config,
            next_handle: 0,
            pipelines: HashMap::new(),
            queue: VecDeque::new(),
            waiting: BTreeMap::new(),
            results: HashMap::new(),
            log: Vec::new(),
            errors: Vec::new(),
            metrics: MetricsSink::new(),
        }
    }

    /// Get the runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Get the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Get the host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Register a pipeline for the next run.
    pub fn register(&mut self, pipeline: Pipeline) -> FlowResult<PipelineHandle> {
        if pipeline.is_empty() {
            return Err(FlowError::shape("cannot register an empty pipeline"));
        }
        let handle = PipelineHandle(self.next_handle);
        self.next_handle += 1;

        let requires: BTreeSet<String> = pipeline.requires().into_iter().collect();
        self.pipelines.insert(handle, Arc::new(pipeline));
        if requires.is_empty() {
            debug!("{handle} is ready");
            self.queue.push_back(handle);
        } else {
            debug!("{handle} waits for {requires:?}");
            self.waiting.insert(handle, requires);
        }
        Ok(handle)
    }

    /// Register every pipeline of a program, in order.
    pub fn register_program(&mut self, program: &Program) -> FlowResult<Vec<PipelineHandle>> {
        program
            .pipelines()
            .iter()
            .map(|pipeline| self.register(pipeline.clone()))
            .collect()
    }

    /// Publish `data` under `name` and release pipelines waiting only on it.
    pub fn notify(&mut self, name: &str, data: Arc<DataFrame>) -> FlowResult<()> {
        if name.is_empty() {
            return Err(FlowError::invalid_parameter("cannot notify with an empty name"));
        }
        self.results.insert(name.to_string(), data);

        let released: Vec<PipelineHandle> = self
            .waiting
            .iter_mut()
            .filter_map(|(handle, pending)| {
                pending.remove(name);
                pending.is_empty().then_some(*handle)
            })
            .collect();
        for handle in released {
            self.waiting.remove(&handle);
            debug!("{handle} is ready after '{name}'");
            self.queue.push_back(handle);
        }
        Ok(())
    }

    /// Get a published result.
    pub fn get_result(&self, name: &str) -> FlowResult<Arc<DataFrame>> {
        self.results
            .get(name)
            .cloned()
            .ok_or_else(|| FlowError::result_not_found(format!("result \"{name}\" unknown")))
    }

    /// Execute one pipeline and return its output.
    ///
    /// The shape is checked before any stage runs.
    pub fn execute(&mut self, pipeline: &Pipeline) -> FlowResult<PipelineOutput> {
        pipeline.check_shape()?;
        let mut data = None;
        for stage in pipeline {
            data = self.run_stage(stage, data)?;
        }
        Ok(PipelineOutput {
            name: pipeline.produces().map(str::to_string),
            data,
        })
    }

    /// Run every ready pipeline, including those released along the way.
    ///
    /// Results, the stage log, errors and metrics from earlier runs are
    /// cleared first. Pipelines still waiting at the end never run.
    pub fn run(&mut self) {
        self.results.clear();
        self.log.clear();
        self.errors.clear();
        self.metrics.clear();
        self.host.reset();

        if let Err(err) = self.drain() {
            warn!("run aborted: {err}");
            let message = if self.config.error_detail {
                format!("{err}: {err:?}")
            } else {
                err.to_string()
            };
            self.host.display_error(Some(message.as_str()));
            self.errors.push(message);
        }

        if self.config.record_log {
            let joined = self.log.join("\n");
            self.host.display_log(Some(joined.as_str()));
        } else {
            self.host.display_log(None);
        }
    }

    fn drain(&mut self) -> FlowResult<()> {
        while let Some(handle) = self.queue.pop_front() {
            let pipeline = self
                .pipelines
                .remove(&handle)
                .ok_or_else(|| FlowError::internal(format!("{handle} is not registered")))?;
            info!("executing {handle} ({} stages)", pipeline.len());

            let output = self.execute(&pipeline)?;
            if let (Some(name), Some(data)) = (output.name, output.data) {
                self.notify(&name, Arc::clone(&data))?;
                self.host.set_result(&name, data);
            }
        }
        if !self.waiting.is_empty() {
            debug!("{} pipelines never became ready", self.waiting.len());
        }
        Ok(())
    }

    /// Errors recorded by the last run.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Persisted form of every stage executed since the last run started.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Per-stage metrics of the last run.
    pub fn metrics(&self) -> &MetricsSink {
        &self.metrics
    }

    /// Handles of ready pipelines, in execution order.
    pub fn queued(&self) -> Vec<PipelineHandle> {
        self.queue.iter().copied().collect()
    }

    /// Names each waiting pipeline still needs.
    pub fn waiting(&self) -> &BTreeMap<PipelineHandle, BTreeSet<String>> {
        &self.waiting
    }

    /// Check if a pipeline is waiting on dependencies.
    pub fn is_waiting(&self, handle: PipelineHandle) -> bool {
        self.waiting.contains_key(&handle)
    }

    /// Check if a pipeline is ready to run.
    pub fn is_queued(&self, handle: PipelineHandle) -> bool {
        self.queue.contains(&handle)
    }
}

impl<H: Host + fmt::Debug> fmt::Debug for Runner<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("queue", &self.queue)
            .field("waiting", &self.waiting)
            .field("results", &self.results.keys().collect::<Vec<_>>())
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}
