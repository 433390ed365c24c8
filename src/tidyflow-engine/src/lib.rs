//! Execution engine for Tidyflow.
//!
//! This crate runs pipelines built with `tidyflow-logical`. It evaluates
//! expressions row by row, implements the relational operations behind each
//! stage on an immutable [`DataFrame`], and schedules pipelines so that each
//! one runs only after the results it joins have been published.

#![allow(clippy::missing_const_for_fn)] // Builder patterns often can't be const
#![allow(clippy::return_self_not_must_use)] // Builder patterns don't always need must_use
#![allow(clippy::doc_markdown)] // Documentation backticks are sometimes unnecessary
#![allow(
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)] // Some casts are intentional
#![allow(clippy::module_name_repetitions)] // DataFrame lives in dataframe
#![allow(clippy::should_implement_trait)] // DataFrame::drop is a relational drop, not Drop
#![allow(clippy::option_if_let_else)] // if let/else is sometimes clearer than map_or
#![allow(clippy::match_same_arms)] // Some match arms intentionally have same body
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │     Pipeline     │ ──▶ │      Runner      │ ──▶ │       Host       │
//! │ tidyflow-logical │     │ queue + waiting  │     │  data, display   │
//! └──────────────────┘     └──────────────────┘     └──────────────────┘
//!                                   │
//!                                   ▼
//!                        DataFrame + ExprEvaluator
//! ```
//!
//! # Key Components
//!
//! - [`expr::ExprEvaluator`]: Three-valued evaluation of expressions
//! - [`DataFrame`]: Select, drop, filter, sort, group, unique, join, mutate,
//!   summarize
//! - [`plot`]: Chart specifications handed to the host
//! - [`Host`]: Data source and display collaborator
//! - [`Runner`]: Registration, `notify`, `execute` and `run`
//! - [`MetricsSink`]: Per-stage row counts and timings
//!
//! # Example
//!
//! ```rust
//! use tidyflow_core::testing::color_rows;
//! use tidyflow_engine::testing::TestHost;
//! use tidyflow_engine::Runner;
//! use tidyflow_logical::stage::pipe;
//! use tidyflow_logical::{col, lit, PipelineBuilder};
//!
//! let host = TestHost::new().with_dataset("colors.csv", color_rows());
//! let mut runner = Runner::new(host);
//! let pipeline = PipelineBuilder::start(pipe::read("colors.csv"))
//!     .then(pipe::filter(col("red").eq(lit(255))))
//!     .then(pipe::notify("bright"))
//!     .build()
//!     .unwrap();
//! runner.register(pipeline).unwrap();
//! runner.run();
//!
//! assert!(runner.errors().is_empty());
//! assert_eq!(runner.get_result("bright").unwrap().len(), 4);
//! ```

pub mod dataframe;
pub mod executor;
pub mod expr;
pub mod host;
pub mod metrics;
pub mod plot;
pub mod testing;

pub use dataframe::DataFrame;
pub use executor::{PipelineHandle, PipelineOutput, Runner};
pub use expr::ExprEvaluator;
pub use host::{Host, StatsReport};
pub use metrics::{ExecutionTimer, MetricsSink, StageMetrics};
