//! Tidyflow - multi-stage tabular data pipelines
//!
//! Tidyflow builds pipelines of relational, plotting and statistical stages,
//! groups them into programs, saves programs as JSON, and runs them with a
//! scheduler that respects the results each pipeline depends on.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export member crates
pub use common_config as config;
pub use common_display as display;
pub use common_error as error;
pub use tidyflow_core as core;
pub use tidyflow_engine as engine;
pub use tidyflow_logical as logical;

pub use common_error::{FlowError, FlowResult};
pub use tidyflow_core::{Row, Value, ValueKind};
pub use tidyflow_engine::{DataFrame, Host, Runner, StatsReport};
pub use tidyflow_logical::persist::{program_from_str, program_to_string};
pub use tidyflow_logical::{col, lit, Expr, Pipeline, PipelineBuilder, Program, Stage};

/// Tidyflow version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
