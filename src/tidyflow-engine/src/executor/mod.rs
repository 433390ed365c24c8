//! Pipeline scheduling and execution.
//!
//! - [`Runner`]: Dependency-driven scheduler and executor
//! - [`PipelineHandle`]: Opaque id assigned at registration
//! - [`PipelineOutput`]: Result of executing one pipeline

mod runner;
mod stage;

pub use runner::{PipelineHandle, PipelineOutput, Runner};
