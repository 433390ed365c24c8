//! Pipeline representation for Tidyflow.
//!
//! `tidyflow-logical` describes *what* a program does, without running it.
//!
//! # Overview
//!
//! - **Expressions**: a tagged tree of constants, column references and
//!   unary, binary and ternary operations
//! - **Stages**: one pipeline step with its parameters and metadata
//!   (dependencies, published name, input and output)
//! - **Pipelines and programs**: ordered stages and ordered pipelines
//! - **Persistence**: the JSON document format, which round-trips exactly
//!
//! # Example
//!
//! ```rust
//! use tidyflow_logical::expr::{col, lit};
//! use tidyflow_logical::stage::pipe;
//! use tidyflow_logical::{persist, PipelineBuilder, Program};
//!
//! let pipeline = PipelineBuilder::start(pipe::read("colors.csv"))
//!     .then(pipe::filter(col("red").gt(lit(0))))
//!     .then(pipe::notify("reds"))
//!     .build()
//!     .unwrap();
//! pipeline.check_shape().unwrap();
//!
//! let program = Program::new(vec![pipeline]);
//! let json = persist::program_to_json(&program).unwrap();
//! assert_eq!(persist::json_to_program(&json).unwrap(), program);
//! ```

pub mod expr;
pub mod persist;
mod plan;
pub mod stage;

// Re-export commonly used types
pub use plan::{Pipeline, PipelineBuilder, Program};
pub use stage::{Stage, SummaryOp};

// Re-export expression types at crate root for convenience
pub use expr::{col, lit, op_lookup, BinaryOp, Expr, OpName, TernaryOp, UnaryOp};
