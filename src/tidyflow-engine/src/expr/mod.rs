//! Expression evaluation for stage execution.
//!
//! Evaluates the `Expr` AST from `tidyflow-logical` one row at a time, with
//! three-valued semantics for missing values.
//!
//! # Supported Expressions
//!
//! - `Constant` - Literal values
//! - `Value` - Column references
//! - `Unary` - Negation, NOT, type checks, conversions, datetime parts
//! - `Binary` - Arithmetic, comparison, and logical operations
//! - `Ternary` - `ifElse`
//!
//! # Example
//!
//! ```rust
//! use tidyflow_core::{make_row, Value};
//! use tidyflow_engine::expr::ExprEvaluator;
//! use tidyflow_logical::{col, lit};
//!
//! let row = make_row([("age", Value::from(30))]);
//! let adult = ExprEvaluator::new().evaluate(&col("age").gt(lit(18)), &row).unwrap();
//! assert_eq!(adult, Value::Bool(true));
//! ```

pub mod convert;
mod evaluator;

pub use evaluator::ExprEvaluator;
