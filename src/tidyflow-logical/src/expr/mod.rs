//! Expression trees evaluated per row.

#[allow(clippy::module_inception)]
mod expr;
mod ops;

pub use expr::{col, lit, Expr};
pub use ops::{op_lookup, BinaryOp, OpName, TernaryOp, UnaryOp};
