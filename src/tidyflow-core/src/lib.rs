//! Core data model for Tidyflow pipelines.
//!
//! This crate provides the cell-level types every other crate builds on:
//! - `Value`, `ValueKind` and `ValueKey` for the type system
//! - `Row` and the reserved grouping and join marker columns
//! - datetime helpers for conversions and calendar extraction

mod proptest_utils;
pub mod row;
pub mod testing;
pub mod types;

// Re-export commonly used types
pub use row::{is_reserved, make_row, rows_from, Row, GROUP_COL, JOIN_COL};
pub use types::{check_comparable, check_kind, Value, ValueKey, ValueKind};
