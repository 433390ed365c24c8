//! Type system for Tidyflow cells.
//!
//! This module defines the `Value` enum for runtime cells, the closed
//! `ValueKind` tag set, and the calendar helpers used for datetimes.

pub mod datetime;
mod invariants;
mod kind;
mod value;

pub use invariants::{check_comparable, check_kind};
pub use kind::ValueKind;
pub use value::{number_to_json, serialize_number, Value, ValueKey};
