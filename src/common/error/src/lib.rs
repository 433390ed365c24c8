//! Error types and result aliases for Tidyflow.
//!
//! Every crate in the workspace reports failures through [`FlowError`], so
//! builder validation, JSON restoration, and stage execution can all be
//! propagated with `?`.

mod error;

pub use error::{FlowError, FlowResult};
