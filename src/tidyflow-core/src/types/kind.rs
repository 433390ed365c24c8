//! Semantic kinds of table cells.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of value kinds a cell can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Absent or unknown.
    Missing,
    /// Boolean.
    Bool,
    /// Floating point number.
    Number,
    /// UTF-8 text.
    Text,
    /// UTC date and time.
    Datetime,
}

impl ValueKind {
    /// Get the display name for this kind.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Text => "text",
            Self::Datetime => "datetime",
        }
    }

    /// Whether values of this kind have a native ordering.
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::Number | Self::Text | Self::Datetime)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
