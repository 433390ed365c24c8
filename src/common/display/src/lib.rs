//! Display utilities for Tidyflow.
//!
//! Provides tree rendering for programs and text helpers for previews.

mod tree;

pub use tree::{DisplayTree, TreeNode};

/// Shorten `s` to at most `max_len` characters, marking the cut with `...`.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
