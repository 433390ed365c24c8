//! Tree display utilities for programs and pipelines.

use std::fmt;

/// A node in a display tree.
pub trait TreeNode {
    /// Text shown for this node.
    fn label(&self) -> String;

    /// Child nodes, in display order.
    fn children(&self) -> Vec<&dyn TreeNode>;

    /// Extra annotation shown in parentheses after the label.
    fn details(&self) -> Option<String> {
        None
    }
}

/// Renders a [`TreeNode`] hierarchy with box-drawing connectors.
pub struct DisplayTree<'a> {
    root: &'a dyn TreeNode,
}

impl<'a> DisplayTree<'a> {
    /// Create a new display tree.
    pub fn new(root: &'a dyn TreeNode) -> Self {
        Self { root }
    }

    fn write_label(f: &mut fmt::Formatter<'_>, node: &dyn TreeNode) -> fmt::Result {
        write!(f, "{}", node.label())?;
        if let Some(details) = node.details() {
            write!(f, " ({details})")?;
        }
        writeln!(f)
    }

    fn fmt_children(f: &mut fmt::Formatter<'_>, node: &dyn TreeNode, prefix: &str) -> fmt::Result {
        let children = node.children();
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            let is_last = i + 1 == count;
            let connector = if is_last { "└─ " } else { "├─ " };
            write!(f, "{prefix}{connector}")?;
            Self::write_label(f, child)?;
            let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });
            Self::fmt_children(f, child, &child_prefix)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayTree")
            .field("root", &self.root.label())
            .finish()
    }
}

impl fmt::Display for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_label(f, self.root)?;
        Self::fmt_children(f, self.root, "")
    }
}
