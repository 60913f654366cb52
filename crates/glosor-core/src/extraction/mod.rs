pub mod json_layout;
pub mod pdftohtml;

use crate::error::GlosorError;
use serde::{Deserialize, Serialize};

/// Node of the layout tree handed over by a layout backend.
///
/// Only `TextLine` nodes are read by the pipeline; containers may nest
/// arbitrarily (document, page, text box).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutNode {
    Container { children: Vec<LayoutNode> },
    TextLine { children: Vec<LayoutNode> },
    Char { text: String, fontname: String, size: f64 },
    /// Inter-character gap inserted by layout analysis (space or newline).
    Anno { text: String },
    /// Figures, curves, images and anything else a backend reports.
    Other { kind: String },
}

impl LayoutNode {
    pub fn kind(&self) -> &str {
        match self {
            LayoutNode::Container { .. } => "container",
            LayoutNode::TextLine { .. } => "text_line",
            LayoutNode::Char { .. } => "char",
            LayoutNode::Anno { .. } => "anno",
            LayoutNode::Other { kind } => kind,
        }
    }
}

/// Collect the children of every text line, depth first, in document order.
pub fn text_lines(root: &LayoutNode) -> Vec<&[LayoutNode]> {
    let mut lines = Vec::new();
    collect_lines(root, &mut lines);
    lines
}

fn collect_lines<'a>(node: &'a LayoutNode, lines: &mut Vec<&'a [LayoutNode]>) {
    match node {
        LayoutNode::TextLine { children } => lines.push(children.as_slice()),
        LayoutNode::Container { children } => {
            for child in children {
                collect_lines(child, lines);
            }
        }
        _ => {}
    }
}

/// Trait for layout extraction backends.
pub trait LayoutSource: Send + Sync {
    /// Turn the raw input (PDF bytes, or a serialized layout) into a layout tree.
    fn extract_layout(&self, input: &[u8]) -> Result<LayoutNode, GlosorError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
