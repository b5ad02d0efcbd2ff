use std::fmt::Write;

use crate::tree::{BoxKind, BoxNode};

/// One line per box: kind, name, attributes, a `[replaced]` marker and the
/// quoted text, indented two spaces per level.
pub fn outline(root: &BoxNode) -> String {
    let mut lines = Vec::new();
    push_lines(root, 0, &mut lines);
    lines.join("\n")
}

fn push_lines(node: &BoxNode, depth: usize, lines: &mut Vec<String>) {
    let mut line = "  ".repeat(depth);
    line.push_str(match node.kind() {
        BoxKind::Block => "block",
        BoxKind::Inline => "inline",
    });
    if let Some(name) = node.name() {
        let _ = write!(line, " {name}");
    }
    for attribute in node.attributes() {
        let _ = write!(line, " {}={:?}", attribute.name, attribute.value);
    }
    if node.style().is_replaced_element {
        line.push_str(" [replaced]");
    }
    if let Some(text) = node.text() {
        let _ = write!(line, " {text:?}");
    }
    lines.push(line);
    for child in node.children() {
        push_lines(&child, depth + 1, lines);
    }
}
