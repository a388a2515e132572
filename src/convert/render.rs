use once_cell::sync::Lazy;
use regex::Regex;

use super::tree::{Fragment, NodeData, NodeId};

static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid blank-line regex"));

/// Renders the whole fragment and normalises blank lines.
pub fn render(fragment: &Fragment) -> String {
    let raw = render_node(fragment, fragment.root());
    collapse_blank_lines(&raw)
}

/// Collapses each run of newlines (with any whitespace between them) into a
/// single blank line, then trims the result.
pub fn collapse_blank_lines(raw: &str) -> String {
    BLANK_LINE_RUN.replace_all(raw, "\n\n").trim().to_owned()
}

/// Post-order walk over an explicit stack; nesting depth never reaches the
/// call stack.
fn render_node(fragment: &Fragment, root: NodeId) -> String {
    let mut stack = vec![(root, false)];
    let mut rendered: Vec<String> = Vec::new();

    while let Some((id, children_done)) = stack.pop() {
        let node = fragment.node(id);
        match &node.data {
            NodeData::Text(text) => rendered.push(text.clone()),
            NodeData::Comment => rendered.push(String::new()),
            NodeData::Document | NodeData::Element if !children_done => {
                stack.push((id, true));
                stack.extend(node.children.iter().rev().map(|child| (*child, false)));
            }
            NodeData::Document | NodeData::Element => {
                let first = rendered.len() - node.children.len();
                let inner: String = rendered.drain(first..).collect();
                rendered.push(wrap(fragment.tag(id), inner));
            }
        }
    }

    rendered.pop().unwrap_or_default()
}

fn wrap(tag: Option<&str>, inner: String) -> String {
    match tag {
        Some("strong" | "b") => format!("**{inner}**"),
        Some("em" | "i") => format!("*{inner}*"),
        Some("p") => format!("\n{inner}\n"),
        Some("li") => format!("- {}\n", inner.trim()),
        Some("ul" | "ol") => format!("{}\n", inner.trim()),
        Some("br") => "\n".to_owned(),
        _ => inner,
    }
}
