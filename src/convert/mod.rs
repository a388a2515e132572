//! Clipboard HTML to restricted Markdown.
//!
//! Output only ever contains `**bold**`, `*italic*`, `- item` lines and
//! blank-line paragraph breaks; every other tag contributes its text.

use thiserror::Error;
use tracing::debug;

/// Markdown rendering of a parsed fragment.
pub mod render;
/// html5ever tree sink and arena tree.
pub mod tree;

use tree::Fragment;

/// Tags whose content never reaches the output.
const EXCLUDED_TAGS: [&str; 2] = ["script", "style"];

/// Why a fragment produced no tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was empty or whitespace only.
    #[error("empty html fragment")]
    Empty,
}

/// Result of routing a paste event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Insert this converted text instead of the browser's default.
    Converted(String),
    /// No HTML on the clipboard; let the plain-text paste proceed.
    PlainText,
}

/// Parses `html` into a tree with script and style subtrees removed.
pub fn parse_fragment(html: &str) -> Result<Fragment, ParseError> {
    if html.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut fragment = Fragment::parse(html);
    if !fragment.parse_errors().is_empty() {
        debug!(errors = ?fragment.parse_errors(), "recovered from malformed clipboard html");
    }
    fragment.prune(|tag| EXCLUDED_TAGS.iter().any(|excluded| *excluded == tag));
    Ok(fragment)
}

/// Converts a clipboard HTML fragment to restricted Markdown.
///
/// Never fails: input that yields no tree converts to an empty string.
pub fn convert(html: &str) -> String {
    match parse_fragment(html) {
        Ok(fragment) => render::render(&fragment),
        Err(err) => {
            debug!(%err, "clipboard html produced no content");
            String::new()
        }
    }
}

/// Decides what a paste should insert given the clipboard's HTML flavour.
pub fn handle_paste(html: Option<&str>) -> PasteOutcome {
    match html {
        Some(html) => PasteOutcome::Converted(convert(html)),
        None => PasteOutcome::PlainText,
    }
}
