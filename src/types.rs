//! Shared primitive IDs and snippet-related enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic snippet identifier, never reused within a registry.
pub type SnippetId = u64;
/// Monotonic change sequence number.
pub type ChangeSeq = u64;

/// Closed tag distinguishing snippet payload shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetKind {
    /// Document metadata; at most one per registry.
    Meta,
    /// Scripture reference and text.
    Verse,
    /// Free text with Markdown emphasis and lists.
    Paragraph,
    /// Titled prayer text.
    Prayer,
    /// Lesson content.
    Lesson,
}

impl SnippetKind {
    /// All kinds, in form-menu order.
    pub const ALL: [SnippetKind; 5] = [
        SnippetKind::Meta,
        SnippetKind::Verse,
        SnippetKind::Paragraph,
        SnippetKind::Prayer,
        SnippetKind::Lesson,
    ];

    /// The `type` tag used in the serialized document.
    pub fn as_str(self) -> &'static str {
        match self {
            SnippetKind::Meta => "meta",
            SnippetKind::Verse => "verse",
            SnippetKind::Paragraph => "paragraph",
            SnippetKind::Prayer => "prayer",
            SnippetKind::Lesson => "lesson",
        }
    }
}

impl fmt::Display for SnippetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// English content.
    #[default]
    English,
    /// Tamil content.
    Tamil,
}

impl Language {
    /// Two-letter code used in export file names.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::Tamil => "TA",
        }
    }
}

/// Heading shown above a prayer block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrayerTitle {
    /// English heading.
    #[default]
    Prayer,
    /// Tamil heading.
    #[serde(rename = "ஜெபம்")]
    Jebam,
}
