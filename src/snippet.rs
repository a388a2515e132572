//! Snippet records and their kind-specific payloads.

use serde::{Deserialize, Serialize};

use crate::types::{Language, PrayerTitle, SnippetId, SnippetKind};

/// Document metadata fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaFields {
    /// Document title.
    pub title: String,
    /// Content language.
    pub language: Language,
    /// Calendar date as `YYYY-MM-DD`; may be empty while unset.
    pub date: String,
    /// Video link.
    pub youtube_url: String,
    /// PDF link.
    pub pdf_url: String,
    /// Cover image link.
    pub image_url: String,
}

/// Scripture reference and quoted text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerseFields {
    /// Book, chapter and verse reference.
    pub reference: String,
    /// Verse text.
    pub text: String,
}

/// Free text using `**bold**`, `*italic*` and `- item` markup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParagraphFields {
    /// Paragraph body.
    pub content: String,
}

/// Titled prayer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrayerFields {
    /// Heading variant.
    pub title: PrayerTitle,
    /// Prayer body.
    pub text: String,
}

/// Lesson body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LessonFields {
    /// Lesson body.
    pub content: String,
}

/// Kind-tagged payload; the variant is the record's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnippetPayload {
    /// Metadata payload.
    Meta(MetaFields),
    /// Verse payload.
    Verse(VerseFields),
    /// Paragraph payload.
    Paragraph(ParagraphFields),
    /// Prayer payload.
    Prayer(PrayerFields),
    /// Lesson payload.
    Lesson(LessonFields),
}

impl SnippetPayload {
    /// Empty payload for a freshly added snippet of `kind`.
    pub fn default_for(kind: SnippetKind) -> Self {
        match kind {
            SnippetKind::Meta => SnippetPayload::Meta(MetaFields::default()),
            SnippetKind::Verse => SnippetPayload::Verse(VerseFields::default()),
            SnippetKind::Paragraph => SnippetPayload::Paragraph(ParagraphFields::default()),
            SnippetKind::Prayer => SnippetPayload::Prayer(PrayerFields::default()),
            SnippetKind::Lesson => SnippetPayload::Lesson(LessonFields::default()),
        }
    }

    /// Kind tag of this payload.
    pub fn kind(&self) -> SnippetKind {
        match self {
            SnippetPayload::Meta(_) => SnippetKind::Meta,
            SnippetPayload::Verse(_) => SnippetKind::Verse,
            SnippetPayload::Paragraph(_) => SnippetKind::Paragraph,
            SnippetPayload::Prayer(_) => SnippetKind::Prayer,
            SnippetPayload::Lesson(_) => SnippetKind::Lesson,
        }
    }

    /// Paragraph payload with the given content.
    pub fn paragraph(content: impl Into<String>) -> Self {
        SnippetPayload::Paragraph(ParagraphFields {
            content: content.into(),
        })
    }
}

/// One snippet in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRecord {
    /// Stable snippet identifier.
    pub id: SnippetId,
    /// Current payload.
    pub payload: SnippetPayload,
}

impl SnippetRecord {
    /// Kind of the record, derived from its payload.
    pub fn kind(&self) -> SnippetKind {
        self.payload.kind()
    }

    /// Metadata fields when this is the Meta record.
    pub fn as_meta(&self) -> Option<&MetaFields> {
        match &self.payload {
            SnippetPayload::Meta(meta) => Some(meta),
            _ => None,
        }
    }
}
