//! Projection of the registry into the public JSON document.
//!
//! Each record becomes one object tagged with `type`; field order inside an
//! object and array order are both fixed, so output is byte-stable for the
//! same records.

use serde::{Deserialize, Serialize};

use crate::snippet::{
    LessonFields, MetaFields, ParagraphFields, PrayerFields, SnippetPayload, SnippetRecord, VerseFields,
};

/// Borrowed view of one document entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentEntry<'a> {
    /// `{ type: "meta", title, language, date, youtubeUrl, pdfUrl, imageUrl }`
    Meta(&'a MetaFields),
    /// `{ type: "verse", reference, text }`
    Verse(&'a VerseFields),
    /// `{ type: "paragraph", content }`
    Paragraph(&'a ParagraphFields),
    /// `{ type: "prayer", title, text }`
    Prayer(&'a PrayerFields),
    /// `{ type: "lesson", content }`
    Lesson(&'a LessonFields),
}

impl<'a> From<&'a SnippetPayload> for DocumentEntry<'a> {
    fn from(payload: &'a SnippetPayload) -> Self {
        match payload {
            SnippetPayload::Meta(fields) => DocumentEntry::Meta(fields),
            SnippetPayload::Verse(fields) => DocumentEntry::Verse(fields),
            SnippetPayload::Paragraph(fields) => DocumentEntry::Paragraph(fields),
            SnippetPayload::Prayer(fields) => DocumentEntry::Prayer(fields),
            SnippetPayload::Lesson(fields) => DocumentEntry::Lesson(fields),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OwnedEntry {
    Meta(MetaFields),
    Verse(VerseFields),
    Paragraph(ParagraphFields),
    Prayer(PrayerFields),
    Lesson(LessonFields),
}

impl From<OwnedEntry> for SnippetPayload {
    fn from(entry: OwnedEntry) -> Self {
        match entry {
            OwnedEntry::Meta(fields) => SnippetPayload::Meta(fields),
            OwnedEntry::Verse(fields) => SnippetPayload::Verse(fields),
            OwnedEntry::Paragraph(fields) => SnippetPayload::Paragraph(fields),
            OwnedEntry::Prayer(fields) => SnippetPayload::Prayer(fields),
            OwnedEntry::Lesson(fields) => SnippetPayload::Lesson(fields),
        }
    }
}

/// Document entries for `records`, in the order given.
pub fn serialize<'a>(records: impl IntoIterator<Item = &'a SnippetRecord>) -> Vec<DocumentEntry<'a>> {
    records
        .into_iter()
        .map(|record| DocumentEntry::from(&record.payload))
        .collect()
}

/// Pretty-printed JSON document used for preview and export.
pub fn to_pretty_json<'a>(records: impl IntoIterator<Item = &'a SnippetRecord>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serialize(records))
}

/// Parses a previously exported document back into payloads.
pub fn parse_document(json: &str) -> serde_json::Result<Vec<SnippetPayload>> {
    let entries: Vec<OwnedEntry> = serde_json::from_str(json)?;
    Ok(entries.into_iter().map(SnippetPayload::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Language, PrayerTitle};

    #[test]
    fn meta_fields_keep_declared_order() {
        let record = SnippetRecord {
            id: 1,
            payload: SnippetPayload::Meta(MetaFields {
                title: "Morning".into(),
                language: Language::Tamil,
                date: "2024-03-07".into(),
                youtube_url: "y".into(),
                pdf_url: "p".into(),
                image_url: "i".into(),
            }),
        };
        let json = serde_json::to_string(&serialize([&record])).unwrap();
        assert_eq!(
            json,
            r#"[{"type":"meta","title":"Morning","language":"Tamil","date":"2024-03-07","youtubeUrl":"y","pdfUrl":"p","imageUrl":"i"}]"#
        );
    }

    #[test]
    fn tamil_prayer_title_is_written_verbatim() {
        let record = SnippetRecord {
            id: 2,
            payload: SnippetPayload::Prayer(PrayerFields {
                title: PrayerTitle::Jebam,
                text: "Amen".into(),
            }),
        };
        let json = serde_json::to_string(&serialize([&record])).unwrap();
        assert_eq!(json, r#"[{"type":"prayer","title":"ஜெபம்","text":"Amen"}]"#);
    }

    #[test]
    fn empty_document_is_empty_array() {
        let none: [&SnippetRecord; 0] = [];
        assert_eq!(to_pretty_json(none).unwrap(), "[]");
    }
}
