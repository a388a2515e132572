//! Download file naming and content.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::{
    serialize::to_pretty_json,
    snippet::{MetaFields, SnippetRecord},
};

/// File name used when no dated Meta record is available.
pub const DEFAULT_FILE_NAME: &str = "content.json";

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No Meta record to derive a name from.
    #[error("document has no meta snippet")]
    MissingMeta,
    /// Meta date is not a `YYYY-MM-DD` calendar date.
    #[error("malformed meta date {0:?}")]
    MalformedDate(String),
    /// Document could not be encoded.
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A ready-to-save download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// `DD-MM-YYYY-{EN|TA}.json` or [`DEFAULT_FILE_NAME`].
    pub name: String,
    /// UTF-8 pretty JSON document.
    pub contents: Vec<u8>,
}

/// Strict name derivation; [`file_name`] wraps this with the fallback.
pub fn derive_file_name(meta: Option<&MetaFields>) -> Result<String, ExportError> {
    let meta = meta.ok_or(ExportError::MissingMeta)?;
    let date = NaiveDate::parse_from_str(meta.date.trim(), "%Y-%m-%d")
        .map_err(|_| ExportError::MalformedDate(meta.date.clone()))?;
    Ok(format!("{}-{}.json", date.format("%d-%m-%Y"), meta.language.code()))
}

/// Download name for a document with the given Meta fields.
pub fn file_name(meta: Option<&MetaFields>) -> String {
    derive_file_name(meta).unwrap_or_else(|err| {
        debug!(%err, fallback = DEFAULT_FILE_NAME, "using default export file name");
        DEFAULT_FILE_NAME.to_owned()
    })
}

/// Builds the download for `records` in their current order.
pub fn export_document(records: &[SnippetRecord]) -> Result<ExportFile, ExportError> {
    let meta = records.iter().find_map(SnippetRecord::as_meta);
    let json = to_pretty_json(records)?;
    Ok(ExportFile {
        name: file_name(meta),
        contents: json.into_bytes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;

    fn meta(date: &str, language: Language) -> MetaFields {
        MetaFields {
            date: date.to_owned(),
            language,
            ..MetaFields::default()
        }
    }

    #[test]
    fn tamil_date_is_reordered_day_first() {
        let m = meta("2024-03-07", Language::Tamil);
        assert_eq!(file_name(Some(&m)), "07-03-2024-TA.json");
    }

    #[test]
    fn english_code() {
        let m = meta("2023-12-25", Language::English);
        assert_eq!(file_name(Some(&m)), "25-12-2023-EN.json");
    }

    #[test]
    fn malformed_or_missing_falls_back() {
        assert_eq!(file_name(None), DEFAULT_FILE_NAME);
        assert_eq!(file_name(Some(&meta("", Language::English))), DEFAULT_FILE_NAME);
        assert_eq!(file_name(Some(&meta("2024-13-40", Language::Tamil))), DEFAULT_FILE_NAME);
        assert_eq!(file_name(Some(&meta("07/03/2024", Language::Tamil))), DEFAULT_FILE_NAME);
        assert!(matches!(
            derive_file_name(Some(&meta("soon", Language::English))),
            Err(ExportError::MalformedDate(d)) if d == "soon"
        ));
    }
}
