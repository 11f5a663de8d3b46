//! JSON export: entries with human-readable date and time added

use crate::diary::entry::DiaryEntry;
use crate::diary::types::Language;
use crate::export::error::ExportResult;
use crate::export::format::DateFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExport<'a> {
    pub export_date: DateTime<Utc>,
    pub total_entries: usize,
    pub entries: Vec<ExportedEntry<'a>>,
}

/// An entry serialized as stored, plus its formatted date and time
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedEntry<'a> {
    #[serde(flatten)]
    pub entry: &'a DiaryEntry,
    pub formatted_date: String,
    pub formatted_time: String,
}

pub fn build_json_export<'a>(
    entries: &'a [DiaryEntry],
    formatter: &dyn DateFormatter,
    language: Language,
    exported_at: DateTime<Utc>,
) -> JsonExport<'a> {
    JsonExport {
        export_date: exported_at,
        total_entries: entries.len(),
        entries: entries
            .iter()
            .map(|entry| ExportedEntry {
                entry,
                formatted_date: formatter.format_date(&entry.timestamp, language),
                formatted_time: formatter.format_time(&entry.timestamp, language),
            })
            .collect(),
    }
}

/// Pretty-printed JSON export document
pub fn entries_to_json(
    entries: &[DiaryEntry],
    formatter: &dyn DateFormatter,
    language: Language,
    exported_at: DateTime<Utc>,
) -> ExportResult<String> {
    let doc = build_json_export(entries, formatter, language, exported_at);
    Ok(serde_json::to_string_pretty(&doc)?)
}
