//! CSV export, one row per entry with a fixed column set

use crate::diary::entry::{DiaryEntry, EntryKind};
use crate::diary::types::Language;
use crate::export::error::{ExportError, ExportResult};
use crate::export::format::DateFormatter;
use chrono::SecondsFormat;

/// Column headers in output order
pub const CSV_HEADERS: [&str; 13] = [
    "ID",
    "Type",
    "Timestamp",
    "Date",
    "Time",
    "Volume",
    "Urgency",
    "HadLeak",
    "HadPain",
    "DrinkType",
    "Amount(ml)",
    "Severity",
    "Notes",
];

/// Cells for one entry; columns that do not apply to its kind are empty
pub fn entry_row(
    entry: &DiaryEntry,
    formatter: &dyn DateFormatter,
    language: Language,
) -> [String; 13] {
    let mut row: [String; 13] = Default::default();

    row[0] = entry.id.clone();
    row[1] = entry.entry_type().to_string();
    row[2] = entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
    row[3] = formatter.format_date(&entry.timestamp, language);
    row[4] = formatter.format_time(&entry.timestamp, language);

    match &entry.kind {
        EntryKind::Urination {
            volume,
            volume_ml,
            urgency,
            had_leak,
            had_pain,
        } => {
            row[5] = volume.as_str().to_string();
            row[6] = urgency.get().to_string();
            row[7] = had_leak.to_string();
            row[8] = had_pain.to_string();
            row[10] = volume_ml.map(|ml| ml.to_string()).unwrap_or_default();
        }
        EntryKind::Fluid { drink_type, amount } => {
            row[9] = drink_type.as_str().to_string();
            row[10] = amount.to_string();
        }
        EntryKind::Leak {
            severity, urgency, ..
        } => {
            row[6] = urgency.get().to_string();
            row[11] = severity.as_str().to_string();
        }
    }

    row[12] = entry.notes.clone().unwrap_or_default();
    row
}

/// Render entries as CSV text with a header row
pub fn entries_to_csv(
    entries: &[DiaryEntry],
    formatter: &dyn DateFormatter,
    language: Language,
) -> ExportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for entry in entries {
        writer.write_record(entry_row(entry, formatter, language))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
