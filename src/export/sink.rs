//! Export delivery
//!
//! An [`ExportSink`] is wherever finished export files go: a directory, a
//! share sheet, a cloud drive. A user backing out of a share sheet is a
//! successful `Delivery::Dismissed`, not an error.

use crate::diary::entry::DiaryEntry;
use crate::diary::store::DiaryStore;
use crate::diary::types::Language;
use crate::export::backup::{encode_backup, BackupEncoding};
use crate::export::csv_export::entries_to_csv;
use crate::export::error::{ExportError, ExportResult};
use crate::export::format::DateFormatter;
use crate::export::json_export::entries_to_json;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Outcome of handing a file to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Written or shared; the path is where it landed, if local
    Delivered(PathBuf),
    /// The user cancelled
    Dismissed,
}

/// Destination for export files
#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn deliver(&self, file_name: &str, contents: &[u8]) -> ExportResult<Delivery>;
}

/// Writes exports into a directory, creating it if needed
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ExportSink for FileSink {
    async fn deliver(&self, file_name: &str, contents: &[u8]) -> ExportResult<Delivery> {
        if file_name.is_empty() || file_name.contains(|c: char| c == '/' || c == '\\') {
            return Err(ExportError::Sink(format!("invalid file name: {:?}", file_name)));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, contents).await?;

        tracing::info!(path = %path.display(), bytes = contents.len(), "Export written");
        Ok(Delivery::Delivered(path))
    }
}

/// Entry export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// `<prefix>-YYYYMMDD_HHMMSS.<extension>`
pub fn export_file_name(prefix: &str, at: DateTime<Utc>, extension: &str) -> String {
    format!("{}-{}.{}", prefix, at.format("%Y%m%d_%H%M%S"), extension)
}

/// Render entries and hand them to `sink`
pub async fn export_entries(
    entries: &[DiaryEntry],
    format: ExportFormat,
    formatter: &dyn DateFormatter,
    language: Language,
    exported_at: DateTime<Utc>,
    sink: &dyn ExportSink,
) -> ExportResult<Delivery> {
    let body = match format {
        ExportFormat::Csv => entries_to_csv(entries, formatter, language)?,
        ExportFormat::Json => entries_to_json(entries, formatter, language, exported_at)?,
    };

    let name = export_file_name("bladder-diary-export", exported_at, format.extension());
    sink.deliver(&name, body.as_bytes()).await
}

/// Snapshot the store as a backup and hand it to `sink`
pub async fn export_backup(
    store: &DiaryStore,
    encoding: BackupEncoding,
    sink: &dyn ExportSink,
) -> ExportResult<Delivery> {
    let snapshot = store.backup_snapshot()?;
    let bytes = encode_backup(&snapshot, encoding)?;

    let name = export_file_name("bladder-diary-backup", snapshot.exported_at, encoding.extension());
    sink.deliver(&name, &bytes).await
}
