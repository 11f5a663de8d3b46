//! Backups and exports
//!
//! - **backup**: Versioned snapshots, JSON or LZ4-compressed container, decode and validate
//! - **csv_export**: Fixed-column CSV, one row per entry
//! - **json_export**: Entry JSON with formatted date and time
//! - **format**: `DateFormatter` collaborator and the locale formatter
//! - **sink**: `ExportSink` delivery and the high-level export helpers
//! - **error**: `RestoreError`, `ExportError`
//!
//! # Flow
//!
//! ```text
//! Backup:   DiaryStore::backup_snapshot → encode_backup → ExportSink::deliver
//! Restore:  bytes → decode_backup (version, checksum, entries) → DiaryStore::restore_backup
//! Export:   entries → entries_to_csv / entries_to_json → ExportSink::deliver
//! ```

pub mod backup;
pub mod csv_export;
pub mod error;
pub mod format;
pub mod json_export;
pub mod sink;

pub use backup::{
    decode_backup, encode_backup, BackupEncoding, BackupSnapshot, RestoreSummary, BACKUP_VERSION,
    COMPRESSED_MAGIC,
};
pub use csv_export::{entries_to_csv, entry_row, CSV_HEADERS};
pub use error::{ExportError, ExportResult, RestoreError, RestoreResult};
pub use format::{DateFormatter, LocaleFormatter};
pub use json_export::{build_json_export, entries_to_json, ExportedEntry, JsonExport};
pub use sink::{
    export_backup, export_entries, export_file_name, Delivery, ExportFormat, ExportSink, FileSink,
};
