//! Backup snapshots
//!
//! A backup is the restorable subset of the diary (entries, goals, goal
//! history, language, streak) plus a format version. It is written either as
//! plain JSON or as a compressed container:
//!
//! ```text
//! ┌──────────┬──────────────┬────────────────────────────────────┐
//! │ "BDZ1"   │ CRC32 (LE)   │ LZ4 block (u32 LE size + data)     │
//! │ 4 bytes  │ 4 bytes      │ variable                           │
//! └──────────┴──────────────┴────────────────────────────────────┘
//! ```
//!
//! The checksum covers the uncompressed length and the JSON payload.
//!
//! Versions: 1 has no `goalHistory`, 2 is current. Anything newer is refused.

use crate::diary::entry::DiaryEntry;
use crate::diary::types::{DailyGoals, DiaryState, GoalHistoryRecord, Language, StreakInfo};
use crate::diary::validation::{validate_entry, validate_id};
use crate::export::error::{ExportResult, RestoreError, RestoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;

/// Newest backup format this build reads and the one it writes
pub const BACKUP_VERSION: u32 = 2;

/// Leading bytes of a compressed backup
pub const COMPRESSED_MAGIC: &[u8; 4] = b"BDZ1";

/// Restorable slice of the diary state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    pub version: u32,
    pub entries: Vec<DiaryEntry>,
    #[serde(default)]
    pub goals: DailyGoals,
    /// Absent in version 1 backups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_history: Option<Vec<GoalHistoryRecord>>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub streak: StreakInfo,
    pub exported_at: DateTime<Utc>,
}

impl BackupSnapshot {
    /// Current-version snapshot of `state`
    pub fn from_state(state: &DiaryState, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: BACKUP_VERSION,
            entries: state.entries.clone(),
            goals: state.goals,
            goal_history: Some(state.goal_history.clone()),
            language: state.language,
            streak: state.streak,
            exported_at,
        }
    }

    /// Check version and entry ids before anything is applied
    pub fn validate(&self) -> RestoreResult<()> {
        check_version(self.version as u64)?;

        let mut seen = HashSet::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            validate_id(&entry.id).map_err(|source| RestoreError::InvalidEntry { index, source })?;
            if !seen.insert(entry.id.as_str()) {
                return Err(RestoreError::DuplicateId(entry.id.clone()));
            }
        }

        Ok(())
    }
}

/// What a successful restore replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    pub version: u32,
    pub entries: usize,
    pub goal_history: usize,
    pub exported_at: DateTime<Utc>,
}

/// On-disk representation of a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackupEncoding {
    #[default]
    Json,
    Compressed,
}

impl BackupEncoding {
    pub fn extension(&self) -> &'static str {
        match self {
            BackupEncoding::Json => "json",
            BackupEncoding::Compressed => "bdz",
        }
    }
}

/// Serialize a snapshot
pub fn encode_backup(snapshot: &BackupSnapshot, encoding: BackupEncoding) -> ExportResult<Vec<u8>> {
    match encoding {
        BackupEncoding::Json => Ok(serde_json::to_vec_pretty(snapshot)?),
        BackupEncoding::Compressed => {
            let payload = serde_json::to_vec(snapshot)?;

            let mut out = Vec::with_capacity(payload.len() / 2 + 16);
            out.extend_from_slice(COMPRESSED_MAGIC);
            out.extend_from_slice(&checksum(&payload).to_le_bytes());
            out.extend_from_slice(&lz4_flex::compress_prepend_size(&payload));
            Ok(out)
        }
    }
}

/// Parse and fully validate a JSON or compressed backup
pub fn decode_backup(bytes: &[u8]) -> RestoreResult<BackupSnapshot> {
    let payload: Cow<'_, [u8]> = if bytes.starts_with(COMPRESSED_MAGIC) {
        Cow::Owned(decompress(&bytes[COMPRESSED_MAGIC.len()..])?)
    } else {
        Cow::Borrowed(bytes)
    };

    let mut value: Value = serde_json::from_slice(&payload)?;
    let obj = value
        .as_object_mut()
        .ok_or_else(|| RestoreError::Malformed("backup is not a JSON object".to_string()))?;

    // Version first, so newer layouts are refused rather than misread
    let version = obj
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| RestoreError::Malformed("missing or non-integer version".to_string()))?;
    check_version(version)?;

    let raw_entries = match obj.remove("entries") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(RestoreError::Malformed("entries is not an array".to_string())),
        None => return Err(RestoreError::Malformed("missing entries".to_string())),
    };

    let entries = raw_entries
        .iter()
        .enumerate()
        .map(|(index, item)| {
            validate_entry(item).map_err(|source| RestoreError::InvalidEntry { index, source })
        })
        .collect::<RestoreResult<Vec<_>>>()?;

    obj.insert("entries".to_string(), Value::Array(Vec::new()));
    let mut snapshot: BackupSnapshot = serde_json::from_value(value)?;
    snapshot.entries = entries;

    snapshot.validate()?;
    Ok(snapshot)
}

fn check_version(version: u64) -> RestoreResult<()> {
    if version == 0 {
        return Err(RestoreError::Malformed("version must be at least 1".to_string()));
    }
    if version > BACKUP_VERSION as u64 {
        return Err(RestoreError::UnsupportedVersion {
            found: u32::try_from(version).unwrap_or(u32::MAX),
            supported: BACKUP_VERSION,
        });
    }
    Ok(())
}

fn checksum(payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&(payload.len() as u32).to_le_bytes());
    hasher.update(payload);
    hasher.finalize()
}

fn decompress(container: &[u8]) -> RestoreResult<Vec<u8>> {
    if container.len() < 4 {
        return Err(RestoreError::Decompression("truncated header".to_string()));
    }

    let (crc_bytes, block) = container.split_at(4);
    let expected = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

    let payload = lz4_flex::decompress_size_prepended(block)
        .map_err(|e| RestoreError::Decompression(format!("LZ4 decompression failed: {}", e)))?;

    let actual = checksum(&payload);
    if actual != expected {
        return Err(RestoreError::Decompression(format!(
            "checksum mismatch: expected {:08x}, got {:08x}",
            expected, actual
        )));
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::entry::{EntryKind, LeakActivity, LeakSeverity, Urgency};
    use crate::diary::error::ValidationError;
    use chrono::TimeZone;
    use serde_json::json;

    fn exported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, 10, 0, 0).unwrap()
    }

    fn sample_state() -> DiaryState {
        let mut state = DiaryState::default();
        for (i, hour) in [7, 12, 19].into_iter().enumerate() {
            state.entries.push(DiaryEntry::new(
                format!("leak-{}", i),
                Utc.with_ymd_and_hms(2024, 7, 31, hour, 0, 0).unwrap(),
                EntryKind::Leak {
                    severity: LeakSeverity::Moderate,
                    urgency: Urgency::new(4).unwrap(),
                    activity: Some(LeakActivity::Laughing),
                },
            ));
        }
        state.goals.fluid_target = 2200;
        state.language = Language::Es;
        state.streak.record(3, exported_at().date_naive());
        state
    }

    fn v1_json() -> Value {
        json!({
            "version": 1,
            "entries": [{
                "id": "old-1",
                "type": "fluid",
                "timestamp": "2023-12-01T08:00:00.000Z",
                "drinkType": "juice",
                "amount": 200
            }],
            "goals": {"fluidTarget": 1500, "voidTarget": 7},
            "language": "pt",
            "streak": {"currentStreak": 1},
            "exportedAt": "2023-12-01T09:00:00.000Z"
        })
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = BackupSnapshot::from_state(&sample_state(), exported_at());
        let bytes = encode_backup(&snapshot, BackupEncoding::Json).unwrap();

        assert_eq!(decode_backup(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_compressed_round_trip() {
        let snapshot = BackupSnapshot::from_state(&sample_state(), exported_at());
        let bytes = encode_backup(&snapshot, BackupEncoding::Compressed).unwrap();

        assert!(bytes.starts_with(COMPRESSED_MAGIC));
        assert_eq!(decode_backup(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_damaged_container_is_decompression_error() {
        let snapshot = BackupSnapshot::from_state(&sample_state(), exported_at());
        let mut bytes = encode_backup(&snapshot, BackupEncoding::Compressed).unwrap();

        let last = bytes.len() - 1;
        bytes[last] ^= 0x5a;
        assert!(matches!(decode_backup(&bytes), Err(RestoreError::Decompression(_))));

        assert!(matches!(decode_backup(b"BDZ1\x01"), Err(RestoreError::Decompression(_))));
    }

    #[test]
    fn test_version_one_has_no_goal_history() {
        let bytes = serde_json::to_vec(&v1_json()).unwrap();
        let snapshot = decode_backup(&bytes).unwrap();

        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.goal_history, None);
        assert_eq!(snapshot.goals.fluid_target, 1500);
        assert_eq!(snapshot.language, Language::Pt);
        assert_eq!(snapshot.streak.current_streak, 1);
        assert_eq!(snapshot.entries[0].id, "old-1");
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut doc = v1_json();
        doc["version"] = json!(3);
        // Newer layouts may change anything, so the entries are not even looked at
        doc["entries"] = json!("opaque");

        let err = decode_backup(&serde_json::to_vec(&doc).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            RestoreError::UnsupportedVersion { found: 3, supported: 2 }
        ));
    }

    #[test]
    fn test_invalid_entry_reports_index() {
        let mut doc = v1_json();
        doc["entries"] = json!([
            doc["entries"][0].clone(),
            {"id": "bad", "type": "fluid", "timestamp": "2023-12-01T08:00:00Z", "drinkType": "water", "amount": 0}
        ]);

        match decode_backup(&serde_json::to_vec(&doc).unwrap()) {
            Err(RestoreError::InvalidEntry { index, source }) => {
                assert_eq!(index, 1);
                assert_eq!(source, ValidationError::NotPositive("amount"));
            }
            other => panic!("expected invalid entry, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut doc = v1_json();
        let first = doc["entries"][0].clone();
        doc["entries"] = json!([first.clone(), first]);

        assert!(matches!(
            decode_backup(&serde_json::to_vec(&doc).unwrap()),
            Err(RestoreError::DuplicateId(id)) if id == "old-1"
        ));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(decode_backup(b"not json"), Err(RestoreError::Malformed(_))));
        assert!(matches!(decode_backup(b"[]"), Err(RestoreError::Malformed(_))));
        assert!(matches!(
            decode_backup(br#"{"entries": []}"#),
            Err(RestoreError::Malformed(_))
        ));
        assert!(matches!(
            decode_backup(br#"{"version": 2, "entries": []}"#),
            Err(RestoreError::Malformed(_))
        ));
    }
}
