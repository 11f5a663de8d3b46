//! Durable persistence for the diary state
//!
//! The whole `DiaryState` is stored as one JSON document under a stable key in
//! a key-value backend. Writes happen in a background task that always saves
//! the most recent snapshot (last write wins); loads go through
//! [`merge_with_defaults`], the schema-migration seam.
//!
//! ```text
//! mutation → Arc<DiaryState> snapshot → watch channel → writer task → backend.set()
//! startup  → backend.get() → merge_with_defaults → DiaryState
//! ```

use crate::diary::error::{PersistenceError, PersistenceResult};
use crate::diary::goals::{clamp_fluid_target, clamp_void_target};
use crate::diary::types::{DailyGoals, DiaryState, ReminderSettings, REMINDER_INTERVALS};
use crate::diary::validation::validate_entry;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default storage key for the diary document
pub const DEFAULT_STATE_KEY: &str = "bladder-diary-storage";

/// Durable asynchronous key-value slot
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> PersistenceResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> PersistenceResult<()>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> PersistenceResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Write-then-rename so a crash never leaves a torn document
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// In-process backend, handy for tests and previews
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.into(), value.into());
        }
        self
    }

    /// Make every subsequent read and write fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Current raw slot content
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.lock().ok().and_then(|slots| slots.get(key).cloned())
    }

    fn check(&self) -> PersistenceResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(PersistenceError::Backend("storage unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        self.check()?;
        let slots = self
            .slots
            .lock()
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> PersistenceResult<()> {
        self.check()?;
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        slots.insert(key.to_string(), value);
        Ok(())
    }
}

/// Load the stored state, `None` if the slot is empty
pub async fn load_state(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> PersistenceResult<Option<DiaryState>> {
    let Some(raw) = storage.get(key).await? else {
        return Ok(None);
    };

    let value: Value = serde_json::from_str(&raw)?;
    Ok(Some(merge_with_defaults(value)))
}

/// Serialize and store the full state
pub async fn save_state(
    storage: &dyn KeyValueStorage,
    key: &str,
    state: &DiaryState,
) -> PersistenceResult<()> {
    let json = serde_json::to_string(state)?;
    storage.set(key, json).await
}

/// Build a state from a possibly old or partially corrupt payload.
///
/// Missing or invalid top-level fields take their defaults; invalid or
/// duplicate entries are dropped one by one. Goals and reminder settings are
/// merged field by field, so one bad value does not reset its siblings; goals
/// are clamped into range and an unsupported reminder interval falls back to
/// the default. Unknown top-level fields are ignored.
pub fn merge_with_defaults(value: Value) -> DiaryState {
    let mut state = DiaryState::default();

    let Value::Object(mut obj) = value else {
        tracing::warn!("Persisted diary state is not an object, using defaults");
        return state;
    };

    if let Some(entries) = take(&mut obj, "entries") {
        state.entries = merge_entries(entries);
    }
    if let Some(goals) = take(&mut obj, "goals") {
        state.goals = merge_goals(goals);
    }
    if let Some(history) = take(&mut obj, "goalHistory") {
        state.goal_history = merge_list(history, "goalHistory");
    }
    merge_field(&mut obj, "streak", &mut state.streak);
    if let Some(settings) = take(&mut obj, "reminderSettings") {
        state.reminder_settings = merge_reminder_settings(settings);
    }
    merge_field(&mut obj, "language", &mut state.language);
    merge_field(
        &mut obj,
        "hasCompletedOnboarding",
        &mut state.has_completed_onboarding,
    );
    merge_field(
        &mut obj,
        "openAddMenuOnLaunch",
        &mut state.open_add_menu_on_launch,
    );

    state
}

fn take(obj: &mut Map<String, Value>, key: &str) -> Option<Value> {
    obj.remove(key).filter(|v| !v.is_null())
}

fn merge_field<T: DeserializeOwned>(obj: &mut Map<String, Value>, key: &'static str, slot: &mut T) {
    let Some(value) = take(obj, key) else {
        return;
    };

    match serde_json::from_value(value) {
        Ok(parsed) => *slot = parsed,
        Err(e) => tracing::warn!(field = key, error = %e, "Ignoring invalid persisted field"),
    }
}

fn merge_goals(value: Value) -> DailyGoals {
    let mut goals = DailyGoals::default();
    let Value::Object(obj) = value else {
        tracing::warn!(field = "goals", "Persisted goals are not an object, using defaults");
        return goals;
    };

    // Out-of-range numbers are clamped; non-numbers keep the default
    let target = |key: &'static str| match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => {
            let n = v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64));
            if n.is_none() {
                tracing::warn!(field = key, "Ignoring invalid persisted goal");
            }
            n
        }
    };

    if let Some(ml) = target("fluidTarget") {
        goals.fluid_target = clamp_fluid_target(ml);
    }
    if let Some(voids) = target("voidTarget") {
        goals.void_target = clamp_void_target(voids);
    }
    goals
}

fn merge_reminder_settings(value: Value) -> ReminderSettings {
    let defaults = ReminderSettings::default();
    let Value::Object(stored) = value else {
        tracing::warn!(
            field = "reminderSettings",
            "Persisted reminder settings are not an object, using defaults"
        );
        return defaults;
    };
    let Ok(Value::Object(mut merged)) = serde_json::to_value(defaults) else {
        return defaults;
    };

    // Overlay one stored field at a time, keeping only those that still parse
    for (key, field) in stored {
        if !merged.contains_key(&key) || field.is_null() {
            continue;
        }
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), field);
        match serde_json::from_value::<ReminderSettings>(Value::Object(candidate.clone())) {
            Ok(_) => merged = candidate,
            Err(e) => tracing::warn!(field = %key, error = %e, "Ignoring invalid reminder setting"),
        }
    }

    let mut settings = serde_json::from_value(Value::Object(merged)).unwrap_or(defaults);
    if !REMINDER_INTERVALS.contains(&settings.interval_hours) {
        tracing::warn!(
            interval_hours = settings.interval_hours,
            "Unsupported persisted reminder interval, using default"
        );
        settings.interval_hours = defaults.interval_hours;
    }
    settings
}

fn merge_list<T: DeserializeOwned>(value: Value, key: &'static str) -> Vec<T> {
    let Value::Array(items) = value else {
        tracing::warn!(field = key, "Persisted field is not an array, using default");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(field = key, index, error = %e, "Dropping invalid persisted record");
                None
            }
        })
        .collect()
}

fn merge_entries(value: Value) -> Vec<crate::diary::entry::DiaryEntry> {
    let Value::Array(items) = value else {
        tracing::warn!("Persisted entries are not an array, starting empty");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        match validate_entry(item) {
            Ok(entry) => {
                if seen.insert(entry.id.clone()) {
                    entries.push(entry);
                } else {
                    tracing::warn!(index, id = %entry.id, "Dropping persisted entry with duplicate id");
                }
            }
            Err(e) => tracing::warn!(index, error = %e, "Dropping invalid persisted entry"),
        }
    }

    entries
}

#[derive(Debug, Clone)]
struct PendingSnapshot {
    revision: u64,
    state: Arc<DiaryState>,
}

/// Outcome of the most recent background write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteStatus {
    /// Revision of the snapshot last attempted
    pub revision: u64,
    /// Error message if that attempt failed
    pub error: Option<String>,
}

/// Background task saving the latest submitted snapshot
pub struct SnapshotWriter {
    tx: watch::Sender<Option<PendingSnapshot>>,
    status: watch::Receiver<WriteStatus>,
    handle: JoinHandle<()>,
}

impl SnapshotWriter {
    /// Spawn the writer task; must be called inside a Tokio runtime
    pub fn spawn(storage: Arc<dyn KeyValueStorage>, key: String, debounce: Duration) -> Self {
        let (tx, mut rx) = watch::channel::<Option<PendingSnapshot>>(None);
        let (status_tx, status) = watch::channel(WriteStatus::default());

        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                if !debounce.is_zero() {
                    tokio::time::sleep(debounce).await;
                }

                let Some(pending) = rx.borrow_and_update().clone() else {
                    continue;
                };

                let error = match save_state(storage.as_ref(), &key, &pending.state).await {
                    Ok(()) => {
                        tracing::trace!(revision = pending.revision, "Persisted diary state");
                        None
                    }
                    Err(e) => {
                        tracing::warn!(
                            revision = pending.revision,
                            error = %e,
                            "Failed to persist diary state"
                        );
                        Some(e.to_string())
                    }
                };

                status_tx.send_replace(WriteStatus {
                    revision: pending.revision,
                    error,
                });
            }

            tracing::debug!("Snapshot writer stopped");
        });

        Self { tx, status, handle }
    }

    /// Queue a snapshot, replacing any not yet written
    pub fn submit(&self, revision: u64, state: Arc<DiaryState>) {
        self.tx.send_replace(Some(PendingSnapshot { revision, state }));
    }

    /// Status of the last completed write
    pub fn status(&self) -> WriteStatus {
        self.status.borrow().clone()
    }

    /// Wait until `revision` (or a later one) has been written
    pub async fn wait_for(&self, revision: u64) -> PersistenceResult<()> {
        let mut status = self.status.clone();
        let done = status
            .wait_for(|s| s.revision >= revision)
            .await
            .map_err(|_| PersistenceError::WriterStopped)?;

        match &done.error {
            Some(e) => Err(PersistenceError::Backend(e.clone())),
            None => Ok(()),
        }
    }

    /// Stop accepting snapshots and wait for the task to drain
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            tracing::error!("Snapshot writer task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::entry::DiaryEntry;
    use crate::diary::types::{DailyGoals, Language};
    use serde_json::json;
    use tempfile::tempdir;

    fn entry_json(id: &str) -> Value {
        json!({
            "id": id,
            "type": "fluid",
            "timestamp": "2024-02-01T08:00:00Z",
            "drinkType": "water",
            "amount": 250
        })
    }

    #[test]
    fn test_merge_fills_missing_fields() {
        // Payload written before reminders and the add-menu flag existed
        let old = json!({
            "entries": [entry_json("a")],
            "goals": {"fluidTarget": 2400},
            "language": "es",
            "hasCompletedOnboarding": true
        });

        let state = merge_with_defaults(old);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.goals.fluid_target, 2400);
        assert_eq!(state.goals.void_target, DailyGoals::default().void_target);
        assert_eq!(state.language, Language::Es);
        assert!(state.has_completed_onboarding);
        assert!(!state.open_add_menu_on_launch);
        assert_eq!(state.reminder_settings, Default::default());
        assert!(state.goal_history.is_empty());
    }

    #[test]
    fn test_merge_tolerates_bad_fields() {
        let payload = json!({
            "entries": [entry_json("a"), {"id": "b", "type": "mystery"}, entry_json("a")],
            "goals": {"fluidTarget": 90000, "voidTarget": 1},
            "language": "klingon",
            "streak": "long",
            "goalHistory": [
                {"changedAt": "2024-02-01T08:00:00Z", "changes": {"voidTarget": {"from": 8, "to": 7}}},
                {"changedAt": "nope"}
            ],
            "someFutureField": [1, 2, 3]
        });

        let state = merge_with_defaults(payload);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.goals, DailyGoals { fluid_target: 5000, void_target: 3 });
        assert_eq!(state.language, Language::En);
        assert_eq!(state.streak, Default::default());
        assert_eq!(state.goal_history.len(), 1);
    }

    #[test]
    fn test_merge_goals_field_by_field() {
        let state = merge_with_defaults(json!({
            "goals": {"fluidTarget": -100, "voidTarget": 10}
        }));
        assert_eq!(state.goals, DailyGoals { fluid_target: 500, void_target: 10 });

        let state = merge_with_defaults(json!({
            "goals": {"fluidTarget": "lots", "voidTarget": 6}
        }));
        assert_eq!(state.goals.fluid_target, DailyGoals::default().fluid_target);
        assert_eq!(state.goals.void_target, 6);

        let state = merge_with_defaults(json!({"goals": [1, 2]}));
        assert_eq!(state.goals, DailyGoals::default());
    }

    #[test]
    fn test_merge_rejects_unsupported_reminder_interval() {
        for interval in [0, 1, 5, 1000] {
            let state = merge_with_defaults(json!({
                "reminderSettings": {"enabled": true, "intervalHours": interval}
            }));
            let settings = state.reminder_settings;
            assert_eq!(settings.interval_hours, 3, "interval {}", interval);
            assert!(REMINDER_INTERVALS.contains(&settings.interval_hours));
            assert!(settings.enabled);
        }

        let state = merge_with_defaults(json!({
            "reminderSettings": {"intervalHours": 6, "quietHoursStart": "25:99"}
        }));
        assert_eq!(state.reminder_settings.interval_hours, 6);
        assert_eq!(
            state.reminder_settings.quiet_hours_start,
            ReminderSettings::default().quiet_hours_start
        );
    }

    #[test]
    fn test_merge_non_object() {
        assert_eq!(merge_with_defaults(json!("garbage")), DiaryState::default());
        assert_eq!(merge_with_defaults(Value::Null), DiaryState::default());
    }

    #[test]
    fn test_merge_is_identity_on_current_format() {
        let mut state = DiaryState::default();
        state.entries.push(serde_json::from_value::<DiaryEntry>(entry_json("x")).unwrap());
        state.open_add_menu_on_launch = true;

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(merge_with_defaults(value), state);
    }

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get("diary").await.unwrap(), None);
        storage.set("diary", "{\"a\":1}".to_string()).await.unwrap();
        assert_eq!(storage.get("diary").await.unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(storage.path_for("diary").exists());
    }

    #[tokio::test]
    async fn test_load_state_corrupt_json_is_error() {
        let storage = MemoryStorage::new().with_value(DEFAULT_STATE_KEY, "{not json");
        let result = load_state(&storage, DEFAULT_STATE_KEY).await;
        assert!(matches!(result, Err(PersistenceError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_writer_persists_latest_snapshot() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = SnapshotWriter::spawn(storage.clone(), "k".to_string(), Duration::ZERO);

        let mut state = DiaryState::default();
        writer.submit(1, Arc::new(state.clone()));
        state.language = Language::Pt;
        writer.submit(2, Arc::new(state.clone()));

        writer.wait_for(2).await.unwrap();
        let stored = load_state(storage.as_ref(), "k").await.unwrap().unwrap();
        assert_eq!(stored.language, Language::Pt);

        writer.shutdown().await;
    }

    #[tokio::test]
    async fn test_writer_reports_failures() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_failing(true);
        let writer = SnapshotWriter::spawn(storage.clone(), "k".to_string(), Duration::ZERO);

        writer.submit(1, Arc::new(DiaryState::default()));
        assert!(matches!(
            writer.wait_for(1).await,
            Err(PersistenceError::Backend(_))
        ));

        storage.set_failing(false);
        writer.submit(2, Arc::new(DiaryState::default()));
        assert!(writer.wait_for(2).await.is_ok());
        assert_eq!(writer.status().error, None);

        writer.shutdown().await;
    }
}
