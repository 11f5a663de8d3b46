//! The diary store
//!
//! `DiaryStore` is the single mutable owner of [`DiaryState`]. Every action is
//! a synchronous in-memory replacement of the state; readers get cheap
//! `Arc` snapshots that later mutations never touch (copy-on-write through
//! `Arc::make_mut`). Once hydrated, each effective mutation hands the new
//! snapshot to the background [`SnapshotWriter`].

use crate::diary::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::diary::entry::{DiaryEntry, EntryKind, EntryPatch, NewFluid, NewLeak, NewUrination};
use crate::diary::error::{PersistenceResult, ValidationResult};
use crate::diary::goals::{clamp_goals, diff_goals};
use crate::diary::persistence::{load_state, KeyValueStorage, SnapshotWriter, DEFAULT_STATE_KEY};
use crate::diary::streak::current_streak;
use crate::diary::types::{
    DailyGoals, DiaryState, GoalHistoryRecord, GoalsPatch, Language, ReminderPatch,
    ReminderSettings, StreakInfo,
};
use crate::export::backup::{decode_backup, BackupSnapshot, RestoreSummary};
use crate::export::error::{RestoreError, RestoreResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Attempts at drawing a fresh id before falling back to suffixing
const MAX_ID_ATTEMPTS: usize = 8;

/// Whether durable state has been loaded yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationStatus {
    /// Initial load in progress; in-memory state is provisional
    Hydrating,
    /// Load finished (successfully or not); emptiness means "no data"
    Hydrated,
}

/// What `hydrate` found in storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// Stored state loaded
    Loaded { entries: usize },
    /// Nothing stored yet
    Empty,
    /// Read or parse failure; defaults are in use
    Failed(String),
}

/// Store configuration and collaborators
#[derive(Clone)]
pub struct StoreOptions {
    /// Storage slot holding the state document
    pub state_key: String,
    /// Delay before each background write, coalescing bursts of mutations
    pub write_debounce: Duration,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            state_key: DEFAULT_STATE_KEY.to_string(),
            write_debounce: Duration::ZERO,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
        }
    }
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_key(mut self, key: impl Into<String>) -> Self {
        self.state_key = key.into();
        self
    }

    pub fn write_debounce(mut self, debounce: Duration) -> Self {
        self.write_debounce = debounce;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }
}

/// Aggregate root over the whole diary.
///
/// Once hydrated, the store owns a background writer. Call
/// [`DiaryStore::shutdown`] before exiting: a store that is simply dropped
/// leaves the writer detached, and a snapshot still pending when the runtime
/// stops is lost.
pub struct DiaryStore {
    state: Arc<DiaryState>,
    status: HydrationStatus,
    /// Number of snapshots handed to the writer
    revision: u64,
    storage: Arc<dyn KeyValueStorage>,
    writer: Option<SnapshotWriter>,
    options: StoreOptions,
}

impl DiaryStore {
    /// Create an unhydrated store holding default state
    pub fn new(storage: Arc<dyn KeyValueStorage>, options: StoreOptions) -> Self {
        Self {
            state: Arc::new(DiaryState::default()),
            status: HydrationStatus::Hydrating,
            revision: 0,
            storage,
            writer: None,
            options,
        }
    }

    /// Create and hydrate in one step
    pub async fn open(storage: Arc<dyn KeyValueStorage>, options: StoreOptions) -> Self {
        let mut store = Self::new(storage, options);
        store.hydrate().await;
        store
    }

    /// Load durable state and start persisting.
    ///
    /// The in-memory state is replaced by what was stored, or by defaults when
    /// the slot is empty or unreadable; provisional mutations made while
    /// hydrating are discarded. The store is `Hydrated` afterwards either way.
    pub async fn hydrate(&mut self) -> HydrationOutcome {
        if self.status == HydrationStatus::Hydrated {
            tracing::debug!("Store already hydrated");
            return HydrationOutcome::Loaded {
                entries: self.state.entries.len(),
            };
        }

        let key = self.options.state_key.clone();
        let (state, outcome) = match load_state(self.storage.as_ref(), &key).await {
            Ok(Some(state)) => {
                let entries = state.entries.len();
                (state, HydrationOutcome::Loaded { entries })
            }
            Ok(None) => (DiaryState::default(), HydrationOutcome::Empty),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Hydration failed, starting from defaults");
                (DiaryState::default(), HydrationOutcome::Failed(e.to_string()))
            }
        };

        self.state = Arc::new(state);
        self.status = HydrationStatus::Hydrated;
        self.writer = Some(SnapshotWriter::spawn(
            Arc::clone(&self.storage),
            key,
            self.options.write_debounce,
        ));

        tracing::info!(outcome = ?outcome, "Diary store hydrated");
        outcome
    }

    pub fn hydration_status(&self) -> HydrationStatus {
        self.status
    }

    pub fn is_hydrated(&self) -> bool {
        self.status == HydrationStatus::Hydrated
    }

    /// Immutable snapshot of the whole state
    pub fn snapshot(&self) -> Arc<DiaryState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &DiaryState {
        &self.state
    }

    pub fn entries(&self) -> &[DiaryEntry] {
        &self.state.entries
    }

    pub fn entry(&self, id: &str) -> Option<&DiaryEntry> {
        self.state.find_entry(id)
    }

    pub fn goals(&self) -> DailyGoals {
        self.state.goals
    }

    pub fn goal_history(&self) -> &[GoalHistoryRecord] {
        &self.state.goal_history
    }

    pub fn streak(&self) -> StreakInfo {
        self.state.streak
    }

    pub fn reminder_settings(&self) -> ReminderSettings {
        self.state.reminder_settings
    }

    pub fn language(&self) -> Language {
        self.state.language
    }

    pub fn has_completed_onboarding(&self) -> bool {
        self.state.has_completed_onboarding
    }

    pub fn open_add_menu_on_launch(&self) -> bool {
        self.state.open_add_menu_on_launch
    }

    pub fn clock(&self) -> &dyn Clock {
        self.options.clock.as_ref()
    }

    /// Record a void
    pub fn add_urination_entry(&mut self, input: NewUrination) -> DiaryEntry {
        self.add_entry(input.into_parts())
    }

    /// Record a drink
    pub fn add_fluid_entry(&mut self, input: NewFluid) -> DiaryEntry {
        self.add_entry(input.into_parts())
    }

    /// Record a leak
    pub fn add_leak_entry(&mut self, input: NewLeak) -> DiaryEntry {
        self.add_entry(input.into_parts())
    }

    fn add_entry(
        &mut self,
        (kind, notes, timestamp): (EntryKind, Option<String>, Option<DateTime<Utc>>),
    ) -> DiaryEntry {
        let id = self.fresh_id();
        let timestamp = timestamp.unwrap_or_else(|| self.options.clock.now());

        let mut entry = DiaryEntry::new(id, timestamp, kind);
        entry.notes = notes;

        let stored = entry.clone();
        self.mutate(move |state| state.entries.push(stored));

        tracing::debug!(id = %entry.id, kind = %entry.entry_type(), "Added entry");
        entry
    }

    fn fresh_id(&self) -> String {
        let mut last = String::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.options.ids.next_id();
            if !self.state.contains_id(&id) {
                return id;
            }
            tracing::debug!(id = %id, "Generated id already in use, retrying");
            last = id;
        }

        // Generator keeps colliding; suffix until unique
        let mut n = 1u64;
        loop {
            let candidate = format!("{}-{}", last, n);
            if !self.state.contains_id(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Patch an entry, appending one edit record with the changed fields.
    ///
    /// Returns `true` if the entry changed. Unknown ids and patches that
    /// change nothing are no-ops.
    pub fn update_entry(&mut self, id: &str, patch: &EntryPatch) -> bool {
        let Some(index) = self.state.entries.iter().position(|e| e.id == id) else {
            tracing::debug!(id = %id, "Update for unknown entry ignored");
            return false;
        };

        let mut entry = self.state.entries[index].clone();
        if !entry.apply_patch(patch, self.options.clock.now()) {
            return false;
        }

        self.mutate(move |state| state.entries[index] = entry);
        true
    }

    /// Remove an entry; returns `false` if no entry had that id
    pub fn delete_entry(&mut self, id: &str) -> bool {
        let Some(index) = self.state.entries.iter().position(|e| e.id == id) else {
            tracing::debug!(id = %id, "Delete for unknown entry ignored");
            return false;
        };

        self.mutate(move |state| {
            state.entries.remove(index);
        });
        true
    }

    /// Drop every entry, leaving goals, history, reminders and preferences alone
    pub fn clear_all_entries(&mut self) {
        if self.state.entries.is_empty() {
            return;
        }

        let count = self.state.entries.len();
        self.mutate(|state| state.entries.clear());
        tracing::info!(count, "Cleared all entries");
    }

    /// Apply a goal patch; returns the history record if anything changed
    pub fn update_goals(&mut self, patch: GoalsPatch) -> Option<GoalHistoryRecord> {
        let diff = diff_goals(&self.state.goals, &patch, self.options.clock.now());
        let record = diff.record?;

        let stored = record.clone();
        self.mutate(move |state| {
            state.goals = diff.next;
            state.goal_history.push(stored);
        });
        Some(record)
    }

    /// Recompute the streak as of the clock's local today
    pub fn refresh_streak(&mut self) -> u32 {
        let clock = Arc::clone(&self.options.clock);
        let today = clock.today();
        let current = current_streak(&self.state.entries, today, |ts| clock.local_date(ts));

        let mut next = self.state.streak;
        next.record(current, today);
        if next != self.state.streak {
            self.mutate(move |state| state.streak = next);
        }

        current
    }

    pub fn set_language(&mut self, language: Language) {
        if self.state.language != language {
            self.mutate(move |state| state.language = language);
        }
    }

    pub fn complete_onboarding(&mut self) {
        self.set_onboarding(true);
    }

    pub fn reset_onboarding(&mut self) {
        self.set_onboarding(false);
    }

    fn set_onboarding(&mut self, done: bool) {
        if self.state.has_completed_onboarding != done {
            self.mutate(move |state| state.has_completed_onboarding = done);
        }
    }

    pub fn set_open_add_menu_on_launch(&mut self, open: bool) {
        if self.state.open_add_menu_on_launch != open {
            self.mutate(move |state| state.open_add_menu_on_launch = open);
        }
    }

    /// Patch reminder settings; an invalid patch changes nothing
    pub fn update_reminder_settings(&mut self, patch: ReminderPatch) -> ValidationResult<()> {
        let next = patch.apply_to(&self.state.reminder_settings)?;
        if next != self.state.reminder_settings {
            self.mutate(move |state| state.reminder_settings = next);
        }
        Ok(())
    }

    /// Backup snapshot of the current state
    pub fn backup_snapshot(&self) -> RestoreResult<BackupSnapshot> {
        self.ensure_hydrated()?;
        Ok(BackupSnapshot::from_state(
            &self.state,
            self.options.clock.now(),
        ))
    }

    /// Replace entries, goals, goal history, streak and language from a backup.
    ///
    /// Nothing changes unless the whole snapshot is acceptable.
    pub fn restore_backup(&mut self, snapshot: BackupSnapshot) -> RestoreResult<RestoreSummary> {
        self.ensure_hydrated()?;
        snapshot.validate()?;

        let summary = RestoreSummary {
            version: snapshot.version,
            entries: snapshot.entries.len(),
            goal_history: snapshot.goal_history.as_ref().map_or(0, Vec::len),
            exported_at: snapshot.exported_at,
        };

        self.mutate(move |state| {
            state.entries = snapshot.entries;
            state.goals = clamp_goals(snapshot.goals);
            state.goal_history = snapshot.goal_history.unwrap_or_default();
            state.streak = snapshot.streak;
            state.language = snapshot.language;
        });

        tracing::info!(
            version = summary.version,
            entries = summary.entries,
            "Restored diary from backup"
        );
        Ok(summary)
    }

    /// Decode a JSON or compressed backup and restore it
    pub fn restore_from_bytes(&mut self, bytes: &[u8]) -> RestoreResult<RestoreSummary> {
        self.ensure_hydrated()?;
        let snapshot = decode_backup(bytes)?;
        self.restore_backup(snapshot)
    }

    fn ensure_hydrated(&self) -> RestoreResult<()> {
        if self.is_hydrated() {
            Ok(())
        } else {
            Err(RestoreError::NotHydrated)
        }
    }

    fn mutate<R>(&mut self, f: impl FnOnce(&mut DiaryState) -> R) -> R {
        let result = f(Arc::make_mut(&mut self.state));

        if let Some(writer) = &self.writer {
            self.revision += 1;
            writer.submit(self.revision, Arc::clone(&self.state));
        }

        result
    }

    /// Wait until the latest state is durable, reporting the last write error
    pub async fn flush(&self) -> PersistenceResult<()> {
        match &self.writer {
            Some(writer) => writer.wait_for(self.revision).await,
            None => Ok(()),
        }
    }

    /// Whether snapshots have been handed to the writer but not yet written
    pub fn has_unsaved_changes(&self) -> bool {
        self.writer
            .as_ref()
            .is_some_and(|writer| writer.status().revision < self.revision)
    }

    /// Flush and stop the background writer
    pub async fn shutdown(mut self) -> PersistenceResult<()> {
        let result = self.flush().await;
        if let Some(writer) = self.writer.take() {
            writer.shutdown().await;
        }
        result
    }
}

impl Drop for DiaryStore {
    fn drop(&mut self) {
        if let Some(writer) = &self.writer {
            let written = writer.status().revision;
            if written < self.revision {
                tracing::warn!(
                    revision = self.revision,
                    written,
                    "Diary store dropped without shutdown, pending changes may be lost"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::clock::{FixedClock, SequentialIds};
    use crate::diary::entry::{DrinkType, EntryType, LeakSeverity, Urgency, VolumeSize};
    use crate::diary::error::{PersistenceError, ValidationError};
    use crate::diary::persistence::{FileStorage, MemoryStorage};
    use crate::export::backup::BACKUP_VERSION;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use std::num::NonZeroU32;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn options(clock: Arc<FixedClock>) -> StoreOptions {
        StoreOptions::new()
            .clock(clock)
            .ids(Arc::new(SequentialIds::new("entry")))
    }

    async fn open_memory() -> (DiaryStore, Arc<MemoryStorage>, Arc<FixedClock>) {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(FixedClock::new(now()));
        let store = DiaryStore::open(storage.clone(), options(clock.clone())).await;
        (store, storage, clock)
    }

    fn medium_void() -> NewUrination {
        NewUrination::new(VolumeSize::Medium, Urgency::new(3).unwrap())
    }

    fn water(ml: u32) -> NewFluid {
        NewFluid::new(DrinkType::Water, NonZeroU32::new(ml).unwrap())
    }

    struct StuckIds;

    impl IdGenerator for StuckIds {
        fn next_id(&self) -> String {
            "same".to_string()
        }
    }

    #[tokio::test]
    async fn test_basic_diary_flow() {
        let (mut store, _, _) = open_memory().await;
        assert!(store.entries().is_empty());

        let entry = store.add_urination_entry(medium_void());
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.entries()[0].entry_type(), EntryType::Urination);
        assert_eq!(store.entries()[0].id, entry.id);
        assert_eq!(entry.timestamp, now());

        assert!(store.delete_entry(&entry.id));
        assert!(store.entries().is_empty());
        assert!(!store.delete_entry(&entry.id));
    }

    #[tokio::test]
    async fn test_ids_stay_unique_when_generator_collides() {
        let storage = Arc::new(MemoryStorage::new());
        let opts = StoreOptions::new()
            .clock(Arc::new(FixedClock::new(now())))
            .ids(Arc::new(StuckIds));
        let mut store = DiaryStore::open(storage, opts).await;

        for _ in 0..5 {
            store.add_fluid_entry(water(100));
        }

        let mut ids: Vec<_> = store.entries().iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_caller_timestamp_and_notes_kept() {
        let (mut store, _, _) = open_memory().await;
        let earlier = now() - ChronoDuration::hours(3);

        let entry = store.add_leak_entry(
            NewLeak::new(LeakSeverity::Drops, Urgency::new(2).unwrap())
                .at(earlier)
                .notes("sneezed"),
        );

        assert_eq!(entry.timestamp, earlier);
        assert_eq!(entry.notes.as_deref(), Some("sneezed"));
        assert_eq!(store.entry(&entry.id), Some(&entry));
    }

    #[tokio::test]
    async fn test_update_entry_history() {
        let (mut store, _, clock) = open_memory().await;
        let entry = store.add_urination_entry(medium_void());
        clock.advance(ChronoDuration::minutes(5));

        let patch = EntryPatch::new()
            .urgency(Urgency::new(5).unwrap())
            .volume(VolumeSize::Medium);
        assert!(store.update_entry(&entry.id, &patch));

        let updated = store.entry(&entry.id).unwrap();
        assert_eq!(updated.edit_history.len(), 1);
        assert_eq!(updated.edit_history[0].edited_at, now() + ChronoDuration::minutes(5));
        assert_eq!(updated.edit_history[0].changes.len(), 1);
        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.entry_type(), EntryType::Urination);

        // Same values again: nothing appended
        assert!(!store.update_entry(&entry.id, &patch));
        assert_eq!(store.entry(&entry.id).unwrap().edit_history.len(), 1);

        assert!(!store.update_entry("missing", &patch));
    }

    #[tokio::test]
    async fn test_clear_preserves_goals() {
        let (mut store, _, _) = open_memory().await;
        store.update_goals(GoalsPatch::new().fluid_target(2500));
        store.set_language(Language::Es);
        for ml in [100, 200, 300] {
            store.add_fluid_entry(water(ml));
        }

        store.clear_all_entries();

        assert!(store.entries().is_empty());
        assert_eq!(store.goals().fluid_target, 2500);
        assert_eq!(store.goal_history().len(), 1);
        assert_eq!(store.language(), Language::Es);
    }

    #[tokio::test]
    async fn test_goal_clamping_and_noop() {
        let (mut store, _, _) = open_memory().await;

        let record = store
            .update_goals(GoalsPatch::new().fluid_target(999_999))
            .unwrap();
        assert_eq!(store.goals().fluid_target, 5000);
        assert_eq!(record.changes["fluidTarget"].from, 2000);
        assert_eq!(record.changes["fluidTarget"].to, 5000);

        assert!(store.update_goals(GoalsPatch::new().fluid_target(6000)).is_none());
        assert!(store.update_goals(GoalsPatch::new().fluid_target(5000)).is_none());
        assert_eq!(store.goal_history().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_streak() {
        let (mut store, _, clock) = open_memory().await;
        assert_eq!(store.refresh_streak(), 0);

        store.add_fluid_entry(water(200).at(now() - ChronoDuration::days(1)));
        store.add_fluid_entry(water(200).at(now() - ChronoDuration::days(2)));
        assert_eq!(store.refresh_streak(), 2);
        assert_eq!(store.refresh_streak(), 2);
        assert_eq!(store.streak().last_computed, Some(clock.today()));

        // Two days later the run is broken but the best run is remembered
        clock.advance(ChronoDuration::days(2));
        assert_eq!(store.refresh_streak(), 0);
        assert_eq!(store.streak().longest_streak, 2);
    }

    #[tokio::test]
    async fn test_preferences() {
        let (mut store, _, _) = open_memory().await;

        store.complete_onboarding();
        assert!(store.has_completed_onboarding());
        store.reset_onboarding();
        assert!(!store.has_completed_onboarding());

        store.set_open_add_menu_on_launch(true);
        assert!(store.open_add_menu_on_launch());

        let err = store.update_reminder_settings(ReminderPatch::new().enabled(true).interval_hours(5));
        assert!(matches!(err, Err(ValidationError::ReminderInterval { got: 5, .. })));
        assert!(!store.reminder_settings().enabled);

        store
            .update_reminder_settings(ReminderPatch::new().enabled(true).interval_hours(2))
            .unwrap();
        assert_eq!(store.reminder_settings().interval_hours, 2);
    }

    #[tokio::test]
    async fn test_snapshots_are_isolated() {
        let (mut store, _, _) = open_memory().await;
        store.add_fluid_entry(water(250));

        let before = store.snapshot();
        store.add_fluid_entry(water(300));

        assert_eq!(before.entries.len(), 1);
        assert_eq!(store.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_mutations_while_hydrating_are_not_persisted() {
        let mut stored = DiaryState::default();
        stored.goals.void_target = 6;
        let json = serde_json::to_string(&stored).unwrap();
        let storage = Arc::new(MemoryStorage::new().with_value(DEFAULT_STATE_KEY, json.clone()));

        let mut store = DiaryStore::new(storage.clone(), options(Arc::new(FixedClock::new(now()))));
        assert_eq!(store.hydration_status(), HydrationStatus::Hydrating);

        store.add_fluid_entry(water(100));
        store.flush().await.unwrap();
        assert_eq!(storage.raw(DEFAULT_STATE_KEY), Some(json));
        assert!(matches!(store.backup_snapshot(), Err(RestoreError::NotHydrated)));

        let outcome = store.hydrate().await;
        assert_eq!(outcome, HydrationOutcome::Loaded { entries: 0 });
        assert!(store.is_hydrated());
        assert!(store.entries().is_empty());
        assert_eq!(store.goals().void_target, 6);
    }

    #[tokio::test]
    async fn test_hydration_failure_degrades_to_defaults() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_failing(true);

        let mut store = DiaryStore::new(storage, options(Arc::new(FixedClock::new(now()))));
        let outcome = store.hydrate().await;

        assert!(matches!(outcome, HydrationOutcome::Failed(_)));
        assert!(store.is_hydrated());
        assert_eq!(*store.snapshot(), DiaryState::default());
    }

    #[tokio::test]
    async fn test_corrupt_payload_degrades_to_defaults() {
        let storage = Arc::new(MemoryStorage::new().with_value(DEFAULT_STATE_KEY, "][ nope"));
        let store = DiaryStore::open(storage, options(Arc::new(FixedClock::new(now())))).await;

        assert!(store.is_hydrated());
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory() {
        let (mut store, storage, _) = open_memory().await;
        storage.set_failing(true);

        store.add_fluid_entry(water(500));
        assert!(matches!(store.flush().await, Err(PersistenceError::Backend(_))));
        assert_eq!(store.entries().len(), 1);

        storage.set_failing(false);
        store.set_language(Language::Pt);
        assert!(store.flush().await.is_ok());
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let dir = tempdir().unwrap();
        let clock = Arc::new(FixedClock::new(now()));

        let mut store =
            DiaryStore::open(Arc::new(FileStorage::new(dir.path())), options(clock.clone())).await;
        let entry = store.add_urination_entry(medium_void().volume_ml(NonZeroU32::new(320).unwrap()));
        store.update_goals(GoalsPatch::new().void_target(6));
        store.complete_onboarding();
        store.shutdown().await.unwrap();

        let reopened = DiaryStore::open(Arc::new(FileStorage::new(dir.path())), options(clock)).await;
        assert_eq!(reopened.entries().to_vec(), vec![entry]);
        assert_eq!(reopened.goals().void_target, 6);
        assert!(reopened.has_completed_onboarding());
    }

    #[tokio::test]
    async fn test_backup_round_trip_into_fresh_store() {
        let (mut source, _, _) = open_memory().await;
        source.add_urination_entry(medium_void().had_pain(true));
        source.add_fluid_entry(water(330).notes("lunch"));
        source.update_goals(GoalsPatch::new().fluid_target(1800).void_target(7));
        source.set_language(Language::Pt);
        source.refresh_streak();

        let backup = source.backup_snapshot().unwrap();
        assert_eq!(backup.version, BACKUP_VERSION);

        let (mut target, _, _) = open_memory().await;
        let summary = target.restore_backup(backup).unwrap();

        assert_eq!(summary.entries, 2);
        assert_eq!(target.entries(), source.entries());
        assert_eq!(target.goals(), source.goals());
        assert_eq!(target.goal_history(), source.goal_history());
        assert_eq!(target.language(), source.language());
        assert_eq!(target.streak(), source.streak());
    }

    #[tokio::test]
    async fn test_rejected_restore_leaves_state_untouched() {
        let (mut store, _, _) = open_memory().await;
        store.add_fluid_entry(water(250));
        let before = store.snapshot();

        let mut future = store.backup_snapshot().unwrap();
        future.version = BACKUP_VERSION + 1;
        future.entries.clear();
        assert!(matches!(
            store.restore_backup(future),
            Err(RestoreError::UnsupportedVersion { .. })
        ));

        assert!(matches!(
            store.restore_from_bytes(b"{\"version\": 2, \"entries\": 12}"),
            Err(RestoreError::Malformed(_))
        ));

        assert_eq!(*store.snapshot(), *before);
    }

    #[tokio::test]
    async fn test_unsaved_changes_until_flushed() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(FixedClock::new(now()));
        let mut store = DiaryStore::new(storage.clone(), options(clock));

        store.add_fluid_entry(water(250));
        assert!(!store.has_unsaved_changes());

        store.hydrate().await;
        assert!(!store.has_unsaved_changes());

        // Single-threaded runtime: the writer cannot run before the next await
        store.add_fluid_entry(water(300));
        assert!(store.has_unsaved_changes());

        store.flush().await.unwrap();
        assert!(!store.has_unsaved_changes());
        assert!(storage.get(DEFAULT_STATE_KEY).await.unwrap().is_some());

        store.shutdown().await.unwrap();
    }
}
