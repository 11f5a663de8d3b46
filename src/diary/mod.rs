//! Bladder diary core
//!
//! The aggregate state and everything that mutates it:
//!
//! - **entry**: Entry sum type, patches and add-inputs
//! - **types**: Goals, streak, reminder settings, language, `DiaryState`
//! - **validation**: Runtime validation of untyped entry candidates
//! - **goals**: Goal clamping and history diffing
//! - **streak**: Consecutive-day streak calculation
//! - **clock**: Clock and id collaborators
//! - **persistence**: Key-value backends, migration merge, background writer
//! - **store**: `DiaryStore`, the single owner of the state
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Action:
//!   DiaryStore::add_* / update_* → Arc<DiaryState> (copy-on-write) → SnapshotWriter
//!
//! Startup:
//!   DiaryStore::hydrate → KeyValueStorage::get → merge_with_defaults
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bladder_diary::diary::{DiaryStore, FileStorage, NewUrination, StoreOptions, Urgency, VolumeSize};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Arc::new(FileStorage::new("./data"));
//!     let mut store = DiaryStore::open(storage, StoreOptions::default()).await;
//!
//!     store.add_urination_entry(NewUrination::new(VolumeSize::Medium, Urgency::new(3)?));
//!     println!("Current streak: {}", store.refresh_streak());
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod entry;
pub mod error;
pub mod goals;
pub mod persistence;
pub mod store;
pub mod streak;
pub mod types;
pub mod validation;

pub use clock::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use entry::{
    DiaryEntry, DrinkType, EditRecord, EntryKind, EntryPatch, EntryType, FieldChange,
    LeakActivity, LeakSeverity, NewFluid, NewLeak, NewUrination, Urgency, VolumeSize,
};
pub use error::{PersistenceError, PersistenceResult, ValidationError, ValidationResult};
pub use goals::{clamp_fluid_target, clamp_goals, clamp_void_target, diff_goals, GoalDiff};
pub use persistence::{
    load_state, merge_with_defaults, save_state, FileStorage, KeyValueStorage, MemoryStorage,
    SnapshotWriter, WriteStatus, DEFAULT_STATE_KEY,
};
pub use store::{DiaryStore, HydrationOutcome, HydrationStatus, StoreOptions};
pub use streak::{current_streak, current_streak_in};
pub use types::{
    parse_time_of_day, DailyGoals, DiaryState, GoalChange, GoalHistoryRecord, GoalsPatch,
    Language, ReminderPatch, ReminderSettings, StreakInfo, REMINDER_INTERVALS,
};
pub use validation::{parse_timestamp, validate_entry, validate_id, MAX_ID_LEN};
