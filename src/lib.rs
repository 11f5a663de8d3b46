//! # Bladder Diary
//!
//! Local-first diary for voids, fluid intake and leaks, with daily goals,
//! streaks, reminders, derived insights and portable backups.
//!
//! ## Features
//!
//! - **Single-owner store**: Every mutation goes through [`diary::DiaryStore`]
//! - **Durable by default**: Snapshots persisted in the background, tolerant of old data
//! - **Insights**: Daily rollups, weekly/monthly series, fluid balance and trends
//! - **Portability**: CSV/JSON exports, versioned JSON or LZ4-compressed backups
//!
//! ## Modules
//!
//! - [`diary`]: Entries, goals, streak, persistence and the store
//! - [`query`]: Pure queries over snapshots
//! - [`reminders`]: Quiet hours and reminder scheduling
//! - [`export`]: Backups, restores and entry exports
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bladder_diary::diary::*;
//! use bladder_diary::query::{daily_rollup, goal_progress};
//! use std::num::NonZeroU32;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Arc::new(FileStorage::new("./bladder_diary_data"));
//!     let mut store = DiaryStore::open(storage, StoreOptions::default()).await;
//!
//!     store.add_fluid_entry(NewFluid::new(DrinkType::Water, NonZeroU32::new(250).unwrap()));
//!     store.add_urination_entry(NewUrination::new(VolumeSize::Medium, Urgency::new(2)?));
//!
//!     let today = store.clock().today();
//!     let rollup = daily_rollup(store.entries(), today, &chrono::Local);
//!     let progress = goal_progress(&rollup, &store.goals());
//!     println!("{} / {} ml today", progress.fluid_ml, progress.fluid_target);
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod diary;
pub mod export;
pub mod query;
pub mod reminders;

pub use config::Config;
pub use diary::{DiaryEntry, DiaryState, DiaryStore, EntryKind, StoreOptions};
pub use export::{BackupEncoding, BackupSnapshot, ExportSink, FileSink};
