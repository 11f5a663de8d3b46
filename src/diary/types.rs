//! Diary state types
//!
//! Everything except entries lives here:
//! - `DailyGoals` / `GoalHistoryRecord`: targets and their change log
//! - `StreakInfo`: cached streak bookkeeping
//! - `ReminderSettings`: reminder cadence and quiet hours
//! - `Language`: UI language preference
//! - `DiaryState`: the aggregate root persisted as one JSON object
//!
//! Every struct here deserializes with per-field defaults so older payloads
//! missing newer fields still load.

use crate::diary::entry::DiaryEntry;
use crate::diary::error::{ValidationError, ValidationResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Daily intake and void targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyGoals {
    /// Millilitres, within [`DailyGoals::FLUID_MIN`, `DailyGoals::FLUID_MAX`]
    pub fluid_target: u32,
    /// Voids per day, within [`DailyGoals::VOID_MIN`, `DailyGoals::VOID_MAX`]
    pub void_target: u32,
}

impl DailyGoals {
    pub const FLUID_MIN: u32 = 500;
    pub const FLUID_MAX: u32 = 5000;
    pub const VOID_MIN: u32 = 3;
    pub const VOID_MAX: u32 = 15;
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            fluid_target: 2000,
            void_target: 8,
        }
    }
}

/// Partial goal update; values may be out of range and are clamped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsPatch {
    pub fluid_target: Option<i64>,
    pub void_target: Option<i64>,
}

impl GoalsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fluid_target(mut self, ml: i64) -> Self {
        self.fluid_target = Some(ml);
        self
    }

    pub fn void_target(mut self, voids: i64) -> Self {
        self.void_target = Some(voids);
        self
    }
}

/// Before/after values of one goal field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalChange {
    pub from: u32,
    pub to: u32,
}

/// One effective `update_goals` call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalHistoryRecord {
    pub changed_at: DateTime<Utc>,
    /// Goal field name (`fluidTarget`, `voidTarget`) to change
    pub changes: BTreeMap<String, GoalChange>,
}

/// Cached streak, refreshed on demand
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Local day of the last refresh
    pub last_computed: Option<NaiveDate>,
}

impl StreakInfo {
    /// Record a freshly computed streak for `today`
    pub fn record(&mut self, current: u32, today: NaiveDate) {
        self.current_streak = current;
        self.longest_streak = self.longest_streak.max(current);
        self.last_computed = Some(today);
    }
}

/// Supported reminder cadences in hours
pub const REMINDER_INTERVALS: &[u32] = &[2, 3, 4, 6];

/// Reminder cadence and quiet-hours window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub interval_hours: u32,
    pub quiet_hours_enabled: bool,
    /// Start of the quiet window; may be later than the end (wraps midnight)
    #[serde(with = "hhmm")]
    pub quiet_hours_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub quiet_hours_end: NaiveTime,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_hours: 3,
            quiet_hours_enabled: true,
            quiet_hours_start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            quiet_hours_end: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
        }
    }
}

/// Partial reminder settings update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderPatch {
    pub enabled: Option<bool>,
    pub interval_hours: Option<u32>,
    pub quiet_hours_enabled: Option<bool>,
    pub quiet_hours_start: Option<NaiveTime>,
    pub quiet_hours_end: Option<NaiveTime>,
}

impl ReminderPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn interval_hours(mut self, hours: u32) -> Self {
        self.interval_hours = Some(hours);
        self
    }

    pub fn quiet_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.quiet_hours_enabled = Some(true);
        self.quiet_hours_start = Some(start);
        self.quiet_hours_end = Some(end);
        self
    }

    pub fn quiet_hours_enabled(mut self, enabled: bool) -> Self {
        self.quiet_hours_enabled = Some(enabled);
        self
    }

    /// Apply to `settings`, rejecting unsupported intervals without touching anything
    pub fn apply_to(&self, settings: &ReminderSettings) -> ValidationResult<ReminderSettings> {
        if let Some(hours) = self.interval_hours {
            if !REMINDER_INTERVALS.contains(&hours) {
                return Err(ValidationError::ReminderInterval {
                    got: hours,
                    allowed: REMINDER_INTERVALS,
                });
            }
        }

        Ok(ReminderSettings {
            enabled: self.enabled.unwrap_or(settings.enabled),
            interval_hours: self.interval_hours.unwrap_or(settings.interval_hours),
            quiet_hours_enabled: self
                .quiet_hours_enabled
                .unwrap_or(settings.quiet_hours_enabled),
            quiet_hours_start: self.quiet_hours_start.unwrap_or(settings.quiet_hours_start),
            quiet_hours_end: self.quiet_hours_end.unwrap_or(settings.quiet_hours_end),
        })
    }
}

/// Parse an `HH:mm` clock time
pub fn parse_time_of_day(s: &str) -> ValidationResult<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTimeOfDay(s.to_string()))
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_time_of_day(&s).map_err(serde::de::Error::custom)
    }
}

/// UI language
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Pt,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Language::En, Language::Es, Language::Pt]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Pt => "pt",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Language::all()
            .iter()
            .copied()
            .find(|l| l.code() == code)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "language",
                value: s.to_string(),
            })
    }
}

/// The whole diary, owned by `DiaryStore`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DiaryState {
    pub entries: Vec<DiaryEntry>,
    pub goals: DailyGoals,
    pub goal_history: Vec<GoalHistoryRecord>,
    pub streak: StreakInfo,
    pub reminder_settings: ReminderSettings,
    pub language: Language,
    pub has_completed_onboarding: bool,
    pub open_add_menu_on_launch: bool,
}

impl DiaryState {
    pub fn find_entry(&self, id: &str) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_goals_fill_defaults() {
        let goals: DailyGoals = serde_json::from_str(r#"{"fluidTarget": 2500}"#).unwrap();
        assert_eq!(goals.fluid_target, 2500);
        assert_eq!(goals.void_target, 8);
    }

    #[test]
    fn test_reminder_settings_wire_format() {
        let settings = ReminderSettings::default();
        let json = serde_json::to_value(settings).unwrap();
        assert_eq!(json["quietHoursStart"], "22:00");
        assert_eq!(json["quietHoursEnd"], "07:00");
        assert_eq!(json["intervalHours"], 3);

        let bad = r#"{"quietHoursStart": "25:99"}"#;
        assert!(serde_json::from_str::<ReminderSettings>(bad).is_err());
    }

    #[test]
    fn test_reminder_patch_rejects_unsupported_interval() {
        let settings = ReminderSettings::default();

        let err = ReminderPatch::new().interval_hours(5).apply_to(&settings);
        assert!(matches!(
            err,
            Err(ValidationError::ReminderInterval { got: 5, .. })
        ));

        let updated = ReminderPatch::new()
            .enabled(true)
            .interval_hours(4)
            .apply_to(&settings)
            .unwrap();
        assert!(updated.enabled);
        assert_eq!(updated.interval_hours, 4);
        assert_eq!(updated.quiet_hours_start, settings.quiet_hours_start);
    }

    #[test]
    fn test_streak_record_tracks_longest() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut streak = StreakInfo::default();

        streak.record(4, day);
        streak.record(1, day.succ_opt().unwrap());

        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 4);
        assert_eq!(streak.last_computed, day.succ_opt());
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("PT".parse::<Language>().unwrap(), Language::Pt);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(serde_json::to_string(&Language::Es).unwrap(), "\"es\"");
    }

    #[test]
    fn test_empty_object_is_default_state() {
        let state: DiaryState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, DiaryState::default());
    }
}
