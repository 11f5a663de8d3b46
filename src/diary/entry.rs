//! Diary entry model
//!
//! Every entry shares an id, a timestamp, optional notes and an append-only
//! edit history. The kind-specific fields live in [`EntryKind`], which is
//! serialized flat next to the common fields with a `type` discriminant:
//!
//! ```json
//! { "id": "…", "type": "fluid", "timestamp": "2024-01-15T08:30:00Z",
//!   "drinkType": "coffee", "amount": 250, "editHistory": [] }
//! ```

use crate::diary::error::{ValidationError, ValidationResult};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Size bucket of a void
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VolumeSize {
    Small,
    Medium,
    Large,
}

impl VolumeSize {
    pub fn all() -> &'static [VolumeSize] {
        &[VolumeSize::Small, VolumeSize::Medium, VolumeSize::Large]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeSize::Small => "small",
            VolumeSize::Medium => "medium",
            VolumeSize::Large => "large",
        }
    }

    /// Estimated output in millilitres when no precise volume was recorded
    pub fn estimated_ml(&self) -> u32 {
        match self {
            VolumeSize::Small => 100,
            VolumeSize::Medium => 250,
            VolumeSize::Large => 400,
        }
    }
}

/// What was drunk
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DrinkType {
    Water,
    Coffee,
    Tea,
    Juice,
    Alcohol,
    Other,
}

impl DrinkType {
    pub fn all() -> &'static [DrinkType] {
        &[
            DrinkType::Water,
            DrinkType::Coffee,
            DrinkType::Tea,
            DrinkType::Juice,
            DrinkType::Alcohol,
            DrinkType::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrinkType::Water => "water",
            DrinkType::Coffee => "coffee",
            DrinkType::Tea => "tea",
            DrinkType::Juice => "juice",
            DrinkType::Alcohol => "alcohol",
            DrinkType::Other => "other",
        }
    }
}

/// Amount lost in a leak
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LeakSeverity {
    Drops,
    Moderate,
    Full,
}

impl LeakSeverity {
    pub fn all() -> &'static [LeakSeverity] {
        &[LeakSeverity::Drops, LeakSeverity::Moderate, LeakSeverity::Full]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeakSeverity::Drops => "drops",
            LeakSeverity::Moderate => "moderate",
            LeakSeverity::Full => "full",
        }
    }
}

/// Activity that triggered a leak
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LeakActivity {
    Coughing,
    Sneezing,
    Laughing,
    Exercise,
    Lifting,
    Other,
}

impl LeakActivity {
    pub fn all() -> &'static [LeakActivity] {
        &[
            LeakActivity::Coughing,
            LeakActivity::Sneezing,
            LeakActivity::Laughing,
            LeakActivity::Exercise,
            LeakActivity::Lifting,
            LeakActivity::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeakActivity::Coughing => "coughing",
            LeakActivity::Sneezing => "sneezing",
            LeakActivity::Laughing => "laughing",
            LeakActivity::Exercise => "exercise",
            LeakActivity::Lifting => "lifting",
            LeakActivity::Other => "other",
        }
    }
}

fn parse_member<T: Copy>(
    all: &[T],
    name: impl Fn(&T) -> &'static str,
    field: &'static str,
    s: &str,
) -> ValidationResult<T> {
    let wanted = s.trim().to_lowercase();
    all.iter()
        .copied()
        .find(|v| name(v) == wanted)
        .ok_or_else(|| ValidationError::InvalidValue {
            field,
            value: s.to_string(),
        })
}

impl FromStr for VolumeSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_member(Self::all(), Self::as_str, "volume", s)
    }
}

impl FromStr for DrinkType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_member(Self::all(), Self::as_str, "drinkType", s)
    }
}

impl FromStr for LeakSeverity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_member(Self::all(), Self::as_str, "severity", s)
    }
}

impl FromStr for LeakActivity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_member(Self::all(), Self::as_str, "activity", s)
    }
}

/// Urgency rating on a 1 (none) to 5 (desperate) scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Urgency(u8);

impl Urgency {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> ValidationResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::UrgencyOutOfRange(value as i64))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Urgency {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Urgency::new(value)
    }
}

impl From<Urgency> for u8 {
    fn from(urgency: Urgency) -> Self {
        urgency.0
    }
}

impl FromStr for Urgency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.trim().parse().map_err(|_| ValidationError::InvalidValue {
            field: "urgency",
            value: s.to_string(),
        })?;
        u8::try_from(value)
            .map_err(|_| ValidationError::UrgencyOutOfRange(value))
            .and_then(Urgency::new)
    }
}

/// Discriminant of an entry, useful for filtering and display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Urination,
    Fluid,
    Leak,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Urination => "urination",
            EntryType::Fluid => "fluid",
            EntryType::Leak => "leak",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific entry fields, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryKind {
    Urination {
        volume: VolumeSize,
        /// Precise measurement overriding the size bucket
        #[serde(rename = "volumeMl", default, skip_serializing_if = "Option::is_none")]
        volume_ml: Option<NonZeroU32>,
        urgency: Urgency,
        #[serde(rename = "hadLeak")]
        had_leak: bool,
        #[serde(rename = "hadPain")]
        had_pain: bool,
    },
    Fluid {
        #[serde(rename = "drinkType")]
        drink_type: DrinkType,
        /// Millilitres
        amount: NonZeroU32,
    },
    Leak {
        severity: LeakSeverity,
        urgency: Urgency,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        activity: Option<LeakActivity>,
    },
}

impl EntryKind {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryKind::Urination { .. } => EntryType::Urination,
            EntryKind::Fluid { .. } => EntryType::Fluid,
            EntryKind::Leak { .. } => EntryType::Leak,
        }
    }
}

/// Before/after pair for one edited field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub from: Value,
    pub to: Value,
}

impl FieldChange {
    pub fn new<T: Serialize>(from: &T, to: &T) -> Self {
        Self {
            from: serde_json::json!(from),
            to: serde_json::json!(to),
        }
    }
}

/// One `update_entry` call's worth of changes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    pub edited_at: DateTime<Utc>,
    /// Wire field name to change
    pub changes: BTreeMap<String, FieldChange>,
}

/// A single diary entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    /// Assigned at creation, never changes
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub edit_history: Vec<EditRecord>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl DiaryEntry {
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            timestamp,
            notes: None,
            edit_history: Vec::new(),
            kind,
        }
    }

    /// Builder method: set notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn entry_type(&self) -> EntryType {
        self.kind.entry_type()
    }

    /// Calendar day of this entry in the given timezone
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.timestamp.with_timezone(tz).date_naive()
    }

    /// Apply a patch, appending one edit record with the fields that changed.
    ///
    /// Fields that do not belong to this entry's kind are ignored. Returns
    /// `false` and leaves the history untouched when nothing changed.
    pub fn apply_patch(&mut self, patch: &EntryPatch, edited_at: DateTime<Utc>) -> bool {
        let mut changes = BTreeMap::new();

        set_field(&mut changes, "timestamp", &mut self.timestamp, patch.timestamp);
        set_field(&mut changes, "notes", &mut self.notes, patch.notes.clone());

        match &mut self.kind {
            EntryKind::Urination {
                volume,
                volume_ml,
                urgency,
                had_leak,
                had_pain,
            } => {
                set_field(&mut changes, "volume", volume, patch.volume);
                set_field(&mut changes, "volumeMl", volume_ml, patch.volume_ml);
                set_field(&mut changes, "urgency", urgency, patch.urgency);
                set_field(&mut changes, "hadLeak", had_leak, patch.had_leak);
                set_field(&mut changes, "hadPain", had_pain, patch.had_pain);
            }
            EntryKind::Fluid { drink_type, amount } => {
                set_field(&mut changes, "drinkType", drink_type, patch.drink_type);
                set_field(&mut changes, "amount", amount, patch.amount);
            }
            EntryKind::Leak {
                severity,
                urgency,
                activity,
            } => {
                set_field(&mut changes, "severity", severity, patch.severity);
                set_field(&mut changes, "urgency", urgency, patch.urgency);
                set_field(&mut changes, "activity", activity, patch.activity);
            }
        }

        if changes.is_empty() {
            return false;
        }

        self.edit_history.push(EditRecord { edited_at, changes });
        true
    }
}

fn set_field<T: PartialEq + Serialize>(
    changes: &mut BTreeMap<String, FieldChange>,
    name: &str,
    slot: &mut T,
    next: Option<T>,
) {
    if let Some(next) = next {
        if *slot != next {
            changes.insert(name.to_string(), FieldChange::new(&*slot, &next));
            *slot = next;
        }
    }
}

/// Partial update for an existing entry.
///
/// `None` leaves a field alone. For optional fields `Some(None)` clears the
/// value; in JSON that is an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub volume: Option<VolumeSize>,
    #[serde(default, deserialize_with = "double_option")]
    pub volume_ml: Option<Option<NonZeroU32>>,
    pub urgency: Option<Urgency>,
    pub had_leak: Option<bool>,
    pub had_pain: Option<bool>,
    pub drink_type: Option<DrinkType>,
    pub amount: Option<NonZeroU32>,
    pub severity: Option<LeakSeverity>,
    #[serde(default, deserialize_with = "double_option")]
    pub activity: Option<Option<LeakActivity>>,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn volume(mut self, volume: VolumeSize) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn volume_ml(mut self, volume_ml: Option<NonZeroU32>) -> Self {
        self.volume_ml = Some(volume_ml);
        self
    }

    pub fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    pub fn had_leak(mut self, had_leak: bool) -> Self {
        self.had_leak = Some(had_leak);
        self
    }

    pub fn had_pain(mut self, had_pain: bool) -> Self {
        self.had_pain = Some(had_pain);
        self
    }

    pub fn drink_type(mut self, drink_type: DrinkType) -> Self {
        self.drink_type = Some(drink_type);
        self
    }

    pub fn amount(mut self, amount: NonZeroU32) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn severity(mut self, severity: LeakSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn activity(mut self, activity: Option<LeakActivity>) -> Self {
        self.activity = Some(activity);
        self
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Input for a new void; id and default timestamp are assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrination {
    pub volume: VolumeSize,
    pub volume_ml: Option<NonZeroU32>,
    pub urgency: Urgency,
    pub had_leak: bool,
    pub had_pain: bool,
    pub notes: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewUrination {
    pub fn new(volume: VolumeSize, urgency: Urgency) -> Self {
        Self {
            volume,
            volume_ml: None,
            urgency,
            had_leak: false,
            had_pain: false,
            notes: None,
            timestamp: None,
        }
    }

    pub fn volume_ml(mut self, ml: NonZeroU32) -> Self {
        self.volume_ml = Some(ml);
        self
    }

    pub fn had_leak(mut self, had_leak: bool) -> Self {
        self.had_leak = had_leak;
        self
    }

    pub fn had_pain(mut self, had_pain: bool) -> Self {
        self.had_pain = had_pain;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub(crate) fn into_parts(self) -> (EntryKind, Option<String>, Option<DateTime<Utc>>) {
        let kind = EntryKind::Urination {
            volume: self.volume,
            volume_ml: self.volume_ml,
            urgency: self.urgency,
            had_leak: self.had_leak,
            had_pain: self.had_pain,
        };
        (kind, self.notes, self.timestamp)
    }
}

/// Input for a new drink
#[derive(Debug, Clone, PartialEq)]
pub struct NewFluid {
    pub drink_type: DrinkType,
    pub amount: NonZeroU32,
    pub notes: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewFluid {
    pub fn new(drink_type: DrinkType, amount: NonZeroU32) -> Self {
        Self {
            drink_type,
            amount,
            notes: None,
            timestamp: None,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub(crate) fn into_parts(self) -> (EntryKind, Option<String>, Option<DateTime<Utc>>) {
        let kind = EntryKind::Fluid {
            drink_type: self.drink_type,
            amount: self.amount,
        };
        (kind, self.notes, self.timestamp)
    }
}

/// Input for a new leak
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeak {
    pub severity: LeakSeverity,
    pub urgency: Urgency,
    pub activity: Option<LeakActivity>,
    pub notes: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewLeak {
    pub fn new(severity: LeakSeverity, urgency: Urgency) -> Self {
        Self {
            severity,
            urgency,
            activity: None,
            notes: None,
            timestamp: None,
        }
    }

    pub fn activity(mut self, activity: LeakActivity) -> Self {
        self.activity = Some(activity);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub(crate) fn into_parts(self) -> (EntryKind, Option<String>, Option<DateTime<Utc>>) {
        let kind = EntryKind::Leak {
            severity: self.severity,
            urgency: self.urgency,
            activity: self.activity,
        };
        (kind, self.notes, self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, h, m, 0).unwrap()
    }

    fn urination() -> DiaryEntry {
        DiaryEntry::new(
            "u1",
            at(8, 0),
            EntryKind::Urination {
                volume: VolumeSize::Medium,
                volume_ml: None,
                urgency: Urgency::new(3).unwrap(),
                had_leak: false,
                had_pain: false,
            },
        )
    }

    #[test]
    fn test_entry_serializes_flat_with_type_tag() {
        let entry = DiaryEntry::new(
            "f1",
            at(9, 30),
            EntryKind::Fluid {
                drink_type: DrinkType::Coffee,
                amount: NonZeroU32::new(250).unwrap(),
            },
        );

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "fluid");
        assert_eq!(json["drinkType"], "coffee");
        assert_eq!(json["amount"], 250);
        assert_eq!(json["editHistory"], serde_json::json!([]));
        assert!(json.get("notes").is_none());

        let restored: DiaryEntry = serde_json::from_value(json).unwrap();
        assert_eq!(restored, entry);
    }

    #[test]
    fn test_urgency_bounds() {
        assert!(Urgency::new(0).is_err());
        assert_eq!(Urgency::new(1).unwrap().get(), 1);
        assert_eq!(Urgency::new(5).unwrap().get(), 5);
        assert_eq!(
            Urgency::new(6),
            Err(ValidationError::UrgencyOutOfRange(6))
        );
        assert_eq!("-2".parse::<Urgency>(), Err(ValidationError::UrgencyOutOfRange(-2)));
        assert!(serde_json::from_str::<Urgency>("9").is_err());
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!("Medium".parse::<VolumeSize>().unwrap(), VolumeSize::Medium);
        assert_eq!("tea".parse::<DrinkType>().unwrap(), DrinkType::Tea);
        assert_eq!(
            "gallon".parse::<VolumeSize>(),
            Err(ValidationError::InvalidValue {
                field: "volume",
                value: "gallon".to_string()
            })
        );
    }

    #[test]
    fn test_patch_records_only_changed_fields() {
        let mut entry = urination();
        let patch = EntryPatch::new()
            .volume(VolumeSize::Medium)
            .urgency(Urgency::new(4).unwrap())
            .had_pain(true);

        assert!(entry.apply_patch(&patch, at(10, 0)));
        assert_eq!(entry.edit_history.len(), 1);

        let record = &entry.edit_history[0];
        assert_eq!(record.edited_at, at(10, 0));
        assert_eq!(record.changes.len(), 2);
        assert_eq!(record.changes["urgency"].from, 3);
        assert_eq!(record.changes["urgency"].to, 4);
        assert_eq!(record.changes["hadPain"].to, true);
    }

    #[test]
    fn test_noop_patch_appends_nothing() {
        let mut entry = urination();
        let patch = EntryPatch::new()
            .volume(VolumeSize::Medium)
            .urgency(Urgency::new(3).unwrap());

        assert!(!entry.apply_patch(&patch, at(10, 0)));
        assert!(entry.edit_history.is_empty());
    }

    #[test]
    fn test_patch_ignores_fields_of_other_kinds() {
        let mut entry = urination();
        let patch = EntryPatch::new()
            .amount(NonZeroU32::new(500).unwrap())
            .severity(LeakSeverity::Full);

        assert!(!entry.apply_patch(&patch, at(10, 0)));
        assert_eq!(entry.entry_type(), EntryType::Urination);
    }

    #[test]
    fn test_patch_can_clear_optional_fields() {
        let mut entry = urination().notes("after coffee");
        let patch: EntryPatch = serde_json::from_str(r#"{"notes": null}"#).unwrap();

        assert_eq!(patch.notes, Some(None));
        assert!(entry.apply_patch(&patch, at(11, 0)));
        assert_eq!(entry.notes, None);
        assert_eq!(entry.edit_history[0].changes["notes"].from, "after coffee");
        assert_eq!(entry.edit_history[0].changes["notes"].to, Value::Null);

        let absent: EntryPatch = serde_json::from_str(r#"{"type": "leak"}"#).unwrap();
        assert_eq!(absent, EntryPatch::default());
    }
}
