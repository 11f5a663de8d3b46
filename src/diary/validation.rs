//! Runtime validation of untyped entry candidates
//!
//! Used for anything that did not come through the typed `add_*` actions:
//! backup restores, persisted payloads and raw JSON from the UI layer.
//! Unknown fields are ignored so newer payloads still validate.

use crate::diary::entry::{DiaryEntry, EditRecord, EntryKind, Urgency};
use crate::diary::error::{ValidationError, ValidationResult};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::num::NonZeroU32;
use std::str::FromStr;

/// Longest accepted entry id
pub const MAX_ID_LEN: usize = 128;

/// Validate a JSON candidate and build the typed entry
pub fn validate_entry(candidate: &Value) -> ValidationResult<DiaryEntry> {
    let obj = candidate.as_object().ok_or(ValidationError::NotAnObject)?;

    let id = required_str(obj, "id")?;
    validate_id(id)?;

    let timestamp = parse_timestamp(required_str(obj, "timestamp")?)?;
    let notes = optional_str(obj, "notes")?.map(str::to_string);
    let edit_history = edit_history(obj)?;

    let kind = match required_str(obj, "type")? {
        "urination" => EntryKind::Urination {
            volume: required_enum(obj, "volume")?,
            volume_ml: optional_positive(obj, "volumeMl")?,
            urgency: required_urgency(obj)?,
            had_leak: required_bool(obj, "hadLeak")?,
            had_pain: required_bool(obj, "hadPain")?,
        },
        "fluid" => EntryKind::Fluid {
            drink_type: required_enum(obj, "drinkType")?,
            amount: optional_positive(obj, "amount")?
                .ok_or(ValidationError::MissingField("amount"))?,
        },
        "leak" => EntryKind::Leak {
            severity: required_enum(obj, "severity")?,
            urgency: required_urgency(obj)?,
            activity: optional_enum(obj, "activity")?,
        },
        other => return Err(ValidationError::UnknownType(other.to_string())),
    };

    Ok(DiaryEntry {
        id: id.to_string(),
        timestamp,
        notes,
        edit_history,
        kind,
    })
}

/// Check an id is non-empty, bounded and made of safe characters
pub fn validate_id(id: &str) -> ValidationResult<()> {
    let valid = !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidId(id.to_string()))
    }
}

/// Parse an RFC 3339 / ISO-8601 instant
pub fn parse_timestamp(s: &str) -> ValidationResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidTimestamp(s.to_string()))
}

fn present<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn required_str<'a>(obj: &'a Map<String, Value>, field: &'static str) -> ValidationResult<&'a str> {
    optional_str(obj, field)?.ok_or(ValidationError::MissingField(field))
}

fn optional_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> ValidationResult<Option<&'a str>> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "string",
        }),
    }
}

fn required_bool(obj: &Map<String, Value>, field: &'static str) -> ValidationResult<bool> {
    match present(obj, field) {
        None => Err(ValidationError::MissingField(field)),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "boolean",
        }),
    }
}

fn required_enum<T>(obj: &Map<String, Value>, field: &'static str) -> ValidationResult<T>
where
    T: FromStr<Err = ValidationError>,
{
    optional_enum(obj, field)?.ok_or(ValidationError::MissingField(field))
}

fn optional_enum<T>(obj: &Map<String, Value>, field: &'static str) -> ValidationResult<Option<T>>
where
    T: FromStr<Err = ValidationError>,
{
    optional_str(obj, field)?
        .map(|s| {
            s.parse::<T>().map_err(|_| ValidationError::InvalidValue {
                field,
                value: s.to_string(),
            })
        })
        .transpose()
}

fn required_urgency(obj: &Map<String, Value>) -> ValidationResult<Urgency> {
    let value = present(obj, "urgency").ok_or(ValidationError::MissingField("urgency"))?;
    let n = value.as_i64().ok_or(ValidationError::WrongType {
        field: "urgency",
        expected: "integer",
    })?;
    u8::try_from(n)
        .map_err(|_| ValidationError::UrgencyOutOfRange(n))
        .and_then(Urgency::new)
}

fn optional_positive(
    obj: &Map<String, Value>,
    field: &'static str,
) -> ValidationResult<Option<NonZeroU32>> {
    let Some(value) = present(obj, field) else {
        return Ok(None);
    };
    let Value::Number(n) = value else {
        return Err(ValidationError::WrongType {
            field,
            expected: "number",
        });
    };

    n.as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .and_then(NonZeroU32::new)
        .map(Some)
        .ok_or(ValidationError::NotPositive(field))
}

fn edit_history(obj: &Map<String, Value>) -> ValidationResult<Vec<EditRecord>> {
    match present(obj, "editHistory") {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            ValidationError::InvalidValue {
                field: "editHistory",
                value: e.to_string(),
            }
        }),
    }
}
