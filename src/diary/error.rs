//! Diary error types
//!
//! Validation failures are reported synchronously to the caller and are never
//! partially applied. Persistence failures are swallowed by the store and only
//! surface through `DiaryStore::flush`.

use thiserror::Error;

/// Rejection of malformed entry, goal or reminder input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The candidate is not a JSON object
    #[error("Entry must be a JSON object")]
    NotAnObject,

    /// A required field is absent or null
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    /// A field is present but has the wrong JSON type
    #[error("Field `{field}` has the wrong type: expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// A field holds a value outside its enumerated set
    #[error("Field `{field}` has invalid value `{value}`")]
    InvalidValue { field: &'static str, value: String },

    /// The `type` discriminant is not one of the known entry kinds
    #[error("Unknown entry type `{0}`")]
    UnknownType(String),

    /// Entry id is empty, too long or contains unsupported characters
    #[error("Invalid entry id `{0}`")]
    InvalidId(String),

    /// Timestamp does not parse as an RFC 3339 instant
    #[error("Invalid timestamp `{0}`")]
    InvalidTimestamp(String),

    /// A quantity that must be strictly positive is zero, negative or fractional
    #[error("Field `{0}` must be a positive integer")]
    NotPositive(&'static str),

    /// Urgency outside 1..=5
    #[error("Urgency must be between 1 and 5, got {0}")]
    UrgencyOutOfRange(i64),

    /// Clock time not in HH:mm form
    #[error("Invalid time of day `{0}`, expected HH:mm")]
    InvalidTimeOfDay(String),

    /// Reminder interval not in the supported set
    #[error("Reminder interval must be one of {allowed:?} hours, got {got}")]
    ReminderInterval { got: u32, allowed: &'static [u32] },
}

/// Durable storage read/write failure
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored payload could not be serialized or parsed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage backend reported a failure
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// The background writer is no longer running
    #[error("Snapshot writer stopped before the write completed")]
    WriterStopped,
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

/// Result type alias for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type alias for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::MissingField("urgency");
        assert_eq!(err.to_string(), "Missing required field `urgency`");

        let err = ValidationError::ReminderInterval {
            got: 5,
            allowed: &[2, 3, 4, 6],
        };
        assert_eq!(
            err.to_string(),
            "Reminder interval must be one of [2, 3, 4, 6] hours, got 5"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: PersistenceError = io_err.into();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}
