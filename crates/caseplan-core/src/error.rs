//! Error types for the scheduling engine.

use jiff::civil::Date;
use thiserror::Error;

/// Comprehensive error type for all scheduling operations.
///
/// Every variant is a deterministic validation or computation failure; none
/// is transient, so callers translate these into user-facing messages rather
/// than retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Two step definitions share the same sequence number
    #[error("Duplicate step sequence number {seq}")]
    DuplicateSeq { seq: u32 },

    /// A dependency references a sequence number that does not exist in the
    /// template
    #[error("Step {seq} depends on unknown step {depends_on}")]
    UnknownDependency { seq: u32, depends_on: u32 },

    /// A step lists its own sequence number as a dependency
    #[error("Step {seq} depends on itself")]
    SelfDependency { seq: u32 },

    /// The dependency edges form a cycle
    #[error("Dependency cycle detected involving steps {members:?}")]
    CycleDetected { members: Vec<u32> },

    /// No business day was found within the adjustment bound; indicates a
    /// malformed calendar rather than bad template data
    #[error(
        "No business day found within {attempted_days} days of {date}; check the calendar"
    )]
    CalendarAdjustmentExhausted { date: Date, attempted_days: u32 },

    /// The case changed between `preview` and `apply`; re-preview and retry
    #[error("Schedule version changed (expected {expected}, found {actual}); re-run preview")]
    StaleSchedule { expected: u64, actual: u64 },

    /// Step instance not found for the given ID
    #[error("Step instance with ID {id} not found")]
    StepNotFound { id: u64 },

    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Date arithmetic left the representable range (defensive; offsets are
    /// bounded by validation)
    #[error("Date arithmetic overflow: {date} + {offset_days} days")]
    DateOverflow { date: Date, offset_days: i64 },
}

impl ScheduleError {
    /// Creates an input validation error for a named field.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScheduleError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for scheduling operations
pub type Result<T> = std::result::Result<T, ScheduleError>;
