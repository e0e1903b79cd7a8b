//! Template step definitions.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Maximum length of a step name.
pub const MAX_NAME_LEN: usize = 255;

/// Bound on the magnitude of a step's offset, in days.
pub const MAX_OFFSET_DAYS: i32 = 365;

/// The anchor a step's offset is measured from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OffsetBasis {
    /// Offset is measured from the case's goal date; negative means "before
    /// the goal"
    Goal,

    /// Offset is measured from the latest due date among the step's
    /// dependencies (or the case creation date when it has none)
    Prev,
}

impl OffsetBasis {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetBasis::Goal => "goal",
            OffsetBasis::Prev => "prev",
        }
    }
}

/// An immutable step definition belonging to a process template.
///
/// Definitions are snapshotted when a case is created; later template edits
/// never reach existing cases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepDefinition {
    /// Sequence number, unique within the template. Defines declared order,
    /// not execution order.
    pub seq: u32,

    /// Human-readable step name
    pub name: String,

    /// Anchor for the offset
    pub basis: OffsetBasis,

    /// Offset in calendar days relative to the basis
    pub offset_days: i32,

    /// Sequence numbers of steps that must resolve before this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<u32>,

    /// Opaque artifact requirements, passed through without interpretation
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub required_artifacts: serde_json::Value,
}

impl StepDefinition {
    /// Validates the definition's own fields.
    ///
    /// Cross-step rules (unknown dependencies, cycles) are checked by
    /// [`crate::graph::StepGraph::build`].
    pub fn validate(&self) -> Result<()> {
        if self.seq == 0 {
            return Err(ScheduleError::invalid_input(
                "seq",
                "Sequence numbers must be positive",
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ScheduleError::invalid_input(
                "name",
                format!("Step {} has an empty name", self.seq),
            ));
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(ScheduleError::invalid_input(
                "name",
                format!(
                    "Step {} name exceeds {MAX_NAME_LEN} characters",
                    self.seq
                ),
            ));
        }
        if self.offset_days < -MAX_OFFSET_DAYS || self.offset_days > MAX_OFFSET_DAYS {
            return Err(ScheduleError::invalid_input(
                "offset_days",
                format!(
                    "Step {} offset {} is outside [-{MAX_OFFSET_DAYS}, {MAX_OFFSET_DAYS}]",
                    self.seq, self.offset_days
                ),
            ));
        }
        Ok(())
    }
}
