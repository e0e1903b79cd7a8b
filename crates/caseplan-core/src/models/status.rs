//! Status enumeration for step instances.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of step instance statuses.
///
/// Status transitions are driven by the surrounding application; the
/// scheduler carries the status through unchanged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step is pending
    #[default]
    Todo,

    /// Step is being worked on
    InProgress,

    /// Step has been completed
    Done,

    /// Step is waiting on something outside the case
    Blocked,

    /// Step was cancelled and will not be completed
    Cancelled,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(StepStatus::Todo),
            "inprogress" | "in_progress" => Ok(StepStatus::InProgress),
            "done" => Ok(StepStatus::Done),
            "blocked" => Ok(StepStatus::Blocked),
            "cancelled" => Ok(StepStatus::Cancelled),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Todo => "todo",
            StepStatus::InProgress => "in_progress",
            StepStatus::Done => "done",
            StepStatus::Blocked => "blocked",
            StepStatus::Cancelled => "cancelled",
        }
    }
}
