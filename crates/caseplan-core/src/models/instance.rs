//! Case step instances and the case schedule record.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::StepStatus;

/// A mutable step instance belonging to one case.
///
/// Instances are created once per case from the template snapshot and are
/// mutated in place by the scheduler and by status transitions; they are
/// never deleted individually.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepInstance {
    /// Unique identifier for the instance
    pub id: u64,

    /// Sequence number of the [`super::StepDefinition`] this was generated
    /// from
    pub template_step_seq: u32,

    /// Human-readable step name, copied from the definition
    pub name: String,

    /// Current status of the step
    pub status: StepStatus,

    /// Computed due date, `None` until the initial schedule runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,

    /// Computed start date, `None` until the initial schedule runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,

    /// When true, replanning must not change this instance's dates
    #[serde(default)]
    pub locked: bool,
}

/// A case as the scheduling engine sees it: the goal date driving the
/// schedule, the creation date anchoring dependency-less `prev` steps, an
/// optimistic version counter, and one instance per template step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseSchedule {
    /// Target completion date for the whole case
    pub goal_date: Date,

    /// Date the case was created
    pub created_at: Date,

    /// Optimistic concurrency version, bumped whenever instance dates change
    #[serde(default)]
    pub version: u64,

    /// One instance per step definition in the originating template
    pub instances: Vec<StepInstance>,
}

impl CaseSchedule {
    /// Looks up an instance by its template sequence number.
    pub fn instance_for_seq(&self, seq: u32) -> Option<&StepInstance> {
        self.instances.iter().find(|i| i.template_step_seq == seq)
    }
}
