//! Persistence collaborator interface for applying replans.
//!
//! The engine never talks to a database; committing a replan goes through
//! [`ScheduleStore`], which the surrounding application implements over its
//! persistence layer. [`InMemoryStore`] is the reference implementation used
//! by the tests and the CLI.

use jiff::civil::Date;

use crate::error::{Result, ScheduleError};
use crate::models::CaseSchedule;

/// The two things the engine is allowed to ask of persistence: the case's
/// optimistic version, and idempotent date writes keyed by step instance ID.
pub trait ScheduleStore {
    /// Current optimistic version of the stored case.
    fn version(&self) -> u64;

    /// Stored `(start_date, due_date)` for a step instance.
    fn step_dates(&self, step_id: u64) -> Result<(Option<Date>, Option<Date>)>;

    /// Writes a step instance's dates. Writing values equal to the stored
    /// ones must be a no-op.
    fn write_step_dates(&mut self, step_id: u64, start: Option<Date>, due: Date) -> Result<()>;

    /// Bumps the version after a batch of writes and returns the new value.
    fn bump_version(&mut self) -> u64;
}

/// In-memory store over a [`CaseSchedule`].
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    case: CaseSchedule,
}

impl InMemoryStore {
    /// Wraps a case record.
    pub fn new(case: CaseSchedule) -> Self {
        Self { case }
    }

    /// Read access to the wrapped case.
    pub fn case(&self) -> &CaseSchedule {
        &self.case
    }

    /// Consumes the store, returning the (possibly updated) case.
    pub fn into_case(self) -> CaseSchedule {
        self.case
    }
}

impl ScheduleStore for InMemoryStore {
    fn version(&self) -> u64 {
        self.case.version
    }

    fn step_dates(&self, step_id: u64) -> Result<(Option<Date>, Option<Date>)> {
        self.case
            .instances
            .iter()
            .find(|i| i.id == step_id)
            .map(|i| (i.start_date, i.due_date))
            .ok_or(ScheduleError::StepNotFound { id: step_id })
    }

    fn write_step_dates(&mut self, step_id: u64, start: Option<Date>, due: Date) -> Result<()> {
        let instance = self
            .case
            .instances
            .iter_mut()
            .find(|i| i.id == step_id)
            .ok_or(ScheduleError::StepNotFound { id: step_id })?;
        instance.start_date = start;
        instance.due_date = Some(due);
        Ok(())
    }

    fn bump_version(&mut self) -> u64 {
        self.case.version += 1;
        self.case.version
    }
}
