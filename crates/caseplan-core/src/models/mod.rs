//! Data models for process templates and cases.
//!
//! This module contains the records the scheduling engine operates on:
//! immutable [`StepDefinition`]s that belong to a process template, mutable
//! [`StepInstance`]s that belong to a case, and the [`CaseSchedule`] wrapper
//! that carries a case's goal date, creation date, and optimistic version.
//!
//! The engine treats these as plain data. Persistence, editing, and status
//! workflows live in the surrounding application; the only behavior defined
//! here is field-level validation and status parsing.

pub mod definition;
pub mod instance;
pub mod status;


pub use definition::{OffsetBasis, StepDefinition};
pub use instance::{CaseSchedule, StepInstance};
pub use status::StepStatus;
