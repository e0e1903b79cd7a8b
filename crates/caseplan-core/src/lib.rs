//! Core library for the caseplan scheduling engine.
//!
//! This crate computes due dates for cases created from process templates:
//! a template's steps form a dependency DAG, each step carries an offset
//! measured either from the case's goal date or from its prerequisites, and
//! every computed date is shifted onto a business day supplied by an
//! external calendar. Replanning recomputes dates after the goal moves
//! while honoring locked steps, and reports the critical path.
//!
//! The whole core is pure and synchronous: building a [`graph::StepGraph`],
//! computing a schedule, and previewing a replan allocate fresh results and
//! never touch shared state, so they are safe to call concurrently. The
//! only effectful operation is [`replan::ReplanEngine::apply`], which
//! commits through a caller-supplied [`store::ScheduleStore`] under an
//! optimistic version check.
//!
//! # Quick Start
//!
//! ```rust
//! use caseplan_core::{
//!     HolidayCalendar, OffsetBasis, ScheduleCalculator, StepDefinition, StepGraph,
//! };
//! use jiff::civil::date;
//!
//! # fn example() -> Result<(), caseplan_core::ScheduleError> {
//! let steps = vec![
//!     StepDefinition {
//!         seq: 1,
//!         name: "Kickoff".to_string(),
//!         basis: OffsetBasis::Prev,
//!         offset_days: 2,
//!         depends_on: vec![],
//!         required_artifacts: serde_json::Value::Null,
//!     },
//!     StepDefinition {
//!         seq: 2,
//!         name: "Deliver".to_string(),
//!         basis: OffsetBasis::Goal,
//!         offset_days: 0,
//!         depends_on: vec![1],
//!         required_artifacts: serde_json::Value::Null,
//!     },
//! ];
//!
//! let graph = StepGraph::build(&steps)?;
//! let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only());
//! let schedule = calculator.compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))?;
//!
//! for entry in schedule.entries() {
//!     println!("step {} due {}", entry.seq, entry.due_date);
//! }
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod critical_path;
pub mod display;
pub mod error;
pub mod graph;
pub mod models;
pub mod replan;
pub mod schedule;
pub mod store;

// Re-export commonly used types
pub use calendar::{
    adjust_to_business_day, AdjustDirection, BusinessCalendar, HolidayCalendar,
};
pub use critical_path::CriticalPathFinder;
pub use display::{PathChain, ReplanDiff, ScheduleTable};
pub use error::{Result, ScheduleError};
pub use graph::StepGraph;
pub use models::{CaseSchedule, OffsetBasis, StepDefinition, StepInstance, StepStatus};
pub use replan::{Applied, LockConflict, ReplanEngine, ReplanEntry, ReplanPreview};
pub use schedule::{instantiate, Schedule, ScheduleCalculator, ScheduleEntry, SchedulePolicy};
pub use store::{InMemoryStore, ScheduleStore};
