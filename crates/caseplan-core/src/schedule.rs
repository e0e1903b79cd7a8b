//! Initial schedule computation.
//!
//! [`ScheduleCalculator`] turns a validated [`StepGraph`] and a goal date
//! into a `(start_date, due_date)` pair for every step, in one forward pass
//! over the topological order. The computation is pure: identical inputs
//! produce identical output, with no hidden clock.

use std::collections::BTreeMap;

use jiff::civil::Date;
use jiff::Span;

use crate::calendar::{adjust_to_business_day, AdjustDirection, BusinessCalendar};
use crate::error::{Result, ScheduleError};
use crate::graph::StepGraph;
use crate::models::{OffsetBasis, StepInstance, StepStatus};

/// Tunable scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePolicy {
    /// Calendar days between a step's start date and its due date. A value
    /// of zero (or less) collapses the start date onto the due date.
    pub start_window_days: i64,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            start_window_days: 7,
        }
    }
}

/// Computed dates for a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Template sequence number
    pub seq: u32,
    /// First day work on the step is expected
    pub start_date: Date,
    /// Day the step is due
    pub due_date: Date,
}

/// The computed schedule for a whole graph, ordered topologically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Entries in the graph's topological order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Dates for one step, if present.
    pub fn dates_for(&self, seq: u32) -> Option<ScheduleEntry> {
        self.entries.iter().find(|e| e.seq == seq).copied()
    }

    /// Due dates keyed by sequence number.
    pub fn due_dates(&self) -> BTreeMap<u32, Date> {
        self.entries.iter().map(|e| (e.seq, e.due_date)).collect()
    }
}

/// Computes initial schedules for cases created from a template.
#[derive(Debug, Clone)]
pub struct ScheduleCalculator<C: BusinessCalendar> {
    calendar: C,
    policy: SchedulePolicy,
}

impl<C: BusinessCalendar> ScheduleCalculator<C> {
    /// Creates a calculator over the given business calendar with the
    /// default policy.
    pub fn new(calendar: C) -> Self {
        Self {
            calendar,
            policy: SchedulePolicy::default(),
        }
    }

    /// Replaces the scheduling policy.
    pub fn with_policy(mut self, policy: SchedulePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Computes `(start_date, due_date)` for every step of `graph`.
    ///
    /// `goal` anchors `goal`-basis steps; `created_at` anchors `prev`-basis
    /// steps without dependencies. A single pass suffices because the graph
    /// is acyclic and the topological order guarantees every dependency is
    /// resolved before its dependents.
    pub fn compute_initial(
        &self,
        graph: &StepGraph,
        goal: Date,
        created_at: Date,
    ) -> Result<Schedule> {
        let mut due_by_seq: BTreeMap<u32, Date> = BTreeMap::new();
        let mut entries = Vec::with_capacity(graph.len());

        for &seq in graph.topological_order() {
            let def = graph.definition(seq).ok_or_else(|| {
                ScheduleError::invalid_input("seq", format!("Step {seq} missing from graph"))
            })?;

            let due = match def.basis {
                OffsetBasis::Goal => {
                    let raw = add_days(goal, i64::from(def.offset_days))?;
                    let direction = if def.offset_days < 0 {
                        AdjustDirection::Backward
                    } else {
                        AdjustDirection::Forward
                    };
                    adjust_to_business_day(raw, direction, &self.calendar)?
                }
                OffsetBasis::Prev => {
                    // Latest predecessor wins: a step cannot start before all
                    // of its prerequisites finish.
                    let reference = def
                        .depends_on
                        .iter()
                        .filter_map(|dep| due_by_seq.get(dep))
                        .max()
                        .copied()
                        .unwrap_or(created_at);
                    let raw = add_days(reference, i64::from(def.offset_days))?;
                    adjust_to_business_day(raw, AdjustDirection::Forward, &self.calendar)?
                }
            };

            let start = self.start_date_for(due)?;
            due_by_seq.insert(seq, due);
            entries.push(ScheduleEntry {
                seq,
                start_date: start,
                due_date: due,
            });
        }

        Ok(Schedule { entries })
    }

    /// Derives a step's start date from its due date per the policy window,
    /// keeping `start <= due`.
    pub(crate) fn start_date_for(&self, due: Date) -> Result<Date> {
        if self.policy.start_window_days <= 0 {
            return Ok(due);
        }
        let raw = add_days(due, -self.policy.start_window_days)?;
        let start = adjust_to_business_day(raw, AdjustDirection::Backward, &self.calendar)?;
        Ok(start.min(due))
    }

    pub(crate) fn calendar(&self) -> &C {
        &self.calendar
    }
}

/// Checked calendar-day addition.
pub(crate) fn add_days(date: Date, days: i64) -> Result<Date> {
    date.checked_add(Span::new().days(days))
        .map_err(|_| ScheduleError::DateOverflow {
            date,
            offset_days: days,
        })
}

/// Materializes step instances from a template snapshot and its computed
/// schedule, in ascending sequence order. IDs are assigned sequentially from
/// `id_base`; all instances start unlocked in `todo`.
pub fn instantiate(graph: &StepGraph, schedule: &Schedule, id_base: u64) -> Vec<StepInstance> {
    graph
        .definitions()
        .enumerate()
        .map(|(i, def)| {
            let dates = schedule.dates_for(def.seq);
            StepInstance {
                id: id_base + i as u64,
                template_step_seq: def.seq,
                name: def.name.clone(),
                status: StepStatus::Todo,
                due_date: dates.map(|d| d.due_date),
                start_date: dates.map(|d| d.start_date),
                locked: false,
            }
        })
        .collect()
}
