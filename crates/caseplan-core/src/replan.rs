//! Replanning: recomputing a case's dates after its goal date changes.
//!
//! [`ReplanEngine::preview`] is a pure function over the graph, the current
//! instances, the new goal date, and the lock set; it can be called any
//! number of times and discarded. [`ReplanEngine::apply`] is the only
//! operation with external effect and goes through a version-checked
//! [`ScheduleStore`].
//!
//! Locked steps are fixed anchors: downstream free steps schedule off their
//! frozen dates, while free steps elsewhere follow the new goal. When a lock
//! makes the new goal infeasible for some edge, the conflict is reported on
//! the preview rather than resolved silently; reordering past a user-pinned
//! date would defeat the lock's purpose.

use std::collections::{BTreeMap, BTreeSet};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::calendar::{adjust_to_business_day, AdjustDirection, BusinessCalendar};
use crate::critical_path::CriticalPathFinder;
use crate::error::{Result, ScheduleError};
use crate::graph::StepGraph;
use crate::models::{CaseSchedule, OffsetBasis};
use crate::schedule::{add_days, ScheduleCalculator, SchedulePolicy};
use crate::store::ScheduleStore;

/// One row of a replan diff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplanEntry {
    /// Template sequence number
    pub seq: u32,

    /// Step instance ID the write will be keyed by
    pub step_id: u64,

    /// Step name, for display
    pub name: String,

    /// Due date before the replan, if one was ever computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_due_date: Option<Date>,

    /// Due date after the replan (unchanged for locked steps)
    pub new_due_date: Date,

    /// Start date after the replan; locked steps keep their stored value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_start_date: Option<Date>,

    /// Whether the step was held fixed
    pub is_locked: bool,

    /// Whether the due date differs from the stored one
    pub changed: bool,

    /// Whether this step participates in a lock conflict
    pub conflicted: bool,
}

/// A lock made the new goal infeasible across one dependency edge: the
/// dependent step's date lands before its predecessor's.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockConflict {
    /// The pinned step on the edge
    pub locked_seq: u32,

    /// The recomputed step whose date collides with the pin
    pub free_seq: u32,
}

/// The outcome of a replan preview: per-step diff, surfaced lock conflicts,
/// the critical path under the new dates, and the case version the preview
/// was computed against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplanPreview {
    /// One entry per step, in topological order
    pub entries: Vec<ReplanEntry>,

    /// Lock conflicts, reported rather than resolved
    pub conflicts: Vec<LockConflict>,

    /// Critical path under the new dates, root first
    pub critical_path: Vec<u32>,

    /// Case version the preview was computed from
    pub base_version: u64,
}

impl ReplanPreview {
    /// Entries whose due date actually changed.
    pub fn changed_entries(&self) -> impl Iterator<Item = &ReplanEntry> {
        self.entries.iter().filter(|e| e.changed)
    }

    /// True when at least one lock conflict was detected.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Result of committing a preview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Applied {
    /// Step instance IDs whose dates were written
    pub updated: Vec<u64>,

    /// Store version after the apply
    pub version: u64,
}

/// Recomputes case dates around locked steps and commits the result.
#[derive(Debug, Clone)]
pub struct ReplanEngine<C: BusinessCalendar> {
    calc: ScheduleCalculator<C>,
}

impl<C: BusinessCalendar> ReplanEngine<C> {
    /// Creates an engine over the given business calendar with the default
    /// policy.
    pub fn new(calendar: C) -> Self {
        Self {
            calc: ScheduleCalculator::new(calendar),
        }
    }

    /// Replaces the scheduling policy used for recomputed steps.
    pub fn with_policy(mut self, policy: SchedulePolicy) -> Self {
        self.calc = self.calc.with_policy(policy);
        self
    }

    /// Computes a replan diff without mutating anything.
    ///
    /// A step is locked when its sequence number is in `locked_seqs` or its
    /// instance carries the `locked` flag; both signals are honored. Locked
    /// steps keep their stored dates and act as fixed reference anchors for
    /// downstream `prev`-basis steps. Every instance must correspond to a
    /// graph step, and locked instances must already have a due date.
    pub fn preview(
        &self,
        graph: &StepGraph,
        case: &CaseSchedule,
        new_goal: Date,
        locked_seqs: &BTreeSet<u32>,
    ) -> Result<ReplanPreview> {
        let mut resolved_due: BTreeMap<u32, Date> = BTreeMap::new();
        let mut entries = Vec::with_capacity(graph.len());
        let mut locked_set: BTreeSet<u32> = locked_seqs.clone();

        for &seq in graph.topological_order() {
            let def = graph.definition(seq).ok_or_else(|| {
                ScheduleError::invalid_input("seq", format!("Step {seq} missing from graph"))
            })?;
            let instance = case.instance_for_seq(seq).ok_or_else(|| {
                ScheduleError::invalid_input(
                    "instances",
                    format!("No step instance for template seq {seq}"),
                )
            })?;
            let locked = locked_set.contains(&seq) || instance.locked;
            if locked {
                locked_set.insert(seq);
            }

            let (new_due, new_start) = if locked {
                let due = instance.due_date.ok_or_else(|| {
                    ScheduleError::invalid_input(
                        "instances",
                        format!("Locked step {seq} has no due date to hold"),
                    )
                })?;
                (due, instance.start_date)
            } else {
                let due = match def.basis {
                    OffsetBasis::Goal => {
                        let raw = add_days(new_goal, i64::from(def.offset_days))?;
                        let direction = if def.offset_days < 0 {
                            AdjustDirection::Backward
                        } else {
                            AdjustDirection::Forward
                        };
                        adjust_to_business_day(raw, direction, self.calc.calendar())?
                    }
                    OffsetBasis::Prev => {
                        let reference = def
                            .depends_on
                            .iter()
                            .filter_map(|dep| resolved_due.get(dep))
                            .max()
                            .copied()
                            .unwrap_or(case.created_at);
                        let raw = add_days(reference, i64::from(def.offset_days))?;
                        adjust_to_business_day(raw, AdjustDirection::Forward, self.calc.calendar())?
                    }
                };
                (due, Some(self.calc.start_date_for(due)?))
            };

            resolved_due.insert(seq, new_due);
            entries.push(ReplanEntry {
                seq,
                step_id: instance.id,
                name: instance.name.clone(),
                old_due_date: instance.due_date,
                new_due_date: new_due,
                new_start_date: new_start,
                is_locked: locked,
                changed: instance.due_date != Some(new_due),
                conflicted: false,
            });
        }

        let conflicts = find_lock_conflicts(graph, &resolved_due, &locked_set);
        for entry in &mut entries {
            entry.conflicted = conflicts
                .iter()
                .any(|c| c.locked_seq == entry.seq || c.free_seq == entry.seq);
        }

        let critical_path = CriticalPathFinder::find_by_offsets(graph, &resolved_due);

        Ok(ReplanPreview {
            entries,
            conflicts,
            critical_path,
            base_version: case.version,
        })
    }

    /// Commits a preview through the store.
    ///
    /// Optimistic concurrency: if the store's version no longer matches the
    /// preview's base version, the case changed since the preview was taken
    /// and the apply fails with [`ScheduleError::StaleSchedule`], unless the
    /// store already holds exactly this preview's dates, in which case the
    /// call is a successful no-op. Writes are keyed by step ID with absolute
    /// dates, so re-applying the same preview is idempotent.
    pub fn apply<S: ScheduleStore>(&self, preview: &ReplanPreview, store: &mut S) -> Result<Applied> {
        let current = store.version();
        if current != preview.base_version {
            if self.already_applied(preview, store)? {
                return Ok(Applied {
                    updated: Vec::new(),
                    version: current,
                });
            }
            return Err(ScheduleError::StaleSchedule {
                expected: preview.base_version,
                actual: current,
            });
        }

        let mut updated = Vec::new();
        for entry in preview.entries.iter().filter(|e| !e.is_locked) {
            store.write_step_dates(entry.step_id, entry.new_start_date, entry.new_due_date)?;
            updated.push(entry.step_id);
        }
        let version = store.bump_version();
        Ok(Applied { updated, version })
    }

    /// Checks whether every unlocked entry's dates are already stored,
    /// meaning this exact preview was committed before.
    fn already_applied<S: ScheduleStore>(
        &self,
        preview: &ReplanPreview,
        store: &S,
    ) -> Result<bool> {
        if store.version() != preview.base_version + 1 {
            return Ok(false);
        }
        for entry in preview.entries.iter().filter(|e| !e.is_locked) {
            let (start, due) = store.step_dates(entry.step_id)?;
            if due != Some(entry.new_due_date) || start != entry.new_start_date {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Scans every dependency edge touching exactly one locked step and reports
/// the pairs where the dependent now lands before its predecessor.
fn find_lock_conflicts(
    graph: &StepGraph,
    resolved_due: &BTreeMap<u32, Date>,
    locked: &BTreeSet<u32>,
) -> Vec<LockConflict> {
    let mut conflicts = Vec::new();
    for def in graph.definitions() {
        let succ = def.seq;
        for &pred in graph.predecessors_of(succ) {
            let pred_locked = locked.contains(&pred);
            let succ_locked = locked.contains(&succ);
            if pred_locked == succ_locked {
                continue;
            }
            let (Some(&pred_due), Some(&succ_due)) =
                (resolved_due.get(&pred), resolved_due.get(&succ))
            else {
                continue;
            };
            if succ_due < pred_due {
                let (locked_seq, free_seq) = if pred_locked { (pred, succ) } else { (succ, pred) };
                conflicts.push(LockConflict { locked_seq, free_seq });
            }
        }
    }
    conflicts
}
