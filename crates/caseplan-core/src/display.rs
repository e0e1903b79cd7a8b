//! Display wrappers for schedules and replan previews.
//!
//! Domain results stay presentation-free; these wrappers pair them with the
//! context needed to render plain-text tables for the CLI, following the
//! same wrapper pattern as the models/display split elsewhere in the crate.

use std::fmt;

use crate::graph::StepGraph;
use crate::replan::ReplanPreview;
use crate::schedule::Schedule;

/// Renders a computed schedule as an aligned table, one row per step in
/// topological order.
pub struct ScheduleTable<'a> {
    pub schedule: &'a Schedule,
    pub graph: &'a StepGraph,
}

impl fmt::Display for ScheduleTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>4}  {:<32}  {:<10}  {:<10}", "seq", "step", "start", "due")?;
        for entry in self.schedule.entries() {
            let name = self
                .graph
                .definition(entry.seq)
                .map(|d| d.name.as_str())
                .unwrap_or("?");
            writeln!(
                f,
                "{:>4}  {:<32}  {}  {}",
                entry.seq, name, entry.start_date, entry.due_date
            )?;
        }
        Ok(())
    }
}

/// Renders a replan preview as a diff table with lock and conflict markers.
pub struct ReplanDiff<'a>(pub &'a ReplanPreview);

impl fmt::Display for ReplanDiff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>4}  {:<32}  {:<10}     {:<10}  {}",
            "seq", "step", "old due", "new due", "flags"
        )?;
        for entry in &self.0.entries {
            let old = entry
                .old_due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            let arrow = if entry.changed { "->" } else { " =" };
            let mut flags = Vec::new();
            if entry.is_locked {
                flags.push("locked");
            }
            if entry.conflicted {
                flags.push("conflict");
            }
            writeln!(
                f,
                "{:>4}  {:<32}  {:<10}  {}  {:<10}  {}",
                entry.seq,
                entry.name,
                old,
                arrow,
                entry.new_due_date,
                flags.join(",")
            )?;
        }
        if !self.0.conflicts.is_empty() {
            writeln!(f)?;
            for conflict in &self.0.conflicts {
                writeln!(
                    f,
                    "warning: step {} now lands before locked step {}",
                    conflict.free_seq, conflict.locked_seq
                )?;
            }
        }
        Ok(())
    }
}

/// Renders a critical path as a `1 -> 2 -> 9` chain.
pub struct PathChain<'a>(pub &'a [u32]);

impl fmt::Display for PathChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(empty)");
        }
        let rendered: Vec<String> = self.0.iter().map(|seq| seq.to_string()).collect();
        write!(f, "{}", rendered.join(" -> "))
    }
}
