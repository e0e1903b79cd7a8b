//! Critical path identification.
//!
//! The critical path is the root-to-terminal chain with zero slack: the
//! longest-weight path through the dependency DAG ending at the step that
//! effectively completes the case (the latest due date among steps with no
//! successors). Delaying any step on it delays the case.
//!
//! Two weightings are provided: [`CriticalPathFinder::find`] weighs each
//! edge by the due-date gap it spans (for display over an existing
//! schedule), while [`CriticalPathFinder::find_by_offsets`] weighs each node
//! by its template offset (used during replanning, where offsets are the
//! binding constraints).

use std::collections::BTreeMap;

use jiff::civil::Date;

use crate::graph::StepGraph;

/// Longest-path search over a step graph.
pub struct CriticalPathFinder;

impl CriticalPathFinder {
    /// Finds the critical path over known due dates.
    ///
    /// Each edge `pred -> succ` weighs `due[succ] - due[pred]` in days; the
    /// maximal-weight path to the terminal step is reconstructed via
    /// predecessor pointers and returned root-first. Edge weights telescope,
    /// so every branch into a join carries the same total; weight ties are
    /// broken toward the predecessor with the later due date (the edge with
    /// no slack), then toward the smallest sequence number. Returns an empty
    /// path when the graph has no steps with known dates.
    pub fn find(graph: &StepGraph, due_dates: &BTreeMap<u32, Date>) -> Vec<u32> {
        Self::longest_path(graph, due_dates, |graph, seq, best| {
            let due = due_dates.get(&seq)?;
            let mut top: Option<(i64, Date, u32)> = None;
            for &pred in graph.predecessors_of(seq) {
                let (Some(&pred_due), Some(&pred_best)) =
                    (due_dates.get(&pred), best.get(&pred))
                else {
                    continue;
                };
                let candidate = pred_best + days_between(pred_due, *due);
                let wins = top.map_or(true, |(w, d, _)| {
                    candidate > w || (candidate == w && pred_due > d)
                });
                if wins {
                    top = Some((candidate, pred_due, pred));
                }
            }
            Some(top.map_or((0, None), |(w, _, p)| (w, Some(p))))
        })
    }

    /// Finds the critical path by cumulative template offsets.
    ///
    /// `longest[seq] = offset_days[seq] + max(longest[dep], default 0)`; the
    /// terminal is still chosen by latest due date so the path ends at the
    /// step nearest the goal.
    pub fn find_by_offsets(graph: &StepGraph, due_dates: &BTreeMap<u32, Date>) -> Vec<u32> {
        Self::longest_path(graph, due_dates, |graph, seq, best| {
            let offset = i64::from(graph.definition(seq)?.offset_days);
            let mut top: Option<(i64, u32)> = None;
            for &pred in graph.predecessors_of(seq) {
                let Some(&pred_best) = best.get(&pred) else {
                    continue;
                };
                if top.map_or(true, |(w, _)| pred_best > w) {
                    top = Some((pred_best, pred));
                }
            }
            Some(top.map_or((offset, None), |(w, p)| (offset + w, Some(p))))
        })
    }

    /// Shared DP skeleton: scores every node in topological order with the
    /// supplied rule, then walks predecessor pointers back from the
    /// terminal.
    fn longest_path<F>(graph: &StepGraph, due_dates: &BTreeMap<u32, Date>, score: F) -> Vec<u32>
    where
        F: Fn(&StepGraph, u32, &BTreeMap<u32, i64>) -> Option<(i64, Option<u32>)>,
    {
        let Some(terminal) = Self::terminal(graph, due_dates) else {
            return Vec::new();
        };

        let mut best: BTreeMap<u32, i64> = BTreeMap::new();
        let mut pred_of: BTreeMap<u32, u32> = BTreeMap::new();
        for &seq in graph.topological_order() {
            let Some((weight, pred)) = score(graph, seq, &best) else {
                continue;
            };
            best.insert(seq, weight);
            if let Some(p) = pred {
                pred_of.insert(seq, p);
            }
        }

        let mut path = vec![terminal];
        let mut current = terminal;
        while let Some(&p) = pred_of.get(&current) {
            path.push(p);
            current = p;
        }
        path.reverse();
        path
    }

    /// The step that effectively completes the case: latest due date among
    /// steps with no successors, ties to the smallest sequence number.
    fn terminal(graph: &StepGraph, due_dates: &BTreeMap<u32, Date>) -> Option<u32> {
        graph
            .terminals()
            .into_iter()
            .filter_map(|seq| due_dates.get(&seq).map(|&due| (due, seq)))
            .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
            .map(|(_, seq)| seq)
    }
}

/// Whole days from `a` to `b` (negative when `b` precedes `a`).
fn days_between(a: Date, b: Date) -> i64 {
    i64::from((b - a).get_days())
}
