//! Validated DAG view over a template's step definitions.
//!
//! [`StepGraph::build`] is the single entry point: every schedule computation
//! takes a `StepGraph`, so a template with duplicate sequence numbers,
//! dangling dependencies, or cycles can never reach the calculator.

use std::collections::{BTreeMap, BinaryHeap};
use std::cmp::Reverse;

use crate::error::{Result, ScheduleError};
use crate::models::StepDefinition;

/// Tri-state node coloring for the iterative cycle search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// A validated, queryable dependency DAG over a template's steps.
///
/// Nodes are keyed by sequence number. Adjacency is stored in both
/// directions: `depends_on` edges from the definitions, and the derived
/// dependents lists. Both are kept sorted so every traversal is
/// deterministic.
#[derive(Debug, Clone)]
pub struct StepGraph {
    nodes: BTreeMap<u32, StepDefinition>,
    dependents: BTreeMap<u32, Vec<u32>>,
    topo: Vec<u32>,
}

impl StepGraph {
    /// Builds a graph from a template's step definitions, validating as it
    /// goes.
    ///
    /// Fails with [`ScheduleError::DuplicateSeq`], field-level
    /// [`ScheduleError::InvalidInput`], [`ScheduleError::SelfDependency`],
    /// [`ScheduleError::UnknownDependency`], or
    /// [`ScheduleError::CycleDetected`] (reporting the cycle's members).
    pub fn build(steps: &[StepDefinition]) -> Result<Self> {
        let mut nodes: BTreeMap<u32, StepDefinition> = BTreeMap::new();
        for step in steps {
            step.validate()?;
            if nodes.contains_key(&step.seq) {
                return Err(ScheduleError::DuplicateSeq { seq: step.seq });
            }
            let mut step = step.clone();
            step.depends_on.sort_unstable();
            step.depends_on.dedup();
            nodes.insert(step.seq, step);
        }

        for step in nodes.values() {
            for &dep in &step.depends_on {
                if dep == step.seq {
                    return Err(ScheduleError::SelfDependency { seq: step.seq });
                }
                if !nodes.contains_key(&dep) {
                    return Err(ScheduleError::UnknownDependency {
                        seq: step.seq,
                        depends_on: dep,
                    });
                }
            }
        }

        if let Some(members) = find_cycle(&nodes) {
            return Err(ScheduleError::CycleDetected { members });
        }

        let mut dependents: BTreeMap<u32, Vec<u32>> =
            nodes.keys().map(|&seq| (seq, Vec::new())).collect();
        for step in nodes.values() {
            for &dep in &step.depends_on {
                if let Some(list) = dependents.get_mut(&dep) {
                    list.push(step.seq);
                }
            }
        }
        for list in dependents.values_mut() {
            list.sort_unstable();
        }

        let topo = topological_sort(&nodes);
        Ok(Self { nodes, dependents, topo })
    }

    /// Number of steps in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when the graph has no steps.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The definition for a sequence number, if present.
    pub fn definition(&self, seq: u32) -> Option<&StepDefinition> {
        self.nodes.get(&seq)
    }

    /// All definitions in ascending sequence order.
    pub fn definitions(&self) -> impl Iterator<Item = &StepDefinition> {
        self.nodes.values()
    }

    /// Direct dependencies of a step, ascending.
    pub fn predecessors_of(&self, seq: u32) -> &[u32] {
        self.nodes
            .get(&seq)
            .map(|s| s.depends_on.as_slice())
            .unwrap_or(&[])
    }

    /// Direct dependents of a step, ascending.
    pub fn successors_of(&self, seq: u32) -> &[u32] {
        self.dependents
            .get(&seq)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Steps with no dependencies, ascending.
    pub fn roots(&self) -> Vec<u32> {
        self.nodes
            .values()
            .filter(|s| s.depends_on.is_empty())
            .map(|s| s.seq)
            .collect()
    }

    /// Steps with no dependents, ascending.
    pub fn terminals(&self) -> Vec<u32> {
        self.dependents
            .iter()
            .filter(|(_, list)| list.is_empty())
            .map(|(&seq, _)| seq)
            .collect()
    }

    /// Topological order with ties broken by ascending sequence number.
    ///
    /// Every step appears after all of its dependencies, so a single forward
    /// pass over this order resolves every `prev`-basis reference.
    pub fn topological_order(&self) -> &[u32] {
        &self.topo
    }
}

/// Kahn's algorithm with a min-heap on sequence number.
///
/// Only called on cycle-free node sets, so it always emits every node.
fn topological_sort(nodes: &BTreeMap<u32, StepDefinition>) -> Vec<u32> {
    let mut in_degree: BTreeMap<u32, usize> = nodes
        .values()
        .map(|s| (s.seq, s.depends_on.len()))
        .collect();
    let mut dependents: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for step in nodes.values() {
        for &dep in &step.depends_on {
            dependents.entry(dep).or_default().push(step.seq);
        }
    }

    let mut ready: BinaryHeap<Reverse<u32>> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&seq, _)| Reverse(seq))
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(Reverse(seq)) = ready.pop() {
        order.push(seq);
        if let Some(next) = dependents.get(&seq) {
            for &succ in next {
                if let Some(deg) = in_degree.get_mut(&succ) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push(Reverse(succ));
                    }
                }
            }
        }
    }
    order
}

/// Iterative depth-first search for a dependency cycle.
///
/// Follows `depends_on` edges with an explicit stack and tri-state coloring;
/// starting nodes and neighbors are taken in ascending order, so the
/// reported cycle is deterministic. Returns the cycle's members in
/// traversal order.
fn find_cycle(nodes: &BTreeMap<u32, StepDefinition>) -> Option<Vec<u32>> {
    let mut state: BTreeMap<u32, VisitState> = nodes
        .keys()
        .map(|&seq| (seq, VisitState::Unvisited))
        .collect();

    for &start in nodes.keys() {
        if state[&start] != VisitState::Unvisited {
            continue;
        }
        // (node, index of the next dependency to follow)
        let mut stack: Vec<(u32, usize)> = vec![(start, 0)];
        let mut path: Vec<u32> = vec![start];
        state.insert(start, VisitState::InProgress);

        loop {
            let Some(&(node, idx)) = stack.last() else {
                break;
            };
            let deps = nodes
                .get(&node)
                .map(|s| s.depends_on.as_slice())
                .unwrap_or(&[]);
            if idx < deps.len() {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let next = deps[idx];
                match state[&next] {
                    VisitState::Unvisited => {
                        state.insert(next, VisitState::InProgress);
                        stack.push((next, 0));
                        path.push(next);
                    }
                    VisitState::InProgress => {
                        let pos = path.iter().position(|&s| s == next).unwrap_or(0);
                        return Some(path[pos..].to_vec());
                    }
                    VisitState::Done => {}
                }
            } else {
                state.insert(node, VisitState::Done);
                stack.pop();
                path.pop();
            }
        }
    }
    None
}
