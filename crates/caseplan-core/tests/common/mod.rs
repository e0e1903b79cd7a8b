//! Shared builders for the scheduling integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use caseplan_core::{
    instantiate, CaseSchedule, HolidayCalendar, OffsetBasis, Schedule, ScheduleCalculator,
    StepDefinition, StepGraph,
};
use jiff::civil::Date;

/// Builds a step definition with no artifact payload.
pub fn step(seq: u32, basis: OffsetBasis, offset_days: i32, depends_on: &[u32]) -> StepDefinition {
    StepDefinition {
        seq,
        name: format!("Step {seq}"),
        basis,
        offset_days,
        depends_on: depends_on.to_vec(),
        required_artifacts: serde_json::Value::Null,
    }
}

/// The nine-step onboarding template used by the end-to-end scenarios:
/// step 1 anchors 30 days before the goal, step 9 lands on the goal, and
/// steps 2 through 8 chain off the case creation date with step 6 joining
/// two branches.
pub fn nine_step_template() -> Vec<StepDefinition> {
    vec![
        step(1, OffsetBasis::Goal, -30, &[]),
        step(2, OffsetBasis::Prev, 2, &[]),
        step(3, OffsetBasis::Prev, 3, &[2]),
        step(4, OffsetBasis::Prev, 5, &[3]),
        step(5, OffsetBasis::Prev, 2, &[3]),
        step(6, OffsetBasis::Prev, 1, &[4, 5]),
        step(7, OffsetBasis::Prev, 5, &[6]),
        step(8, OffsetBasis::Prev, 2, &[7]),
        step(9, OffsetBasis::Goal, 0, &[8]),
    ]
}

/// Computes an initial schedule over a weekends-only calendar and wraps it
/// into a case record, instances numbered from 1.
pub fn case_from_template(
    steps: &[StepDefinition],
    goal: Date,
    created_at: Date,
) -> (StepGraph, Schedule, CaseSchedule) {
    let graph = StepGraph::build(steps).expect("template is valid");
    let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only());
    let schedule = calculator
        .compute_initial(&graph, goal, created_at)
        .expect("schedule computes");
    let case = CaseSchedule {
        goal_date: goal,
        created_at,
        version: 0,
        instances: instantiate(&graph, &schedule, 1),
    };
    (graph, schedule, case)
}
