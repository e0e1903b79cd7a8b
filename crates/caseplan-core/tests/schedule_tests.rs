//! Integration tests for initial schedule computation.

mod common;

use caseplan_core::{
    instantiate, HolidayCalendar, OffsetBasis, ScheduleCalculator, SchedulePolicy, StepGraph,
    StepStatus,
};
use common::{nine_step_template, step};
use jiff::civil::date;

#[test]
fn test_nine_step_template_initial_schedule() {
    let graph = StepGraph::build(&nine_step_template()).expect("template is valid");
    let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only());
    let schedule = calculator
        .compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))
        .expect("schedule computes");

    let dues = schedule.due_dates();
    // Goal-basis steps: 30 days before the goal (2025-03-01 is a Saturday,
    // shifted backward to Friday the 28th) and the goal itself (a Monday).
    assert_eq!(dues[&1], date(2025, 2, 28));
    assert_eq!(dues[&9], date(2025, 3, 31));
    // Prev-basis chain anchored at case creation (Monday 2025-01-06).
    assert_eq!(dues[&2], date(2025, 1, 8));
    assert_eq!(dues[&3], date(2025, 1, 13)); // raw Jan 11 is a Saturday
    assert_eq!(dues[&4], date(2025, 1, 20)); // raw Jan 18 is a Saturday
    assert_eq!(dues[&5], date(2025, 1, 15));
    // Latest predecessor wins at the join: max(Jan 20, Jan 15) + 1.
    assert_eq!(dues[&6], date(2025, 1, 21));
    assert_eq!(dues[&7], date(2025, 1, 27)); // raw Jan 26 is a Sunday
    assert_eq!(dues[&8], date(2025, 1, 29));
}

#[test]
fn test_entries_follow_topological_order() {
    let graph = StepGraph::build(&nine_step_template()).expect("template is valid");
    let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only());
    let schedule = calculator
        .compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))
        .expect("schedule computes");

    let seqs: Vec<u32> = schedule.entries().iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn test_schedule_is_deterministic() {
    let graph = StepGraph::build(&nine_step_template()).expect("template is valid");
    let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only());

    let first = calculator
        .compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))
        .expect("schedule computes");
    let second = calculator
        .compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))
        .expect("schedule computes");
    assert_eq!(first, second);
}

#[test]
fn test_latest_predecessor_join() {
    // A resolves to Friday Jan 10, B to Wednesday Jan 15; C takes the later
    // of the two as its reference and lands on Friday Jan 17.
    let steps = [
        step(1, OffsetBasis::Prev, 4, &[]),
        step(2, OffsetBasis::Prev, 9, &[]),
        step(3, OffsetBasis::Prev, 2, &[1, 2]),
    ];
    let graph = StepGraph::build(&steps).expect("template is valid");
    let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only());
    let schedule = calculator
        .compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))
        .expect("schedule computes");

    let dues = schedule.due_dates();
    assert_eq!(dues[&1], date(2025, 1, 10));
    assert_eq!(dues[&2], date(2025, 1, 15));
    assert_eq!(dues[&3], date(2025, 1, 17));
}

#[test]
fn test_goal_offset_never_lands_on_holiday() {
    // Raw date is the New Year's Day holiday; a negative offset adjusts
    // backward into the previous year, a positive one forward past it.
    let calendar = HolidayCalendar::with_holidays([date(2025, 1, 1)]);

    let backward = [step(1, OffsetBasis::Goal, -7, &[])];
    let graph = StepGraph::build(&backward).expect("template is valid");
    let schedule = ScheduleCalculator::new(calendar.clone())
        .compute_initial(&graph, date(2025, 1, 8), date(2024, 12, 2))
        .expect("schedule computes");
    assert_eq!(schedule.due_dates()[&1], date(2024, 12, 31));

    let forward = [step(1, OffsetBasis::Prev, 7, &[])];
    let graph = StepGraph::build(&forward).expect("template is valid");
    let schedule = ScheduleCalculator::new(calendar)
        .compute_initial(&graph, date(2025, 1, 8), date(2024, 12, 25))
        .expect("schedule computes");
    assert_eq!(schedule.due_dates()[&1], date(2025, 1, 2));
}

#[test]
fn test_start_precedes_due_by_policy_window() {
    let graph =
        StepGraph::build(&[step(1, OffsetBasis::Goal, 0, &[])]).expect("template is valid");
    let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only());
    let schedule = calculator
        .compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))
        .expect("schedule computes");

    let entry = schedule.dates_for(1).expect("step scheduled");
    assert_eq!(entry.due_date, date(2025, 3, 31));
    assert_eq!(entry.start_date, date(2025, 3, 24));
    assert!(entry.start_date <= entry.due_date);
}

#[test]
fn test_start_window_skips_holiday_backward() {
    // Due Wednesday Jan 8; seven days back is the New Year holiday, so the
    // start slides to Tuesday Dec 31.
    let calendar = HolidayCalendar::with_holidays([date(2025, 1, 1)]);
    let graph =
        StepGraph::build(&[step(1, OffsetBasis::Goal, 0, &[])]).expect("template is valid");
    let schedule = ScheduleCalculator::new(calendar)
        .compute_initial(&graph, date(2025, 1, 8), date(2024, 12, 2))
        .expect("schedule computes");

    let entry = schedule.dates_for(1).expect("step scheduled");
    assert_eq!(entry.start_date, date(2024, 12, 31));
}

#[test]
fn test_zero_start_window_collapses_start_onto_due() {
    let graph =
        StepGraph::build(&[step(1, OffsetBasis::Goal, 0, &[])]).expect("template is valid");
    let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only())
        .with_policy(SchedulePolicy {
            start_window_days: 0,
        });
    let schedule = calculator
        .compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))
        .expect("schedule computes");

    let entry = schedule.dates_for(1).expect("step scheduled");
    assert_eq!(entry.start_date, entry.due_date);
}

#[test]
fn test_dependencyless_prev_step_anchors_at_creation() {
    let graph =
        StepGraph::build(&[step(1, OffsetBasis::Prev, 3, &[])]).expect("template is valid");
    let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only());
    let schedule = calculator
        .compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))
        .expect("schedule computes");
    // Thursday Jan 9, three days after the Monday the case was created.
    assert_eq!(schedule.due_dates()[&1], date(2025, 1, 9));
}

#[test]
fn test_degenerate_calendar_fails_computation() {
    let graph =
        StepGraph::build(&[step(1, OffsetBasis::Goal, 0, &[])]).expect("template is valid");
    let never_open = |_d: jiff::civil::Date| false;
    let result = ScheduleCalculator::new(never_open).compute_initial(
        &graph,
        date(2025, 3, 31),
        date(2025, 1, 6),
    );
    assert!(matches!(
        result,
        Err(caseplan_core::ScheduleError::CalendarAdjustmentExhausted { .. })
    ));
}

#[test]
fn test_instantiate_produces_unlocked_todo_instances() {
    let graph = StepGraph::build(&nine_step_template()).expect("template is valid");
    let calculator = ScheduleCalculator::new(HolidayCalendar::weekends_only());
    let schedule = calculator
        .compute_initial(&graph, date(2025, 3, 31), date(2025, 1, 6))
        .expect("schedule computes");

    let instances = instantiate(&graph, &schedule, 100);
    assert_eq!(instances.len(), 9);
    for (i, instance) in instances.iter().enumerate() {
        assert_eq!(instance.id, 100 + i as u64);
        assert_eq!(instance.template_step_seq, (i + 1) as u32);
        assert_eq!(instance.status, StepStatus::Todo);
        assert!(!instance.locked);
        assert!(instance.due_date.is_some());
        assert!(instance.start_date.is_some());
        assert!(instance.start_date <= instance.due_date);
    }
}
