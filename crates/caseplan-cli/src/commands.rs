//! Command handlers: load files, call the core, print results.

use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use caseplan_core::{
    instantiate, CaseSchedule, CriticalPathFinder, HolidayCalendar, InMemoryStore, PathChain,
    ReplanDiff, ReplanEngine, ScheduleCalculator, SchedulePolicy, ScheduleTable, StepGraph,
};
use log::{debug, info};

use crate::args::{CriticalPathArgs, InitArgs, ReplanArgs, ScheduleArgs};
use crate::files::{load_case, load_template, write_case, TemplateFile};

/// First instance ID handed out when a case is initialized.
const ID_BASE: u64 = 1;

fn build_graph(template: &TemplateFile) -> Result<StepGraph> {
    StepGraph::build(&template.steps)
        .with_context(|| format!("Template '{}' failed validation", template.name))
}

/// `caseplan schedule`: compute and print the initial schedule.
pub fn schedule(args: &ScheduleArgs, calendar: HolidayCalendar) -> Result<()> {
    let template = load_template(&args.template)?;
    let graph = build_graph(&template)?;
    debug!("built graph with {} steps", graph.len());

    let calculator = ScheduleCalculator::new(calendar).with_policy(SchedulePolicy {
        start_window_days: args.window,
    });
    let schedule = calculator
        .compute_initial(&graph, args.goal, args.created)
        .context("Failed to compute schedule")?;

    println!("Schedule for '{}' (goal {})", template.name, args.goal);
    println!();
    print!(
        "{}",
        ScheduleTable {
            schedule: &schedule,
            graph: &graph,
        }
    );
    println!();
    println!(
        "Critical path: {}",
        PathChain(&CriticalPathFinder::find(&graph, &schedule.due_dates()))
    );
    Ok(())
}

/// `caseplan init`: create a case file from a template.
pub fn init(args: &InitArgs, calendar: HolidayCalendar) -> Result<()> {
    let template = load_template(&args.template)?;
    let graph = build_graph(&template)?;

    let calculator = ScheduleCalculator::new(calendar);
    let schedule = calculator
        .compute_initial(&graph, args.goal, args.created)
        .context("Failed to compute schedule")?;

    let case = CaseSchedule {
        goal_date: args.goal,
        created_at: args.created,
        version: 0,
        instances: instantiate(&graph, &schedule, ID_BASE),
    };
    write_case(&args.out, &case)?;
    info!("initialized case at {}", args.out.display());
    println!(
        "Created case with {} steps at {}",
        case.instances.len(),
        args.out.display()
    );
    Ok(())
}

/// `caseplan replan`: preview a goal-date change, optionally committing it.
pub fn replan(args: &ReplanArgs, calendar: HolidayCalendar) -> Result<()> {
    let template = load_template(&args.template)?;
    let graph = build_graph(&template)?;
    let case = load_case(&args.case)?;

    let locked_seqs: BTreeSet<u32> = args.locks.iter().copied().collect();
    let engine = ReplanEngine::new(calendar);
    let preview = engine
        .preview(&graph, &case, args.goal, &locked_seqs)
        .context("Failed to compute replan preview")?;

    println!(
        "Replan preview: goal {} -> {} ({} change{})",
        case.goal_date,
        args.goal,
        preview.changed_entries().count(),
        if preview.changed_entries().count() == 1 { "" } else { "s" }
    );
    println!();
    print!("{}", ReplanDiff(&preview));
    println!();
    println!("Critical path: {}", PathChain(&preview.critical_path));

    if !args.apply {
        return Ok(());
    }
    if preview.has_conflicts() {
        bail!("Refusing to apply while lock conflicts remain; unlock or adjust the goal");
    }

    let mut store = InMemoryStore::new(case);
    let applied = engine
        .apply(&preview, &mut store)
        .context("Failed to apply replan")?;
    let mut committed = store.into_case();
    committed.goal_date = args.goal;
    write_case(&args.case, &committed)?;
    info!(
        "applied replan to {} ({} steps updated, version {})",
        args.case.display(),
        applied.updated.len(),
        applied.version
    );
    println!();
    println!(
        "Applied: {} step(s) updated, case version {}",
        applied.updated.len(),
        applied.version
    );
    Ok(())
}

/// `caseplan critical-path`: print the path over the case's current dates.
pub fn critical_path(args: &CriticalPathArgs) -> Result<()> {
    let template = load_template(&args.template)?;
    let graph = build_graph(&template)?;
    let case = load_case(&args.case)?;

    let dues = case
        .instances
        .iter()
        .filter_map(|i| i.due_date.map(|d| (i.template_step_seq, d)))
        .collect();
    let path = CriticalPathFinder::find(&graph, &dues);
    if path.is_empty() {
        bail!("Case has no computed due dates yet; run init or schedule first");
    }
    println!("Critical path: {}", PathChain(&path));
    Ok(())
}
