use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use jiff::civil::Date;

/// Main command-line interface for the caseplan scheduling tool
///
/// Caseplan computes due dates for cases created from process templates: a
/// template's steps form a dependency DAG with offsets measured from the
/// case goal date or from prerequisite steps, and every date is shifted onto
/// a business day. The CLI reads templates and cases from JSON files and
/// prints schedules, replan diffs, and critical paths.
#[derive(Parser)]
#[command(version, about, name = "caseplan")]
pub struct Args {
    /// Path to a JSON file with an array of holiday dates. Weekends are
    /// always non-business days.
    #[arg(long, global = true)]
    pub holidays: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the caseplan CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Compute and print the initial schedule for a template
    Schedule(ScheduleArgs),
    /// Create a case file from a template
    Init(InitArgs),
    /// Preview (and optionally apply) a replan for a new goal date
    Replan(ReplanArgs),
    /// Print the critical path over a case's current due dates
    CriticalPath(CriticalPathArgs),
}

#[derive(ClapArgs)]
pub struct ScheduleArgs {
    /// Template JSON file
    #[arg(long)]
    pub template: PathBuf,

    /// Goal date (YYYY-MM-DD)
    #[arg(long)]
    pub goal: Date,

    /// Case creation date anchoring dependency-less prev steps; required so
    /// output stays reproducible (no hidden "today")
    #[arg(long)]
    pub created: Date,

    /// Calendar days between each step's start and due dates
    #[arg(long, default_value_t = 7)]
    pub window: i64,
}

#[derive(ClapArgs)]
pub struct InitArgs {
    /// Template JSON file
    #[arg(long)]
    pub template: PathBuf,

    /// Goal date (YYYY-MM-DD)
    #[arg(long)]
    pub goal: Date,

    /// Case creation date
    #[arg(long)]
    pub created: Date,

    /// Where to write the case JSON file
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(ClapArgs)]
pub struct ReplanArgs {
    /// Case JSON file
    #[arg(long)]
    pub case: PathBuf,

    /// Template JSON file the case was created from
    #[arg(long)]
    pub template: PathBuf,

    /// New goal date (YYYY-MM-DD)
    #[arg(long)]
    pub goal: Date,

    /// Additional step seqs to hold fixed (repeatable); instance lock flags
    /// are honored as well
    #[arg(long = "lock")]
    pub locks: Vec<u32>,

    /// Commit the previewed dates back to the case file
    #[arg(long)]
    pub apply: bool,
}

#[derive(ClapArgs)]
pub struct CriticalPathArgs {
    /// Case JSON file
    #[arg(long)]
    pub case: PathBuf,

    /// Template JSON file the case was created from
    #[arg(long)]
    pub template: PathBuf,
}
