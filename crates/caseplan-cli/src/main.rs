//! Caseplan CLI application
//!
//! Command-line front end for the caseplan scheduling engine: computes
//! initial schedules from process templates, previews and applies replans,
//! and prints critical paths.

mod args;
mod commands;
mod files;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use files::load_calendar;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    let Args { holidays, command } = Args::parse();

    let calendar =
        load_calendar(holidays.as_deref()).context("Failed to load holiday calendar")?;

    info!("caseplan started");

    match command {
        Commands::Schedule(args) => commands::schedule(&args, calendar),
        Commands::Init(args) => commands::init(&args, calendar),
        Commands::Replan(args) => commands::replan(&args, calendar),
        Commands::CriticalPath(args) => commands::critical_path(&args),
    }
}
