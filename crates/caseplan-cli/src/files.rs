//! Template and case file handling.
//!
//! The CLI keeps templates and cases as plain JSON files; the records here
//! are thin serde wrappers around the core models.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use caseplan_core::{CaseSchedule, HolidayCalendar, StepDefinition};
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A process template on disk: a name plus its step definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFile {
    pub name: String,
    pub steps: Vec<StepDefinition>,
}

/// Reads and parses a template file.
pub fn load_template(path: &Path) -> Result<TemplateFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse template file {}", path.display()))
}

/// Reads and parses a case file.
pub fn load_case(path: &Path) -> Result<CaseSchedule> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read case file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse case file {}", path.display()))
}

/// Writes a case file, pretty-printed for hand inspection.
pub fn write_case(path: &Path, case: &CaseSchedule) -> Result<()> {
    let raw = serde_json::to_string_pretty(case).context("Failed to serialize case")?;
    fs::write(path, raw)
        .with_context(|| format!("Failed to write case file {}", path.display()))
}

/// Builds the business calendar: weekends-only, or weekends plus the
/// holidays listed (one ISO date per entry) in the given JSON file.
pub fn load_calendar(holidays: Option<&Path>) -> Result<HolidayCalendar> {
    match holidays {
        None => Ok(HolidayCalendar::weekends_only()),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read holiday file {}", path.display()))?;
            let dates: Vec<Date> = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse holiday file {}", path.display()))?;
            Ok(HolidayCalendar::with_holidays(dates))
        }
    }
}
