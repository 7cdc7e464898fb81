//! Output formatting for CLI commands.
//!
//! Supports two modes: human-readable tables (default) and JSON (--json).

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::domain::PredictionReport;

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// Print a vec of Tabled + Serialize items in the chosen mode.
pub fn print_items<T: Tabled + Serialize>(items: &[T], mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Table => {
            if items.is_empty() {
                println!("(no results)");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
    }
    Ok(())
}

/// Print a prediction report: two tables plus the top disease's notes.
pub fn print_report(report: &PredictionReport, mode: OutputMode) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Risk assessment for key diseases");
    print_items(&report.focus_diseases, mode)?;
    println!();
    println!("Top predicted diseases");
    print_items(&report.top_diseases, mode)?;

    if let Some(info) = &report.top_disease_info {
        println!();
        if let Some(description) = &info.description {
            println!("What is it? {description}");
        }
        if !info.precautions.is_empty() {
            println!("Recommended precautions:");
            for precaution in &info.precautions {
                println!("  - {precaution}");
            }
        }
    }
    Ok(())
}
