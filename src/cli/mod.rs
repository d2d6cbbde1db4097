//! Terminal rendering for the dashboard commands

pub mod balances;
pub mod dashboard;
pub mod evolution;
pub mod purchases;
pub mod setup;
pub mod tvl;
pub mod ui;

use anyhow::Result;
use indicatif::ProgressBar;
use serde::Serialize;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    /// Spinner shown while fetching. Hidden for JSON so stdout stays parseable.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        match self {
            OutputFormat::Table => ui::new_spinner(message),
            OutputFormat::Json => ProgressBar::hidden(),
        }
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
