//! Analyze command implementation.

use super::output::format_text;
use super::{CliError, ReportFormat};
use std::path::Path;
use tracing::info;
use warden::game::Ruleset;
use warden::replay::{analyze, Recording};

/// Execute the analyze command.
///
/// # Errors
///
/// Returns an error if the recording or rules cannot be loaded.
pub(crate) fn execute(
    recording: &Path,
    rules: Option<&Path>,
    format: ReportFormat,
) -> Result<(), CliError> {
    let mut loaded = Recording::load(recording).map_err(|e| {
        CliError::new(format!("Failed to load {}: {e}", recording.display()))
    })?;
    if let Some(path) = rules {
        loaded.rules = Ruleset::load(path)?;
    }

    info!(turns = loaded.turns.len(), "analyzing recording");
    let reports = analyze(&loaded);

    match format {
        ReportFormat::Text => {
            print!("{}", format_text(&reports));
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
