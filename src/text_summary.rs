//! Text summary builder for the cleanup tool.
//!
//! Formats the human-readable lines printed before the completion banner.

use crate::cleanup::{CleanupReport, RenameOutcome};

/// Pre-formatted lines for text output.
pub struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a summary of a finished cleanup run.
pub fn build_cleanup_summary(report: &CleanupReport) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!(
        "Removed: {} item(s), {} already absent",
        report.removed.len(),
        report.absent
    ));

    for rename in &report.renames {
        let from = rename.from.display();
        let to = rename.to.display();
        match rename.outcome {
            RenameOutcome::Renamed => lines.push(format!("Renamed: {from} -> {to}")),
            RenameOutcome::DestinationExists => {
                lines.push(format!("Kept: {from} ({to} already exists)"))
            }
            RenameOutcome::SourceAbsent => {}
        }
    }

    if !report.swept.is_empty() {
        lines.push(format!(
            "Cache directories removed: {}",
            report.swept.len()
        ));
    }

    if report.has_failures() {
        lines.push(format!("Failed: {} item(s)", report.failures.len()));
        for f in &report.failures {
            lines.push(format!("  {}: {}", f.path.display(), f.error));
        }
    }

    TextSummary { lines }
}
