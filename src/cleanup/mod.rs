//! One-shot project cleanup.
//!
//! Deletes manifest targets category by category, applies the legacy rename
//! rules, then sweeps cache directories. Per-item failures are collected and
//! the run carries on; the caller decides the exit status from the report.

pub mod manifest;
mod prompt;
mod remove;

pub use manifest::{Category, EntryKind, Manifest, ManifestEntry, ManifestError, RenameRule};
pub use prompt::{confirm, print_warning_banner};
pub use remove::{apply_rename, find_cache_dirs, remove_target, Removal, RenameOutcome};

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameReport {
    pub from: PathBuf,
    pub to: PathBuf,
    #[serde(flatten)]
    pub outcome: RenameOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub manifest: String,
    pub manifest_version: u32,
    pub root: PathBuf,
    pub removed: Vec<PathBuf>,
    pub absent: usize,
    pub renames: Vec<RenameReport>,
    pub swept: Vec<PathBuf>,
    pub failures: Vec<CleanupFailure>,
    pub finished_utc: String,
}

impl CleanupReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Run every manifest operation below `root`, writing progress to `out`.
///
/// Paths in the report are relative to `root`.
pub fn run_cleanup(
    root: &Path,
    manifest: &Manifest,
    out: &mut dyn Write,
) -> std::io::Result<CleanupReport> {
    let mut report = CleanupReport {
        manifest: manifest.name.clone(),
        manifest_version: manifest.version,
        root: root.to_path_buf(),
        removed: Vec::new(),
        absent: 0,
        renames: Vec::new(),
        swept: Vec::new(),
        failures: Vec::new(),
        finished_utc: String::new(),
    };

    for (category, entries) in manifest.by_category() {
        writeln!(out, "Removing {}...", category.label())?;
        for entry in entries {
            match remove_target(root, &entry.path, entry.kind) {
                Ok(Removal::Removed) => {
                    tracing::info!(path = %entry.path.display(), "removed");
                    report.removed.push(entry.path.clone());
                }
                Ok(Removal::Absent) => report.absent += 1,
                Err(e) => {
                    tracing::warn!(path = %entry.path.display(), error = %e, "removal failed");
                    report.failures.push(CleanupFailure {
                        path: entry.path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    for rule in &manifest.legacy_renames {
        match apply_rename(root, rule) {
            Ok(outcome) => {
                if outcome == RenameOutcome::Renamed {
                    writeln!(
                        out,
                        "Renaming {} to {}...",
                        rule.from.display(),
                        rule.to.display()
                    )?;
                } else {
                    tracing::debug!(from = %rule.from.display(), ?outcome, "rename skipped");
                }
                report.renames.push(RenameReport {
                    from: rule.from.clone(),
                    to: rule.to.clone(),
                    outcome,
                });
            }
            Err(e) => {
                tracing::warn!(from = %rule.from.display(), error = %e, "rename failed");
                report.failures.push(CleanupFailure {
                    path: rule.from.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if !manifest.sweep_dir_names.is_empty() {
        writeln!(
            out,
            "Removing cache directories ({})...",
            manifest.sweep_dir_names.join(", ")
        )?;
        for dir in find_cache_dirs(root, &manifest.sweep_dir_names) {
            let rel = dir.strip_prefix(root).unwrap_or(&dir).to_path_buf();
            match remove_target(root, &rel, EntryKind::Directory) {
                Ok(Removal::Removed) => report.swept.push(rel),
                Ok(Removal::Absent) => {}
                Err(e) => {
                    tracing::warn!(path = %rel.display(), error = %e, "cache removal failed");
                    report.failures.push(CleanupFailure {
                        path: rel,
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    report.finished_utc = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into());
    Ok(report)
}
