//! Filesystem operations behind the cleanup run.
//!
//! Removal is idempotent: a missing target is reported as `Absent`, not as an error.
//! Symlinks are removed as links and never followed, and a target whose parent
//! directories include a symlink is refused.

use super::manifest::{EntryKind, RenameRule};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Removal {
    Removed,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RenameOutcome {
    Renamed,
    SourceAbsent,
    /// Destination exists; the source was left untouched.
    DestinationExists,
}

/// Whether every parent component of `rel` below `root` is a real directory.
///
/// Returns `Ok(false)` when a parent is missing, so the target cannot exist.
/// A symlinked parent is an error: following it could leave the root.
fn parents_are_real_dirs(root: &Path, rel: &Path) -> std::io::Result<bool> {
    let Some(parent) = rel.parent() else {
        return Ok(true);
    };
    let mut current = root.to_path_buf();
    for comp in parent.components() {
        current.push(comp);
        let meta = match std::fs::symlink_metadata(&current) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        if meta.file_type().is_symlink() {
            return Err(std::io::Error::other(format!(
                "{} is a symlink; refusing to follow it",
                current.display()
            )));
        }
        if !meta.is_dir() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Remove one manifest target below `root`.
pub fn remove_target(root: &Path, rel: &Path, kind: EntryKind) -> std::io::Result<Removal> {
    if !parents_are_real_dirs(root, rel)? {
        return Ok(Removal::Absent);
    }
    let path = root.join(rel);
    let meta = match std::fs::symlink_metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Removal::Absent),
        Err(e) => return Err(e),
    };

    let ft = meta.file_type();
    let res = if ft.is_symlink() {
        remove_link(&path)
    } else {
        match (kind, ft.is_dir()) {
            (EntryKind::Directory, true) => std::fs::remove_dir_all(&path),
            (EntryKind::File, false) => std::fs::remove_file(&path),
            (EntryKind::Directory, false) => {
                return Err(std::io::Error::other(format!(
                    "{} is not a directory",
                    path.display()
                )))
            }
            (EntryKind::File, true) => {
                return Err(std::io::Error::other(format!(
                    "{} is a directory, expected a file",
                    path.display()
                )))
            }
        }
    };

    match res {
        Ok(()) => Ok(Removal::Removed),
        // Raced with another deleter; the target is gone either way.
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Removal::Absent),
        Err(e) => Err(e),
    }
}

fn remove_link(path: &Path) -> std::io::Result<()> {
    // Windows directory symlinks need remove_dir; everywhere else remove_file drops the link.
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if cfg!(windows) => std::fs::remove_dir(path).map_err(|_| e),
        Err(e) => Err(e),
    }
}

/// Apply a rename rule without ever overwriting the destination.
pub fn apply_rename(root: &Path, rule: &RenameRule) -> std::io::Result<RenameOutcome> {
    if !parents_are_real_dirs(root, &rule.from)? {
        return Ok(RenameOutcome::SourceAbsent);
    }
    parents_are_real_dirs(root, &rule.to)?;
    let from = root.join(&rule.from);
    let to = root.join(&rule.to);
    if std::fs::symlink_metadata(&from).is_err() {
        return Ok(RenameOutcome::SourceAbsent);
    }
    if std::fs::symlink_metadata(&to).is_ok() {
        return Ok(RenameOutcome::DestinationExists);
    }
    std::fs::rename(&from, &to)?;
    Ok(RenameOutcome::Renamed)
}

/// Directories under `root` (any depth) whose name is in `names`.
///
/// Matches are not descended into; symlinked directories are not followed.
pub fn find_cache_dirs(root: &Path, names: &[String]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if names.is_empty() {
        return found;
    }
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry during cache sweep");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map(|n| names.iter().any(|want| want == n))
            .unwrap_or(false);
        if matches {
            found.push(entry.into_path());
            walker.skip_current_dir();
        }
    }
    found
}
