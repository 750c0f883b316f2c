//! Deletion manifest.
//!
//! The manifest is plain data: which paths to delete, grouped by category, plus
//! the legacy rename rule and the cache directory names to sweep. Keeping it
//! separate from the deletion routine lets it be printed, audited and tested.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const MANIFEST_NAME: &str = "energia-cleanup";
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest entry has an empty path")]
    EmptyPath,
    #[error("manifest path '{0}' must be relative to the project root")]
    NotRelative(String),
    #[error("manifest path '{0}' must not contain '..'")]
    ParentTraversal(String),
    #[error("rename rule '{0}' has the same source and destination")]
    RenameOntoItself(String),
    #[error("sweep name '{0}' must be a single directory name")]
    InvalidSweepName(String),
    #[error("unsupported manifest version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BuildArtifacts,
    AnalysisOutputs,
    DeprecatedScripts,
    DeprecatedDesktop,
    TemporaryData,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::BuildArtifacts,
        Category::AnalysisOutputs,
        Category::DeprecatedScripts,
        Category::DeprecatedDesktop,
        Category::TemporaryData,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::BuildArtifacts => "build artifacts",
            Category::AnalysisOutputs => "analysis and report outputs",
            Category::DeprecatedScripts => "deprecated scripts and helpers",
            Category::DeprecatedDesktop => "deprecated desktop integration files",
            Category::TemporaryData => "temporary and data files",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub category: Category,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Move `from` to `to` unless `to` already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRule {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: u32,
    pub entries: Vec<ManifestEntry>,
    #[serde(default)]
    pub legacy_renames: Vec<RenameRule>,
    #[serde(default)]
    pub sweep_dir_names: Vec<String>,
}

use Category::*;
use EntryKind::{Directory as D, File as F};

const BUILTIN_ENTRIES: &[(Category, &str, EntryKind)] = &[
    (BuildArtifacts, "build", D),
    (BuildArtifacts, "dist", D),
    (BuildArtifacts, "energia_monitor.spec", F),
    (BuildArtifacts, "energia_monitor_ctk.spec", F),
    (BuildArtifacts, "energia_monitor.egg-info", D),
    (BuildArtifacts, ".pytest_cache", D),
    (AnalysisOutputs, "diagrams", D),
    (AnalysisOutputs, "reports", D),
    (AnalysisOutputs, "htmlcov", D),
    (AnalysisOutputs, ".coverage", F),
    (AnalysisOutputs, "dependency_graph.png", F),
    (AnalysisOutputs, "dependency_graph.svg", F),
    (AnalysisOutputs, "code_analysis_report.html", F),
    (AnalysisOutputs, "code_analysis_report.md", F),
    (AnalysisOutputs, "project_structure.txt", F),
    (DeprecatedScripts, "energia_monitor.py", F),
    (DeprecatedScripts, "energia_monitor_old.py", F),
    (DeprecatedScripts, "adatfeldolgozo_old.py", F),
    (DeprecatedScripts, "fix_duplicates.py", F),
    (DeprecatedScripts, "convert_csv.py", F),
    (DeprecatedScripts, "run_gui.sh", F),
    (DeprecatedScripts, "start.sh", F),
    (DeprecatedScripts, "core/legacy_validator.py", F),
    (DeprecatedDesktop, "energia_monitor.desktop", F),
    (DeprecatedDesktop, "EnergiaMonitor.desktop", F),
    (DeprecatedDesktop, "install_desktop.sh", F),
    (DeprecatedDesktop, "desktop", D),
    (TemporaryData, "temp", D),
    (TemporaryData, "tmp_data.csv", F),
    (TemporaryData, "debug.log", F),
    (TemporaryData, "adatfeldolgozo.log", F),
    (TemporaryData, "nohup.out", F),
];

impl Manifest {
    /// The built-in manifest for the energia monitor project.
    pub fn builtin() -> Self {
        Self {
            name: MANIFEST_NAME.to_string(),
            version: MANIFEST_VERSION,
            entries: BUILTIN_ENTRIES
                .iter()
                .map(|&(category, path, kind)| ManifestEntry {
                    category,
                    path: PathBuf::from(path),
                    kind,
                })
                .collect(),
            legacy_renames: vec![RenameRule {
                from: PathBuf::from("export"),
                to: PathBuf::from("exports_regi"),
            }],
            sweep_dir_names: vec!["__pycache__".to_string()],
        }
    }

    /// Load and validate a JSON manifest.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&raw).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reject anything that could reach outside the project root.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion {
                found: self.version,
                expected: MANIFEST_VERSION,
            });
        }
        for entry in &self.entries {
            validate_relative(&entry.path)?;
        }
        for rule in &self.legacy_renames {
            validate_relative(&rule.from)?;
            validate_relative(&rule.to)?;
            if rule.from == rule.to {
                return Err(ManifestError::RenameOntoItself(
                    rule.from.display().to_string(),
                ));
            }
        }
        for name in &self.sweep_dir_names {
            let mut comps = Path::new(name).components();
            let single_normal = matches!(comps.next(), Some(Component::Normal(_)))
                && comps.next().is_none();
            if !single_normal {
                return Err(ManifestError::InvalidSweepName(name.clone()));
            }
        }
        Ok(())
    }

    /// Entries grouped by category, categories in their fixed order.
    /// Empty categories are omitted; order within a category is preserved.
    pub fn by_category(&self) -> Vec<(Category, Vec<&ManifestEntry>)> {
        Category::ALL
            .iter()
            .map(|&cat| {
                let items: Vec<&ManifestEntry> =
                    self.entries.iter().filter(|e| e.category == cat).collect();
                (cat, items)
            })
            .filter(|(_, items)| !items.is_empty())
            .collect()
    }
}

fn validate_relative(path: &Path) -> Result<(), ManifestError> {
    if path.as_os_str().is_empty() {
        return Err(ManifestError::EmptyPath);
    }
    for comp in path.components() {
        match comp {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(ManifestError::ParentTraversal(path.display().to_string()))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ManifestError::NotRelative(path.display().to_string()))
            }
        }
    }
    // "." alone would target the root itself.
    if path.components().all(|c| matches!(c, Component::CurDir)) {
        return Err(ManifestError::EmptyPath);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_manifest_is_valid() {
        let m = Manifest::builtin();
        m.validate().unwrap();
        assert_eq!(m.version, MANIFEST_VERSION);
        assert!(m.entries.len() >= 30);
    }

    #[test]
    fn builtin_paths_are_unique() {
        let m = Manifest::builtin();
        let unique: HashSet<_> = m.entries.iter().map(|e| &e.path).collect();
        assert_eq!(unique.len(), m.entries.len());
    }

    #[test]
    fn builtin_covers_every_category_in_order() {
        let m = Manifest::builtin();
        let groups = m.by_category();
        let cats: Vec<Category> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(cats, Category::ALL.to_vec());
    }

    #[test]
    fn builtin_does_not_touch_runtime_files() {
        let m = Manifest::builtin();
        for keep in ["venv", "adatfeldolgozo.py", "energia_monitor_ctk.py", "core", "export"] {
            assert!(
                !m.entries.iter().any(|e| e.path == Path::new(keep)),
                "{keep} must not be deleted"
            );
        }
    }

    #[test]
    fn rejects_absolute_and_parent_paths() {
        let mut m = Manifest::builtin();
        m.entries[0].path = PathBuf::from("/etc");
        assert!(matches!(m.validate(), Err(ManifestError::NotRelative(_))));

        m.entries[0].path = PathBuf::from("build/../../home");
        assert!(matches!(m.validate(), Err(ManifestError::ParentTraversal(_))));

        m.entries[0].path = PathBuf::from(".");
        assert!(matches!(m.validate(), Err(ManifestError::EmptyPath)));
    }

    #[test]
    fn rejects_bad_sweep_names_and_renames() {
        let mut m = Manifest::builtin();
        m.sweep_dir_names = vec!["a/__pycache__".to_string()];
        assert!(matches!(m.validate(), Err(ManifestError::InvalidSweepName(_))));

        let mut m = Manifest::builtin();
        m.legacy_renames[0].to = m.legacy_renames[0].from.clone();
        assert!(matches!(m.validate(), Err(ManifestError::RenameOntoItself(_))));
    }

    #[test]
    fn json_form_is_stable() {
        let m = Manifest::builtin();
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["name"], "energia-cleanup");
        assert_eq!(json["entries"][0]["category"], "build_artifacts");
        assert_eq!(json["entries"][0]["kind"], "directory");
        let back: Manifest = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn load_reads_and_validates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("manifest.json");
        std::fs::write(
            &path,
            r#"{"name":"custom","version":1,"entries":[{"category":"temporary_data","path":"scratch","kind":"directory"}]}"#,
        )
        .unwrap();
        let m = Manifest::load(&path).unwrap();
        assert_eq!(m.entries.len(), 1);
        assert!(m.legacy_renames.is_empty());

        std::fs::write(&path, r#"{"name":"x","version":9,"entries":[]}"#).unwrap();
        assert!(matches!(
            Manifest::load(&path),
            Err(ManifestError::UnsupportedVersion { found: 9, .. })
        ));
    }
}
