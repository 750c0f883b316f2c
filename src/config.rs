//! Environment-backed settings shared by both binaries.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub mod keys {
    pub const PROJECT_ROOT: &str = "ENERGIA_PROJECT_ROOT";
    pub const NOTIFIER: &str = "ENERGIA_NOTIFIER";
    pub const MANIFEST: &str = "ENERGIA_MANIFEST";
    pub const LOG_LEVEL: &str = "ENERGIA_LOG_LEVEL";
    pub const LOG_JSON: &str = "ENERGIA_LOG_JSON";
    pub const QUIET: &str = "ENERGIA_QUIET";
    pub const DIALOG_BIN: &str = "ENERGIA_DIALOG_BIN";
}

const DEFAULT_LOG_LEVEL: &str = "energia_tools=warn";
const DEFAULT_DIALOG_BIN: &str = "zenity";

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| Self {
            quiet: env_bool(keys::QUIET, false),
            log_level: env_or(keys::LOG_LEVEL, DEFAULT_LOG_LEVEL),
            log_json: env_bool(keys::LOG_JSON, false),
        })
    }
}

/// Program used to show modal dialogs.
pub fn dialog_program() -> String {
    env_or(keys::DIALOG_BIN, DEFAULT_DIALOG_BIN)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolve the launcher's project root once at startup.
///
/// An explicit override wins; otherwise the directory holding the running
/// executable is used, so the launcher behaves the same from any working directory.
pub fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return canonical_root(p);
    }
    let exe = std::env::current_exe().context("locate current executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .context("executable has no parent directory")
}

/// Resolve the cleanup root: an explicit override, else the operator's working directory.
pub fn resolve_cleanup_root(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => canonical_root(p),
        None => {
            let cwd = std::env::current_dir().context("locate current directory")?;
            canonical_root(&cwd)
        }
    }
}

fn canonical_root(p: &Path) -> Result<PathBuf> {
    p.canonicalize()
        .with_context(|| format!("project root {} is not accessible", p.display()))
}
