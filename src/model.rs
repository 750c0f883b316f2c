use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

/// Interpreter location relative to the project root.
pub const INTERPRETER_REL: &str = "venv/bin/python";
/// Data-processing program relative to the project root.
pub const PROCESSING_REL: &str = "adatfeldolgozo.py";
/// Interactive viewer program relative to the project root.
pub const VIEWER_REL: &str = "energia_monitor_ctk.py";

/// Every path the launcher touches, resolved once from the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPaths {
    pub root: PathBuf,
    pub interpreter: PathBuf,
    pub processing: PathBuf,
    pub viewer: PathBuf,
}

impl LaunchPaths {
    pub fn resolve(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            interpreter: root.join(INTERPRETER_REL),
            processing: root.join(PROCESSING_REL),
            viewer: root.join(VIEWER_REL),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Precheck,
    Processing,
    Viewer,
}

/// Result of a stage whose output was captured.
#[derive(Debug, Clone)]
pub struct CapturedRun {
    pub status: ExitStatus,
    /// Combined stdout and stderr in arrival order.
    pub output: String,
    pub elapsed: Duration,
}

impl CapturedRun {
    pub fn succeeded(&self) -> bool {
        self.status.success()
    }
}

/// Map an exit status to a process exit code.
/// Signal terminations follow the shell convention of 128 + signal.
pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    1
}

/// Progress lines the launcher writes to stdout.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    PhaseStarted { phase: Phase },
    ProcessingFinished { elapsed: Duration },
    ViewerExited { code: i32 },
}

impl ProgressEvent {
    /// Render a human-readable progress line.
    pub fn to_message(&self) -> String {
        match self {
            ProgressEvent::PhaseStarted { phase } => match phase {
                Phase::Precheck => "Checking Python environment...".to_string(),
                Phase::Processing => "Running data processing (adatfeldolgozo.py)...".to_string(),
                Phase::Viewer => "Starting energia monitor...".to_string(),
            },
            ProgressEvent::ProcessingFinished { elapsed } => {
                // Millisecond precision is plenty for a progress line.
                let rounded = Duration::from_millis(elapsed.as_millis() as u64);
                format!(
                    "Data processing finished in {}",
                    humantime::format_duration(rounded)
                )
            }
            ProgressEvent::ViewerExited { code } => {
                format!("Energia monitor exited with status {}", code)
            }
        }
    }
}

/// Terminal outcome of a launcher run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    EnvironmentMissing,
    ProcessingFailed { code: Option<i32> },
    ViewerFailedToStart,
    ViewerExited { code: i32 },
}

impl LaunchOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchOutcome::EnvironmentMissing
            | LaunchOutcome::ProcessingFailed { .. }
            | LaunchOutcome::ViewerFailedToStart => 1,
            LaunchOutcome::ViewerExited { code } => *code,
        }
    }
}
