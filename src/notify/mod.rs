//! Failure notification.
//!
//! The launcher may run without an attached console, so failures are surfaced
//! through a `Notifier`: a blocking modal dialog in production, or a plain
//! stream writer when no display is available (and in tests).

mod console;
mod dialog;

pub use console::ConsoleNotifier;
pub use dialog::DialogNotifier;

use clap::ValueEnum;
use std::io::Write;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to start dialog program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("notification i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Display area requested for a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeSize {
    Normal,
    /// Scrollable, larger window for long captured output.
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub size: NoticeSize,
}

impl Notice {
    pub fn environment_missing(interpreter: &std::path::Path) -> Self {
        Self {
            title: "Missing Python environment".to_string(),
            body: format!(
                "The Python virtual environment was not found:\n{}\n\n\
                 Create it with 'python3 -m venv venv' in the project directory \
                 and install the requirements.",
                interpreter.display()
            ),
            size: NoticeSize::Normal,
        }
    }

    /// The body is the processing step's captured output, unaltered.
    pub fn processing_failed(captured: &str) -> Self {
        Self {
            title: "Data processing failed".to_string(),
            body: captured.to_string(),
            size: NoticeSize::Large,
        }
    }

    pub fn configuration_error(detail: &str) -> Self {
        Self {
            title: "Launcher configuration error".to_string(),
            body: detail.to_string(),
            size: NoticeSize::Normal,
        }
    }

    pub fn viewer_failed(detail: &str) -> Self {
        Self {
            title: "Viewer failed to start".to_string(),
            body: detail.to_string(),
            size: NoticeSize::Normal,
        }
    }
}

pub trait Notifier {
    /// Show the notice and block until the user has seen it.
    fn notify(&mut self, notice: &Notice) -> Result<(), NotifyError>;
}

/// Notifier selection, exposed as a CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum NotifierKind {
    /// Graphical modal dialog (zenity)
    Dialog,
    /// Plain text on stderr
    Console,
}

/// Build the notifier for `kind`.
pub fn build(kind: NotifierKind) -> Box<dyn Notifier> {
    match kind {
        NotifierKind::Dialog => Box::new(DialogNotifier::from_env()),
        NotifierKind::Console => Box::new(ConsoleNotifier::stderr()),
    }
}

/// Deliver a notice, falling back to stderr when the notifier itself fails.
pub fn deliver(notifier: &mut dyn Notifier, notice: &Notice) {
    deliver_or(notifier, notice, &mut std::io::stderr());
}

/// Deliver a notice, writing it to `fallback` when the notifier fails.
/// Returns whether the fallback was used.
pub fn deliver_or(
    notifier: &mut dyn Notifier,
    notice: &Notice,
    fallback: &mut dyn Write,
) -> bool {
    match notifier.notify(notice) {
        Ok(()) => false,
        Err(e) => {
            tracing::warn!(error = %e, title = %notice.title, "notifier failed, falling back to console");
            let _ = ConsoleNotifier::new(fallback).notify(notice);
            true
        }
    }
}
