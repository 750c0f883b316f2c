use std::io::Write;
use std::process::{Command, Stdio};

use super::{Notice, NoticeSize, Notifier, NotifyError};

const LARGE_WIDTH: u32 = 800;
const LARGE_HEIGHT: u32 = 600;

/// Blocking modal dialogs through a zenity-compatible program.
pub struct DialogNotifier {
    program: String,
}

impl DialogNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(crate::config::dialog_program())
    }

    /// Arguments for a notice. Large notices use a scrollable text window fed on stdin.
    fn args(notice: &Notice) -> Vec<String> {
        match notice.size {
            NoticeSize::Normal => vec![
                "--error".to_string(),
                format!("--title={}", notice.title),
                "--no-markup".to_string(),
                format!("--text={}", notice.body),
            ],
            NoticeSize::Large => vec![
                "--text-info".to_string(),
                format!("--title={}", notice.title),
                format!("--width={}", LARGE_WIDTH),
                format!("--height={}", LARGE_HEIGHT),
            ],
        }
    }

    fn spawn_error(&self, source: std::io::Error) -> NotifyError {
        NotifyError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl Notifier for DialogNotifier {
    fn notify(&mut self, notice: &Notice) -> Result<(), NotifyError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(Self::args(notice))
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // The dialog's own exit code only tells which button closed it.
        match notice.size {
            NoticeSize::Normal => {
                cmd.stdin(Stdio::null())
                    .status()
                    .map_err(|e| self.spawn_error(e))?;
            }
            NoticeSize::Large => {
                let mut child = cmd
                    .stdin(Stdio::piped())
                    .spawn()
                    .map_err(|e| self.spawn_error(e))?;
                let written = match child.stdin.take() {
                    // Dropping stdin at the end of the arm closes the pipe before waiting.
                    Some(mut stdin) => stdin.write_all(notice.body.as_bytes()),
                    None => Ok(()),
                };
                child.wait()?;
                match written {
                    // The dialog was closed before it read the whole body.
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                    other => other?,
                }
            }
        }
        tracing::debug!(program = %self.program, title = %notice.title, "dialog closed");
        Ok(())
    }
}
