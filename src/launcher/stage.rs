//! Subprocess stages.

use crate::model::CapturedRun;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// `<interpreter> <script>` run from the project root.
#[derive(Debug, Clone)]
pub struct StageCommand {
    pub interpreter: PathBuf,
    pub script: PathBuf,
    pub cwd: PathBuf,
}

impl StageCommand {
    pub fn new(interpreter: &Path, script: &Path, cwd: &Path) -> Self {
        Self {
            interpreter: interpreter.to_path_buf(),
            script: script.to_path_buf(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn display(&self) -> String {
        format!("{} {}", self.interpreter.display(), self.script.display())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(&self.script).current_dir(&self.cwd);
        cmd
    }

    fn io_error(&self, source: std::io::Error) -> StageError {
        StageError::Io {
            program: self.display(),
            source,
        }
    }
}

/// Stage 1: run to completion, capturing stdout and stderr into one text value.
///
/// Both pipes are drained concurrently and appended in arrival order, which
/// keeps the interleaving close to `2>&1` and avoids pipe-buffer deadlocks.
pub async fn run_captured(stage: &StageCommand) -> Result<CapturedRun, StageError> {
    let started = Instant::now();
    let mut child = stage
        .command()
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| StageError::Spawn {
            program: stage.display(),
            source,
        })?;
    tracing::debug!(program = %stage.display(), pid = ?child.id(), "stage started");

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();
    let mut combined: Vec<u8> = Vec::new();
    let mut out_buf = [0u8; 4096];
    let mut err_buf = [0u8; 4096];

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            res = read_some(&mut stdout, &mut out_buf), if stdout.is_some() => {
                match res.map_err(|e| stage.io_error(e))? {
                    0 => stdout = None,
                    n => combined.extend_from_slice(&out_buf[..n]),
                }
            }
            res = read_some(&mut stderr, &mut err_buf), if stderr.is_some() => {
                match res.map_err(|e| stage.io_error(e))? {
                    0 => stderr = None,
                    n => combined.extend_from_slice(&err_buf[..n]),
                }
            }
        }
    }

    let status = child.wait().await.map_err(|e| stage.io_error(e))?;
    let elapsed = started.elapsed();
    tracing::debug!(
        program = %stage.display(),
        status = %status,
        output_len = combined.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "stage finished"
    );

    Ok(CapturedRun {
        status,
        output: String::from_utf8_lossy(&combined).into_owned(),
        elapsed,
    })
}

async fn read_some<R>(reader: &mut Option<R>, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: tokio::io::AsyncRead + Unpin,
{
    match reader.as_mut() {
        Some(r) => r.read(buf).await,
        None => Ok(0),
    }
}

/// Stage 2: run with inherited stdio and wait for it to finish.
pub async fn run_inherited(stage: &StageCommand) -> Result<ExitStatus, StageError> {
    let status = stage
        .command()
        .status()
        .await
        .map_err(|source| StageError::Spawn {
            program: stage.display(),
            source,
        })?;
    tracing::debug!(program = %stage.display(), status = %status, "stage finished");
    Ok(status)
}
