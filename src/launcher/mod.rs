//! Launcher orchestration.
//!
//! Runs the processing step, gates on its exit status and hands the session to
//! the viewer. Stages run strictly one after another; failures are reported
//! through a `Notifier` and end the run.

mod pipeline;
mod stage;

pub use pipeline::{check_environment, launch};
pub use stage::{run_captured, run_inherited, StageCommand, StageError};
