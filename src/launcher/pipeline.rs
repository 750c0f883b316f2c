//! Precheck, processing gate and viewer hand-off.

use std::io::Write;

use super::stage::{run_captured, run_inherited, StageCommand};
use crate::model::{exit_code, LaunchOutcome, LaunchPaths, Phase, ProgressEvent};
use crate::notify::{self, Notice, Notifier};

/// Whether the runtime interpreter exists. Nothing is parsed.
pub fn check_environment(paths: &LaunchPaths) -> bool {
    paths.interpreter.is_file()
}

fn progress(out: &mut dyn Write, event: ProgressEvent) {
    // Progress output is best effort; a closed stdout must not abort the run.
    let _ = writeln!(out, "{}", event.to_message());
    let _ = out.flush();
}

/// Run the launcher pipeline to its terminal outcome.
///
/// Every failure is reported through `notifier` before returning; the caller
/// only maps the outcome to an exit code.
pub async fn launch(
    paths: &LaunchPaths,
    notifier: &mut dyn Notifier,
    out: &mut dyn Write,
) -> LaunchOutcome {
    progress(out, ProgressEvent::PhaseStarted { phase: Phase::Precheck });
    if !check_environment(paths) {
        tracing::error!(interpreter = %paths.interpreter.display(), "python environment missing");
        notify::deliver(notifier, &Notice::environment_missing(&paths.interpreter));
        return LaunchOutcome::EnvironmentMissing;
    }

    progress(out, ProgressEvent::PhaseStarted { phase: Phase::Processing });
    let processing = StageCommand::new(&paths.interpreter, &paths.processing, &paths.root);
    let captured = match run_captured(&processing).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!(error = %e, "processing step could not run");
            notify::deliver(notifier, &Notice::processing_failed(&e.to_string()));
            return LaunchOutcome::ProcessingFailed { code: None };
        }
    };

    if !captured.succeeded() {
        tracing::error!(status = %captured.status, "processing step failed");
        notify::deliver(notifier, &Notice::processing_failed(&captured.output));
        return LaunchOutcome::ProcessingFailed {
            code: captured.status.code(),
        };
    }
    progress(
        out,
        ProgressEvent::ProcessingFinished {
            elapsed: captured.elapsed,
        },
    );

    progress(out, ProgressEvent::PhaseStarted { phase: Phase::Viewer });
    let viewer = StageCommand::new(&paths.interpreter, &paths.viewer, &paths.root);
    match run_inherited(&viewer).await {
        Ok(status) => {
            let code = exit_code(&status);
            progress(out, ProgressEvent::ViewerExited { code });
            LaunchOutcome::ViewerExited { code }
        }
        Err(e) => {
            tracing::error!(error = %e, "viewer could not start");
            notify::deliver(notifier, &Notice::viewer_failed(&e.to_string()));
            LaunchOutcome::ViewerFailedToStart
        }
    }
}
