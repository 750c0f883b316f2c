use crate::cleanup::{self, Manifest};
use crate::config::{self, keys};
use crate::model::LaunchPaths;
use crate::notify::{self, Notice, Notifier, NotifierKind};
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Exit status when the operator declines the cleanup prompt.
pub const EXIT_DECLINED: i32 = 1;
/// Exit status when some cleanup targets could not be removed.
pub const EXIT_PARTIAL: i32 = 2;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "energia-launch",
    version,
    about = "Run the energia data processing step, then start the monitor"
)]
pub struct LaunchCli {
    /// Project directory (defaults to the directory holding this executable)
    #[arg(long, env = keys::PROJECT_ROOT)]
    pub project_root: Option<PathBuf>,

    /// How failures are reported
    #[arg(long, value_enum, env = keys::NOTIFIER, default_value = "dialog")]
    pub notifier: NotifierKind,
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "energia-cleanup",
    version,
    about = "Delete build artifacts, stale reports and deprecated files from the project"
)]
pub struct CleanupCli {
    /// Project directory (defaults to the current working directory)
    #[arg(long, env = keys::PROJECT_ROOT)]
    pub project_root: Option<PathBuf>,

    /// JSON manifest to use instead of the built-in one
    #[arg(long, env = keys::MANIFEST)]
    pub manifest: Option<PathBuf>,

    /// Print the manifest as JSON and exit without deleting anything
    #[arg(long)]
    pub print_manifest: bool,

    /// Print the cleanup report as JSON after the run
    #[arg(long)]
    pub json: bool,
}

pub async fn run_launch(args: LaunchCli) -> Result<i32> {
    let mut notifier = notify::build(args.notifier);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    Ok(launch_with(&args, notifier.as_mut(), &mut out).await)
}

/// Launcher body with the notifier and progress stream supplied by the caller.
/// Root resolution failures are reported through `notifier` like every other failure.
pub async fn launch_with(
    args: &LaunchCli,
    notifier: &mut dyn Notifier,
    out: &mut dyn Write,
) -> i32 {
    let root = match config::resolve_project_root(args.project_root.as_deref()) {
        Ok(root) => root,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "project root could not be resolved");
            notify::deliver(notifier, &Notice::configuration_error(&format!("{e:#}")));
            return 1;
        }
    };
    let paths = LaunchPaths::resolve(&root);
    tracing::debug!(root = %root.display(), notifier = ?args.notifier, "launcher starting");

    let outcome = crate::launcher::launch(&paths, notifier, out).await;
    tracing::debug!(?outcome, "launcher finished");
    outcome.exit_code()
}

/// Load the manifest selected by `args`, validated.
pub fn load_manifest(args: &CleanupCli) -> Result<Manifest> {
    match args.manifest.as_deref() {
        Some(p) => Manifest::load(p).context("failed to load cleanup manifest"),
        None => {
            let m = Manifest::builtin();
            m.validate().context("built-in manifest is invalid")?;
            Ok(m)
        }
    }
}

/// Run the cleanup tool against explicit streams and return the exit status.
/// `styled` enables terminal colours for the banners.
pub fn run_cleanup(
    args: &CleanupCli,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    styled: bool,
) -> Result<i32> {
    let manifest = load_manifest(args)?;

    if args.print_manifest {
        let json = serde_json::to_string_pretty(&manifest)?;
        writeln!(out, "{}", json)?;
        return Ok(0);
    }

    let root = config::resolve_cleanup_root(args.project_root.as_deref())?;
    writeln!(out, "Project directory: {}", root.display())?;
    cleanup::print_warning_banner(out, styled)?;

    if !cleanup::confirm(input, out).context("failed to read confirmation")? {
        writeln!(out, "Aborted. Nothing was deleted.")?;
        tracing::info!("cleanup declined by operator");
        return Ok(EXIT_DECLINED);
    }

    let report = cleanup::run_cleanup(&root, &manifest, out).context("cleanup failed")?;

    for line in crate::text_summary::build_cleanup_summary(&report).lines {
        writeln!(out, "{}", line)?;
    }
    let banner = "Cleanup finished.";
    if styled {
        writeln!(out, "{}", banner.green().bold())?;
    } else {
        writeln!(out, "{}", banner)?;
    }

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    }

    Ok(if report.has_failures() {
        EXIT_PARTIAL
    } else {
        0
    })
}
