use anyhow::Result;
use clap::Parser;
use energia_tools::{cli, observability};
use std::io::{IsTerminal, Write};

fn main() -> Result<()> {
    observability::init_tracing();
    let args = cli::CleanupCli::parse();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let styled = stdout.is_terminal();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    let code = cli::run_cleanup(&args, &mut input, &mut out, styled)?;
    out.flush()?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
