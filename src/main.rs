use anyhow::Result;
use clap::Parser;
use energia_tools::{cli, observability};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    observability::init_tracing();
    let args = cli::LaunchCli::parse();

    let code = cli::run_launch(args).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
