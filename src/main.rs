use clap::Parser;
use cmi5_tools::compile;
use cmi5_tools::config::{CompileArgs, CompileConfig};
use cmi5_tools::{Result, ToolError};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = CompileArgs::parse();
    if let Err(error) = run(args) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(args: CompileArgs) -> Result<()> {
    init_logging()?;

    let config = CompileConfig::from(&args);
    let archiver = args.archiver.archiver();
    let summary = compile::compile(&config, archiver.as_ref())?;
    info!(archive_count = summary.archives.len(), "compile finished");
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}
