//! netlens command line front end.
//!
//! Loads a snapshot of collected tables and an optional engine configuration,
//! runs one interface operation and renders its table.

pub mod cli;
pub mod render;

use anyhow::Context;
use cli::{Cli, Command, InterfaceCommand};
use netlens_engine::{EngineConfig, InterfacesEngine, MemoryAccessor, Snapshot, Table};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// `level` wins over `RUST_LOG`; without either, `info` applies.
pub fn init_logging(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{}'", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set logger: {}", e))
}

/// Builds the engine from the files named on the command line.
pub fn load_engine(cli: &Cli) -> anyhow::Result<InterfacesEngine<MemoryAccessor>> {
    let config = EngineConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    config.validate().context("validating config")?;

    let snapshot = Snapshot::from_json_file(&cli.snapshot)
        .with_context(|| format!("loading snapshot {}", cli.snapshot.display()))?;
    Ok(InterfacesEngine::new(MemoryAccessor::new(snapshot), config))
}

/// Runs the selected operation.
pub fn execute(engine: &InterfacesEngine<MemoryAccessor>, command: &Command) -> anyhow::Result<Table> {
    let table = match command {
        Command::Interface(InterfaceCommand::Show(filters)) => engine.get(&filters.to_query())?,
        Command::Interface(InterfaceCommand::Assert(args)) => engine.aver(&args.to_request())?,
        Command::Interface(InterfaceCommand::Summarize(filters)) => {
            engine.summarize(&filters.to_query())?
        }
        Command::Interface(InterfaceCommand::Top(args)) => engine.top(
            &args.what,
            args.count,
            args.reverse,
            &args.filters.to_query(),
        )?,
    };
    debug!(rows = table.len(), "operation complete");
    Ok(table)
}

/// Loads, executes and renders.
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    let engine = load_engine(cli)?;
    info!(command = ?cli.command, "running");
    let table = execute(&engine, &cli.command)?;
    render::render(&table, cli.format)
}
