//! Spatia CLI - command-line interface for the spatia spatial audio engine.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spatia")]
#[command(author, version, about = "Spatia spatial audio engine CLI", long_about = None)]
struct Cli {
    /// Engine configuration file (defaults to the user or system config)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend to activate instead of the configured preference
    #[arg(long, global = true, value_name = "ID")]
    backend: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered backends
    Backends,

    /// Show a backend's capabilities and runtime details
    Capabilities(commands::capabilities::CapabilitiesArgs),

    /// Compute spatial parameters for one sound
    Process(commands::process::ProcessArgs),

    /// List and inspect operator and map profiles
    Profiles(commands::profiles::ProfilesArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();
    let engine = commands::common::build_engine(cli.config.as_deref(), cli.backend.as_deref())?;

    match cli.command {
        Commands::Backends => commands::backends::run(&engine, cli.json),
        Commands::Capabilities(args) => commands::capabilities::run(&engine, args, cli.json),
        Commands::Process(args) => commands::process::run(&engine, args),
        Commands::Profiles(args) => commands::profiles::run(&engine, args, cli.json),
    }
}
