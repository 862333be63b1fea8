//! Umber CLI - command-line front end for the import pipeline

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{import, inspect};

#[derive(Parser)]
#[command(name = "umber")]
#[command(about = "Skeletal mesh and animation import pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a graph description and assemble every model it names
    Import {
        /// Path to the TOML graph description
        graph: String,

        /// Path to a TOML action-filter file
        #[arg(long)]
        filters: Option<String>,
    },

    /// Decode a single mesh or animation file and print its contents
    Inspect {
        /// Path to a .psk or .psa file
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Import { graph, filters } => import::run(&graph, filters.as_deref()),
        Commands::Inspect { file } => inspect::run(&file),
    }
}
