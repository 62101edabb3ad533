//! Packlift CLI - move package artifacts between a developer machine and a
//! remote object store

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

#[derive(Parser)]
#[command(name = "packlift")]
#[command(author = "Packlift Contributors")]
#[command(version)]
#[command(about = "Deploy package artifacts through a pluggable object store", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull the package archive from the remote store and extract it
    Install {
        /// Package root directory
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Archive the package root and push it to the remote store
    Publish {
        /// Package root directory
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Install { root } => commands::install::run(&root).await,
        Commands::Publish { root } => commands::publish::run(&root).await,
    };

    if let Err(error) = result {
        let code = error.exit_code();
        eprintln!("{:?}", miette::Report::new(error));
        std::process::exit(code);
    }
}
