//! archmap CLI entry point.
//!
//! Handles panic-hook installation, tracing setup, argument parsing, and
//! command dispatch; the command implementations live in `commands`.

use anyhow::Result;
use clap::Parser;

use archmap::cli::{Cli, Commands};
use archmap::commands;
use archmap::commands::analyze::AnalyzeOptions;
use archmap::config::CONFIG_ENV_VAR;
use archmap::observability::{init_tracing, install_panic_hook};

fn main() -> Result<()> {
    install_panic_hook();
    init_tracing();

    let cli = Cli::parse();

    // Custom config path is handed to the loader through the environment so
    // the OnceLock-backed loader stays path-agnostic.
    if let Some(config_path) = &cli.config {
        std::env::set_var(CONFIG_ENV_VAR, config_path);
    }

    match cli.command {
        Commands::Analyze {
            graph,
            format,
            output,
            deps_file,
            jobs,
        } => commands::analyze::run(AnalyzeOptions {
            graph_path: graph,
            format: format.into(),
            output,
            deps_file,
            jobs,
        }),
        Commands::Validate { graph } => commands::validate::run(&graph),
        Commands::Init { force } => commands::init::run(force),
    }
}
