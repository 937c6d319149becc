//! Command-line interface definition.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::io;

#[derive(Parser, Debug)]
#[command(name = "archmap")]
#[command(about = "Monolith decomposition analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a configuration file (overrides .archmap.toml discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a dependency graph and propose a decomposition
    Analyze {
        /// Dependency graph JSON produced by the ingester
        graph: PathBuf,

        /// Output format for the report
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Base path for the JSON artifacts (graph, architecture,
        /// entrypoints); report goes to stdout regardless
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Build-file dependency map JSON (coordinate -> full version)
        #[arg(long)]
        deps_file: Option<PathBuf>,

        /// Worker threads for signal computation (0 = rayon default)
        #[arg(short, long, default_value = "0")]
        jobs: usize,
    },

    /// Check a dependency graph against the producer contract
    Validate {
        /// Dependency graph JSON to check
        graph: PathBuf,
    },

    /// Write a default .archmap.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

impl From<OutputFormat> for io::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => io::OutputFormat::Terminal,
            OutputFormat::Json => io::OutputFormat::Json,
            OutputFormat::Markdown => io::OutputFormat::Markdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["archmap"];
        full.extend(args);
        Cli::parse_from(full)
    }

    #[test]
    fn analyze_defaults_to_terminal_format() {
        let cli = parse(&["analyze", "graph.json"]);
        match cli.command {
            Commands::Analyze { format, jobs, .. } => {
                assert_eq!(format, OutputFormat::Terminal);
                assert_eq!(jobs, 0);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn analyze_accepts_format_and_output() {
        let cli = parse(&["analyze", "graph.json", "--format", "json", "-o", "out.json"]);
        match cli.command {
            Commands::Analyze { format, output, .. } => {
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn global_config_flag_is_parsed() {
        let cli = parse(&["--config", "custom.toml", "validate", "graph.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn init_force_flag() {
        let cli = parse(&["init", "--force"]);
        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("expected init"),
        }
    }
}
