//! Output format selection and the writer trait.

use std::io;

use crate::analysis::ConsolidatedArchitecture;
use crate::io::writers::{JsonWriter, MarkdownWriter, TerminalWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

/// Renders the architecture artifact to some destination.
pub trait OutputWriter {
    fn write_architecture(&mut self, architecture: &ConsolidatedArchitecture)
        -> anyhow::Result<()>;
}

/// Writer for the requested format, targeting stdout.
pub fn create_writer(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(io::stdout())),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new()),
    }
}
