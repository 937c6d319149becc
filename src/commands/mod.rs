//! Command handlers behind the CLI surface.

pub mod analyze;
pub mod init;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::DependencyGraph;

/// Load a dependency graph JSON file.
pub fn load_graph(path: &Path) -> Result<DependencyGraph> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse dependency graph {}", path.display()))
}
