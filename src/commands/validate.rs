//! The `validate` command: check a graph against the producer contract.

use anyhow::{bail, Result};
use std::path::Path;

pub fn run(graph_path: &Path) -> Result<()> {
    let graph = super::load_graph(graph_path)?;
    let violations = graph.closure_violations();

    if violations.is_empty() {
        println!(
            "OK: {} components, {} edges, producer contract holds",
            graph.components.len(),
            graph.edges.len()
        );
        return Ok(());
    }

    for violation in &violations {
        eprintln!("violation: {violation}");
    }
    bail!(
        "{} producer-contract violation(s) in {}",
        violations.len(),
        graph_path.display()
    );
}
