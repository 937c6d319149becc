//! The `analyze` command: run the full pipeline and emit artifacts.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis;
use crate::config;
use crate::io::{create_writer, OutputFormat};

pub struct AnalyzeOptions {
    pub graph_path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub deps_file: Option<PathBuf>,
    pub jobs: usize,
}

pub fn run(options: AnalyzeOptions) -> Result<()> {
    configure_thread_pool(options.jobs);
    let config = config::init_config()?;

    let mut graph = super::load_graph(&options.graph_path)?;
    info!(
        components = graph.components.len(),
        edges = graph.edges.len(),
        "dependency graph loaded"
    );

    let project_dependencies = match &options.deps_file {
        Some(path) => load_dependency_map(path)?,
        None => BTreeMap::new(),
    };

    let candidates = analysis::analyze_graph(&mut graph, config);
    let architecture =
        analysis::build_architecture(&candidates, &graph.components, &project_dependencies, config);
    analysis::stamp_decomposition_accuracy(&mut graph, &candidates, &architecture);

    if let Some(output) = &options.output {
        write_json(output, &graph)?;
        write_json(&sibling_artifact(output, "architecture"), &architecture)?;
        write_json(
            &sibling_artifact(output, "entrypoints"),
            &graph.api_contracts,
        )?;
        info!(base = %output.display(), "artifacts written");
    }

    create_writer(options.format).write_architecture(&architecture)
}

/// Sibling path `out.json` → `out_architecture.json`.
fn sibling_artifact(base: &Path, suffix: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    base.with_file_name(format!("{stem}_{suffix}.json"))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn load_dependency_map(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dependency map {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse dependency map {}", path.display()))
}

fn configure_thread_pool(jobs: usize) {
    if jobs > 0 {
        // Errors only when a global pool already exists, which is fine.
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global();
    }
}
