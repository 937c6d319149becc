//! The inference core: a total pure pipeline over the dependency graph.
//!
//! Phases run strictly in order — layer classification, clustering, metrics,
//! rule evaluation, inter-cluster signals, consolidation, naming, viability
//! scoring, recommendation — with single-writer ownership per phase. The
//! core never raises on bad input; every division degrades to a defined
//! value and missing data falls back to neutral defaults.

pub mod cluster_metrics;
pub mod clustering;
pub mod consolidate;
pub mod intercluster;
pub mod layers;
pub mod naming;
pub mod recommend;
pub mod rules;
pub mod tokens;
pub mod viability;

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::core::{DependencyGraph, MicroserviceCandidates};

pub use consolidate::{ClusterConsolidator, DisjointGroups};
pub use intercluster::{InterClusterGraph, PairSignals};
pub use recommend::{
    build_architecture, ConsolidatedArchitecture, ConsolidatedMetrics, MicroserviceProposal,
    ProjectMetadata, SupportLibrary,
};
pub use viability::{Viability, ViabilityResult, ViabilityScorer};

/// Run the front half of the pipeline: classify layers, form clusters,
/// compute metrics, evaluate rules, and explain each cluster.
///
/// The producer contract guarantees referential closure; violations are
/// reported once here and then ignored (the affected references simply
/// never resolve).
pub fn analyze_graph(
    graph: &mut DependencyGraph,
    config: &AnalysisConfig,
) -> MicroserviceCandidates {
    let violations = graph.closure_violations();
    if !violations.is_empty() {
        warn!(
            count = violations.len(),
            first = %violations[0],
            "dependency graph violates the producer contract; degrading"
        );
    }

    layers::classify_layers(graph, &config.layers);
    info!(components = graph.components.len(), "layers classified");

    let mut clusters = clustering::create_clusters(graph, &config.clustering);
    info!(clusters = clusters.len(), "initial clusters formed");

    cluster_metrics::annotate_clusters(&mut clusters, graph);

    let rule_set = rules::standard_rules();
    for cluster in &mut clusters {
        rules::apply_rules(cluster, &rule_set);
    }

    let explanations = clusters
        .iter()
        .map(|cluster| rules::explain_cluster(cluster, &rule_set))
        .collect();

    MicroserviceCandidates {
        candidates: clusters,
        explanations,
    }
}

/// Stamp decomposition metrics into the graph meta before the graph
/// artifact is written.
pub fn stamp_decomposition_accuracy(
    graph: &mut DependencyGraph,
    candidates: &MicroserviceCandidates,
    architecture: &ConsolidatedArchitecture,
) {
    let mut metrics: BTreeMap<String, serde_json::Value> = BTreeMap::new();
    metrics.insert(
        "cluster_count".to_string(),
        serde_json::Value::from(candidates.candidates.len()),
    );
    metrics.insert(
        "proposal_count".to_string(),
        serde_json::Value::from(architecture.proposals.len()),
    );
    metrics.insert(
        "support_library_count".to_string(),
        serde_json::Value::from(architecture.support_libraries.len()),
    );

    let scores: Vec<f64> = candidates.candidates.iter().map(|c| c.final_score).collect();
    if !scores.is_empty() {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        metrics.insert("mean_cluster_score".to_string(), serde_json::Value::from(mean));
    }

    graph.meta.decomposition_accuracy = metrics;
}
