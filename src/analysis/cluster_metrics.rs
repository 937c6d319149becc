//! Per-cluster structural metrics.
//!
//! Cohesion and coupling partition the same denominator (total outgoing
//! edge weight of the cluster), so `cohesion + coupling <= 1` whenever a
//! cluster has outgoing edges. Singletons get zero cohesion.

use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};

use crate::core::{Cluster, ClusterMetrics, Component, DependencyGraph};

/// Metrics phase: annotate every cluster in place.
///
/// Clusters are independent reads over the immutable graph, so they compute
/// in parallel; assignment order keeps the cluster list deterministic.
pub fn annotate_clusters(clusters: &mut [Cluster], graph: &DependencyGraph) {
    let index = graph.component_index();
    let computed: Vec<ClusterMetrics> = clusters
        .par_iter()
        .map(|cluster| calculate_metrics(cluster, graph, &index))
        .collect();

    for (cluster, metrics) in clusters.iter_mut().zip(computed) {
        cluster.metrics = metrics;
    }
}

/// Compute the metrics for one cluster over the full graph.
pub fn calculate_metrics(
    cluster: &Cluster,
    graph: &DependencyGraph,
    index: &std::collections::HashMap<&str, &Component>,
) -> ClusterMetrics {
    let members: HashSet<&str> = cluster.members.iter().map(String::as_str).collect();

    let mut internal_weight = 0u64;
    let mut outgoing_weight = 0u64;
    for edge in &graph.edges {
        if members.contains(edge.from.as_str()) {
            outgoing_weight += edge.weight as u64;
            if members.contains(edge.to.as_str()) {
                internal_weight += edge.weight as u64;
            }
        }
    }

    let cohesion = if members.len() <= 1 || outgoing_weight == 0 {
        0.0
    } else {
        internal_weight as f64 / outgoing_weight as f64
    };
    let coupling = if outgoing_weight == 0 {
        0.0
    } else {
        (outgoing_weight - internal_weight) as f64 / outgoing_weight as f64
    };

    let resolved: Vec<&Component> = cluster
        .members
        .iter()
        .filter_map(|m| index.get(m.as_str()).copied())
        .collect();

    ClusterMetrics {
        cohesion,
        coupling,
        tables_shared: shared_tables(&resolved),
        sensitive: resolved.iter().any(|c| c.sensitive_data),
        loc: resolved.iter().map(|c| c.loc as u64).sum(),
    }
}

/// Tables used by at least two members, sorted.
fn shared_tables(components: &[&Component]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for component in components {
        for table in &component.tables_used {
            *counts.entry(table.as_str()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|(table, _)| table.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Edge, EdgeKind};

    fn cluster_of(id: u32, members: &[&str]) -> Cluster {
        let mut cluster = Cluster::new(id);
        for member in members {
            cluster.add_member(*member);
        }
        cluster
    }

    fn fixture() -> DependencyGraph {
        let mut a = Component::new("x.A");
        a.loc = 100;
        let mut b = Component::new("x.B");
        b.loc = 50;
        b.sensitive_data = true;
        let c = Component::new("y.C");

        a.tables_used.insert("orders".into());
        b.tables_used.insert("orders".into());
        b.tables_used.insert("audit".into());

        DependencyGraph::new(
            vec![a, b, c],
            vec![
                Edge::new("x.A", "x.B", 3, EdgeKind::Call),
                Edge::new("x.A", "y.C", 1, EdgeKind::Call),
            ],
        )
    }

    #[test]
    fn cohesion_and_coupling_partition_outgoing_weight() {
        let graph = fixture();
        let index = graph.component_index();
        let cluster = cluster_of(0, &["x.A", "x.B"]);
        let metrics = calculate_metrics(&cluster, &graph, &index);

        assert!((metrics.cohesion - 0.75).abs() < 1e-9);
        assert!((metrics.coupling - 0.25).abs() < 1e-9);
        assert!((metrics.cohesion + metrics.coupling - 1.0).abs() < 1e-9);
    }

    #[test]
    fn singleton_cluster_has_zero_cohesion() {
        let graph = fixture();
        let index = graph.component_index();
        let cluster = cluster_of(0, &["x.A"]);
        let metrics = calculate_metrics(&cluster, &graph, &index);

        assert_eq!(metrics.cohesion, 0.0);
        assert_eq!(metrics.coupling, 1.0);
    }

    #[test]
    fn cluster_without_outgoing_edges_defaults_to_zero() {
        let graph = fixture();
        let index = graph.component_index();
        let cluster = cluster_of(0, &["y.C"]);
        let metrics = calculate_metrics(&cluster, &graph, &index);

        assert_eq!(metrics.cohesion, 0.0);
        assert_eq!(metrics.coupling, 0.0);
    }

    #[test]
    fn shared_tables_require_two_members() {
        let graph = fixture();
        let index = graph.component_index();
        let cluster = cluster_of(0, &["x.A", "x.B"]);
        let metrics = calculate_metrics(&cluster, &graph, &index);

        assert_eq!(metrics.tables_shared, vec!["orders".to_string()]);
    }

    #[test]
    fn sensitivity_and_loc_aggregate_over_members() {
        let graph = fixture();
        let index = graph.component_index();
        let cluster = cluster_of(0, &["x.A", "x.B"]);
        let metrics = calculate_metrics(&cluster, &graph, &index);

        assert!(metrics.sensitive);
        assert_eq!(metrics.loc, 150);
    }

    #[test]
    fn annotate_clusters_fills_every_cluster() {
        let graph = fixture();
        let mut clusters = vec![cluster_of(0, &["x.A", "x.B"]), cluster_of(1, &["y.C"])];
        annotate_clusters(&mut clusters, &graph);
        assert!((clusters[0].metrics.cohesion - 0.75).abs() < 1e-9);
    }
}
