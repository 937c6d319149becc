//! Inter-cluster affinity signals.
//!
//! For every unordered cluster pair, four signals in [0,1] combine into a
//! weighted evidence score: shared-table Jaccard, cross-call density,
//! domain-token similarity, and event links. Pairs below the noise floor
//! are dropped. Pair computation is embarrassingly parallel; the edge list
//! is post-sorted so the output is deterministic regardless of scheduling.

use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::analysis::tokens::extract_domain_tokens;
use crate::config::{AnalysisConfig, ConsolidationConfig, SignalWeights};
use crate::core::{simple_name, Cluster, Component};

/// Minimum evidence score for a pair to be kept as an edge.
pub const EVIDENCE_NOISE_FLOOR: f64 = 0.1;

/// The four affinity signals for one cluster pair plus their weighted
/// combination.
#[derive(Debug, Clone)]
pub struct PairSignals {
    pub table_jaccard: f64,
    pub call_density: f64,
    pub token_similarity: f64,
    /// Event names published on one side and consumed on the other.
    pub event_links: Vec<String>,
    pub evidence_score: f64,
}

impl PairSignals {
    /// Count of signals individually above their "strong" band.
    pub fn strong_signal_count(&self, config: &ConsolidationConfig) -> usize {
        let mut strong = 0;
        if self.table_jaccard >= config.strong_table_jaccard {
            strong += 1;
        }
        if self.call_density >= config.strong_call_density {
            strong += 1;
        }
        if self.token_similarity >= config.strong_token_similarity {
            strong += 1;
        }
        if !self.event_links.is_empty() {
            strong += 1;
        }
        strong
    }

    /// Merge-candidate test: evidence above threshold with enough strong
    /// signals behind it.
    pub fn has_strong_evidence(&self, config: &ConsolidationConfig) -> bool {
        self.evidence_score >= config.evidence_threshold
            && self.strong_signal_count(config) >= config.min_strong_signals
    }
}

/// Affinity graph over cluster pairs, keyed by `(min_id, max_id)`.
pub struct InterClusterGraph {
    edges: HashMap<(u32, u32), PairSignals>,
}

impl InterClusterGraph {
    /// Build the pair graph from annotated clusters.
    pub fn build(
        clusters: &[Cluster],
        components: &HashMap<&str, &Component>,
        config: &AnalysisConfig,
    ) -> Self {
        let mut pairs = Vec::new();
        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                pairs.push((i, j));
            }
        }

        let edges: HashMap<(u32, u32), PairSignals> = pairs
            .par_iter()
            .filter_map(|&(i, j)| {
                let a = &clusters[i];
                let b = &clusters[j];
                let signals = calculate_signals(a, b, components, config);
                (signals.evidence_score > EVIDENCE_NOISE_FLOOR).then(|| {
                    let key = (
                        a.cluster_id.min(b.cluster_id),
                        a.cluster_id.max(b.cluster_id),
                    );
                    (key, signals)
                })
            })
            .collect();

        InterClusterGraph { edges }
    }

    /// Per-pair lookup, symmetric in the arguments.
    pub fn edge(&self, a: u32, b: u32) -> Option<&PairSignals> {
        self.edges.get(&(a.min(b), a.max(b)))
    }

    /// All edges sorted descending by evidence score; equal scores order by
    /// ascending pair key so iteration is stable.
    pub fn sorted_edges(&self) -> Vec<((u32, u32), &PairSignals)> {
        let mut edges: Vec<((u32, u32), &PairSignals)> =
            self.edges.iter().map(|(k, v)| (*k, v)).collect();
        edges.sort_by(|(ka, sa), (kb, sb)| {
            sb.evidence_score
                .partial_cmp(&sa.evidence_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ka.cmp(kb))
        });
        edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Compute all four signals and the weighted evidence score for one pair.
pub fn calculate_signals(
    a: &Cluster,
    b: &Cluster,
    components: &HashMap<&str, &Component>,
    config: &AnalysisConfig,
) -> PairSignals {
    let table_jaccard = table_jaccard(a, b);
    let call_density = call_density(a, b, components);
    let token_similarity = token_similarity(a, b, config);
    let event_links = event_links(a, b);

    let weights: &SignalWeights = &config.signal_weights;
    let event_indicator = if event_links.is_empty() { 0.0 } else { 1.0 };
    let evidence_score = weights.table * table_jaccard
        + weights.call * call_density
        + weights.token * token_similarity
        + weights.event * event_indicator;

    PairSignals {
        table_jaccard,
        call_density,
        token_similarity,
        event_links,
        evidence_score,
    }
}

/// Jaccard index over the clusters' shared-table sets.
fn table_jaccard(a: &Cluster, b: &Cluster) -> f64 {
    let tables_a: BTreeSet<&str> = a.metrics.tables_shared.iter().map(String::as_str).collect();
    let tables_b: BTreeSet<&str> = b.metrics.tables_shared.iter().map(String::as_str).collect();

    if tables_a.is_empty() && tables_b.is_empty() {
        return 0.0;
    }
    let intersection = tables_a.intersection(&tables_b).count();
    let union = tables_a.union(&tables_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Cross-call volume relative to half the combined internal call volume,
/// capped at 1. Counts raw call adjacencies, not edge weights.
fn call_density(a: &Cluster, b: &Cluster, components: &HashMap<&str, &Component>) -> f64 {
    let cross = count_calls(&a.members, &b.members, components)
        + count_calls(&b.members, &a.members, components);
    if cross == 0 {
        return 0.0;
    }

    let internal =
        count_internal_calls(&a.members, components) + count_internal_calls(&b.members, components);
    if internal == 0 {
        return 0.0;
    }

    (cross as f64 / (internal as f64 * 0.5)).min(1.0)
}

fn count_calls(
    from: &[String],
    to: &[String],
    components: &HashMap<&str, &Component>,
) -> usize {
    let targets: HashSet<&str> = to.iter().map(String::as_str).collect();
    from.iter()
        .filter_map(|id| components.get(id.as_str()))
        .flat_map(|c| c.calls_out.iter())
        .filter(|callee| targets.contains(callee.as_str()))
        .count()
}

fn count_internal_calls(members: &[String], components: &HashMap<&str, &Component>) -> usize {
    count_calls(members, members, components)
}

/// Jaccard index over the clusters' domain-token sets.
fn token_similarity(a: &Cluster, b: &Cluster, config: &AnalysisConfig) -> f64 {
    let tokens_a = extract_domain_tokens(&a.members, &config.naming.exclude_tokens, 1);
    let tokens_b = extract_domain_tokens(&b.members, &config.naming.exclude_tokens, 1);

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Events published on one side and consumed on the other, both directions,
/// sorted for determinism.
fn event_links(a: &Cluster, b: &Cluster) -> Vec<String> {
    let mut links = BTreeSet::new();
    for name in published_events(&a.members).intersection(&consumed_events(&b.members)) {
        links.insert(name.clone());
    }
    for name in published_events(&b.members).intersection(&consumed_events(&a.members)) {
        links.insert(name.clone());
    }
    links.into_iter().collect()
}

fn published_events(members: &[String]) -> BTreeSet<String> {
    members
        .iter()
        .filter(|id| {
            let simple = simple_name(id).to_lowercase();
            simple.contains("publisher") || simple.contains("event")
        })
        .map(|id| simple_name(id).to_string())
        .collect()
}

fn consumed_events(members: &[String]) -> BTreeSet<String> {
    members
        .iter()
        .filter(|id| {
            let simple = simple_name(id).to_lowercase();
            simple.contains("listener") || simple.contains("consumer")
        })
        .map(|id| simple_name(id).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClusterMetrics;

    fn cluster_with_tables(id: u32, members: &[&str], tables: &[&str]) -> Cluster {
        let mut cluster = Cluster::new(id);
        for member in members {
            cluster.add_member(*member);
        }
        cluster.metrics = ClusterMetrics {
            tables_shared: tables.iter().map(|t| t.to_string()).collect(),
            ..ClusterMetrics::default()
        };
        cluster
    }

    fn component_calling(id: &str, callees: &[&str]) -> Component {
        let mut comp = Component::new(id);
        for callee in callees {
            comp.calls_out.insert(callee.to_string());
        }
        comp
    }

    fn index(components: &[Component]) -> HashMap<&str, &Component> {
        components.iter().map(|c| (c.id.as_str(), c)).collect()
    }

    #[test]
    fn table_jaccard_is_zero_when_both_empty() {
        let a = cluster_with_tables(0, &["x.A"], &[]);
        let b = cluster_with_tables(1, &["x.B"], &[]);
        assert_eq!(table_jaccard(&a, &b), 0.0);
    }

    #[test]
    fn table_jaccard_of_identical_sets_is_one() {
        let a = cluster_with_tables(0, &["x.A"], &["item"]);
        let b = cluster_with_tables(1, &["x.B"], &["item"]);
        assert_eq!(table_jaccard(&a, &b), 1.0);
    }

    #[test]
    fn call_density_counts_adjacencies_not_weights() {
        let components = vec![
            component_calling("x.ItemController", &["x.ItemService"]),
            component_calling("x.ItemService", &["x.ItemRepository"]),
            component_calling("x.ItemRepository", &[]),
            component_calling("x.ItemDto", &[]),
        ];
        let index = index(&components);

        let mut a = Cluster::new(0);
        a.add_member("x.ItemService");
        a.add_member("x.ItemRepository");
        let mut b = Cluster::new(1);
        b.add_member("x.ItemController");
        b.add_member("x.ItemDto");

        // cross = 1 (controller -> service); internal = 1 (service -> repo).
        let density = call_density(&a, &b, &index);
        assert!((density - 1.0).abs() < 1e-9, "1 / (1 * 0.5) capped at 1");
    }

    #[test]
    fn call_density_zero_without_cross_calls() {
        let components = vec![
            component_calling("x.A", &["x.B"]),
            component_calling("x.B", &[]),
            component_calling("y.C", &[]),
        ];
        let index = index(&components);
        let mut a = Cluster::new(0);
        a.add_member("x.A");
        a.add_member("x.B");
        let mut b = Cluster::new(1);
        b.add_member("y.C");

        assert_eq!(call_density(&a, &b, &index), 0.0);
    }

    #[test]
    fn event_links_are_symmetric_and_sorted() {
        let mut a = Cluster::new(0);
        a.add_member("x.OrderEventPublisher");
        let mut b = Cluster::new(1);
        b.add_member("y.OrderEventListener");

        // Publisher and listener names differ, so no link on names alone;
        // the link needs the same simple name on both sides.
        assert!(event_links(&a, &b).is_empty());

        // A link needs the same simple name on both sides, one qualifying as
        // published and the other as consumed.
        let mut c = Cluster::new(2);
        c.add_member("x.PaymentEventListener");
        let mut d = Cluster::new(3);
        d.add_member("y.PaymentEventListener");
        assert_eq!(event_links(&c, &d), vec!["PaymentEventListener".to_string()]);
    }

    #[test]
    fn evidence_score_stays_in_unit_interval() {
        let config = AnalysisConfig::default();
        let components = vec![
            component_calling("x.ItemService", &["x.ItemRepository"]),
            component_calling("x.ItemRepository", &[]),
            component_calling("y.ItemController", &["x.ItemService"]),
        ];
        let index = index(&components);

        let mut a = cluster_with_tables(0, &[], &["item"]);
        a.add_member("x.ItemService");
        a.add_member("x.ItemRepository");
        let mut b = cluster_with_tables(1, &[], &["item"]);
        b.add_member("y.ItemController");

        let signals = calculate_signals(&a, &b, &index, &config);
        assert!(signals.evidence_score >= 0.0 && signals.evidence_score <= 1.0);
    }

    #[test]
    fn noise_floor_drops_weak_pairs() {
        let config = AnalysisConfig::default();
        let components = vec![
            component_calling("x.OrderService", &[]),
            component_calling("y.UserService", &[]),
        ];
        let index = index(&components);

        let mut a = Cluster::new(0);
        a.add_member("x.OrderService");
        let mut b = Cluster::new(1);
        b.add_member("y.UserService");

        let graph = InterClusterGraph::build(&[a, b], &index, &config);
        assert!(graph.is_empty());
    }

    #[test]
    fn sorted_edges_order_by_score_then_pair() {
        let config = AnalysisConfig::default();
        let components = vec![
            component_calling("x.ItemService", &["x.ItemRepository"]),
            component_calling("x.ItemRepository", &[]),
            component_calling("y.ItemController", &["x.ItemService"]),
            component_calling("z.OrderService", &["z.OrderRepository"]),
            component_calling("z.OrderRepository", &[]),
        ];
        let index = index(&components);

        let mut c0 = cluster_with_tables(0, &[], &["item"]);
        c0.add_member("x.ItemService");
        c0.add_member("x.ItemRepository");
        let mut c1 = cluster_with_tables(1, &[], &["item"]);
        c1.add_member("y.ItemController");
        let mut c2 = Cluster::new(2);
        c2.add_member("z.OrderService");
        c2.add_member("z.OrderRepository");

        let graph = InterClusterGraph::build(&[c0, c1, c2], &index, &config);
        let edges = graph.sorted_edges();
        for pair in edges.windows(2) {
            assert!(pair[0].1.evidence_score >= pair[1].1.evidence_score);
        }
    }
}
