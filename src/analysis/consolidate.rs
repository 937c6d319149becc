//! Greedy cluster consolidation.
//!
//! Two passes over a disjoint-set of cluster ids. The pre-pass merges
//! clusters whose generated names collide (same-domain rule); the main pass
//! walks evidence edges in descending score order and unions endpoints that
//! clear every guardrail: support/business separation, the size bound, and
//! strong-candidate protection. Consolidation is single-pass per pipeline
//! run; no rollback is ever needed.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::analysis::intercluster::{InterClusterGraph, PairSignals};
use crate::analysis::naming;
use crate::config::AnalysisConfig;
use crate::core::{simple_name, Cluster};

/// Call density below which two strong candidates refuse to merge.
const STRONG_PROTECT_CALL_DENSITY: f64 = 0.15;
/// Table Jaccard below which two strong candidates refuse to merge.
const STRONG_PROTECT_TABLE_JACCARD: f64 = 0.2;

/// Placeholder names the collision pre-pass ignores.
const GENERIC_NAMES: [&str; 4] = [
    naming::GENERIC_BUSINESS_NAME,
    naming::UNKNOWN_COMPONENT_NAME,
    naming::GENERIC_INFRASTRUCTURE_NAME,
    "Componente de Configuración",
];

/// Disjoint sets of cluster ids. Roots map to their member sets; an
/// absorbed root keeps an empty entry so `find_root` stays cheap to reason
/// about, and empty sets are dropped from the final output.
#[derive(Debug, Clone)]
pub struct DisjointGroups {
    groups: BTreeMap<u32, BTreeSet<u32>>,
}

impl DisjointGroups {
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        let groups = ids
            .into_iter()
            .map(|id| (id, BTreeSet::from([id])))
            .collect();
        DisjointGroups { groups }
    }

    /// Canonical group id for a cluster.
    pub fn find_root(&self, id: u32) -> u32 {
        self.groups
            .iter()
            .find(|(_, members)| members.contains(&id))
            .map(|(root, _)| *root)
            .unwrap_or(id)
    }

    /// Unite two root groups; the absorbed entry is cleared.
    pub fn merge(&mut self, root_a: u32, root_b: u32) {
        let absorbed = self.groups.insert(root_b, BTreeSet::new()).unwrap_or_default();
        if let Some(group) = self.groups.get_mut(&root_a) {
            group.extend(absorbed);
        }
    }

    pub fn members(&self, root: u32) -> Option<&BTreeSet<u32>> {
        self.groups.get(&root)
    }

    /// Non-empty member sets, ordered by root id.
    pub fn into_groups(self) -> Vec<BTreeSet<u32>> {
        self.groups
            .into_values()
            .filter(|group| !group.is_empty())
            .collect()
    }
}

/// Consolidation phase over annotated clusters and their affinity graph.
pub struct ClusterConsolidator<'a> {
    clusters: &'a [Cluster],
    graph: &'a InterClusterGraph,
    config: &'a AnalysisConfig,
    groups: DisjointGroups,
}

impl<'a> ClusterConsolidator<'a> {
    pub fn new(
        clusters: &'a [Cluster],
        graph: &'a InterClusterGraph,
        config: &'a AnalysisConfig,
    ) -> Self {
        ClusterConsolidator {
            clusters,
            graph,
            config,
            groups: DisjointGroups::new(clusters.iter().map(|c| c.cluster_id)),
        }
    }

    /// Run both passes and return the disjoint cluster-id groups.
    pub fn consolidate(mut self) -> Vec<BTreeSet<u32>> {
        self.merge_name_collisions();

        for ((a, b), signals) in self.graph.sorted_edges() {
            if !signals.has_strong_evidence(&self.config.consolidation) {
                continue;
            }
            let root_a = self.groups.find_root(a);
            let root_b = self.groups.find_root(b);
            if root_a != root_b && self.can_merge(root_a, root_b, signals) {
                debug!(a, b, score = signals.evidence_score, "merging clusters");
                self.groups.merge(root_a, root_b);
            }
        }

        self.groups.into_groups()
    }

    /// Pre-pass: clusters that would already carry the same non-generic
    /// name belong together when the same-domain rule allows it.
    fn merge_name_collisions(&mut self) {
        let mut by_name: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for cluster in self.clusters {
            let name = naming::generate_name(&[cluster.cluster_id], self.clusters, self.config);
            if !GENERIC_NAMES.contains(&name.as_str()) {
                by_name.entry(name).or_default().push(cluster.cluster_id);
            }
        }

        for (name, ids) in by_name {
            if ids.len() < 2 {
                continue;
            }
            let mut first_root = self.groups.find_root(ids[0]);
            for &next in &ids[1..] {
                let next_root = self.groups.find_root(next);
                if first_root != next_root && self.can_merge_same_domain(first_root, next_root) {
                    debug!(%name, first_root, next_root, "name-collision merge");
                    self.groups.merge(first_root, next_root);
                    first_root = self.groups.find_root(first_root);
                }
            }
        }
    }

    fn can_merge(&self, root_a: u32, root_b: u32, signals: &PairSignals) -> bool {
        if self.is_support(root_a) != self.is_support(root_b) {
            return false;
        }

        let combined = self.group_size(root_a) + self.group_size(root_b);
        if combined > self.config.consolidation.max_size_without_high_similarity
            && signals.token_similarity < self.config.consolidation.high_token_similarity
        {
            return false;
        }

        if self.group_has_strong_candidate(root_a)
            && self.group_has_strong_candidate(root_b)
            && signals.call_density < STRONG_PROTECT_CALL_DENSITY
            && signals.table_jaccard < STRONG_PROTECT_TABLE_JACCARD
        {
            return false;
        }

        true
    }

    fn can_merge_same_domain(&self, root_a: u32, root_b: u32) -> bool {
        if self.is_support(root_a) != self.is_support(root_b) {
            return false;
        }
        if self.has_significant_infrastructure(root_a) != self.has_significant_infrastructure(root_b)
        {
            return false;
        }
        self.group_size(root_a) + self.group_size(root_b)
            <= self.config.consolidation.max_same_domain_size
    }

    fn cluster(&self, id: u32) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.cluster_id == id)
    }

    /// Support cluster: infrastructure-named members at or above the
    /// support ratio.
    fn is_support(&self, cluster_id: u32) -> bool {
        let Some(cluster) = self.cluster(cluster_id) else {
            return false;
        };
        if cluster.is_empty() {
            return false;
        }
        let infra = cluster
            .members
            .iter()
            .filter(|m| self.is_infrastructure_member(m))
            .count();
        infra as f64 / cluster.len() as f64 >= self.config.consolidation.support_ratio
    }

    /// Looser bar used by the same-domain rule, evaluated over the whole
    /// group rather than a single cluster.
    fn has_significant_infrastructure(&self, root: u32) -> bool {
        let Some(group) = self.groups.members(root) else {
            return false;
        };
        let mut total = 0usize;
        let mut infra = 0usize;
        for &id in group {
            if let Some(cluster) = self.cluster(id) {
                total += cluster.len();
                infra += cluster
                    .members
                    .iter()
                    .filter(|m| self.is_infrastructure_member(m))
                    .count();
            }
        }
        total > 0 && infra as f64 / total as f64 >= self.config.consolidation.significant_infra_ratio
    }

    fn is_infrastructure_member(&self, member: &str) -> bool {
        let simple = simple_name(member).to_lowercase();
        self.config
            .consolidation
            .support_keywords
            .iter()
            .any(|keyword| simple.contains(keyword.as_str()))
    }

    fn group_size(&self, root: u32) -> usize {
        self.groups
            .members(root)
            .map(|group| {
                group
                    .iter()
                    .filter_map(|id| self.cluster(*id))
                    .map(Cluster::len)
                    .sum()
            })
            .unwrap_or(0)
    }

    fn group_has_strong_candidate(&self, root: u32) -> bool {
        let viability = &self.config.viability;
        self.groups
            .members(root)
            .map(|group| {
                group.iter().filter_map(|id| self.cluster(*id)).any(|c| {
                    c.metrics.cohesion >= viability.strong_cohesion
                        && c.metrics.coupling < viability.strong_coupling_max
                        && c.len() >= viability.strong_min_size
                })
            })
            .unwrap_or(false)
    }
}
