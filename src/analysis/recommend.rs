//! Recommendation engine: the orchestration tail of the pipeline.
//!
//! Takes the evaluated candidate clusters, runs consolidation over the
//! affinity graph, separates support-library groups from business-service
//! groups, and assembles the architecture artifact: proposals with names,
//! viability, consolidated metrics, and recommended actions, plus
//! project-level metadata and a human-readable summary.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::info;

use crate::analysis::consolidate::ClusterConsolidator;
use crate::analysis::intercluster::InterClusterGraph;
use crate::analysis::naming;
use crate::analysis::viability::{Viability, ViabilityScorer};
use crate::config::AnalysisConfig;
use crate::core::{package_path, simple_name, Cluster, Component, MicroserviceCandidates};

/// Value reported as `data_jaccard` whenever a group shares any table.
///
/// Deliberately a step function rather than a true Jaccard index; consumers
/// depend on the 0.8/0.0 encoding.
const DATA_JACCARD_SHARED: f64 = 0.8;

/// Consolidated metrics of one proposal, computed over non-infrastructure
/// members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedMetrics {
    pub size: usize,
    pub cohesion_avg: f64,
    pub external_coupling: f64,
    pub internal_edge_density: f64,
    pub data_jaccard: f64,
    pub tables: Vec<String>,
    pub sensitive: bool,
}

/// Shape indicators for one consolidated group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSignals {
    pub cluster_count: usize,
    pub total_components: usize,
    pub avg_cluster_size: f64,
}

/// One candidate microservice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroserviceProposal {
    pub id: u32,
    pub name: String,
    pub viability: Viability,
    /// Constituent cluster ids.
    pub clusters: Vec<u32>,
    /// Member ids, infrastructure filtered out, sorted.
    pub components: Vec<String>,
    pub metrics: ConsolidatedMetrics,
    pub signals: GroupSignals,
    pub rationale: Vec<String>,
    pub recommended_actions: Vec<String>,
}

/// A consolidated group dominated by infrastructure components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportLibrary {
    pub id: u32,
    pub name: String,
    pub clusters: Vec<u32>,
    pub components: Vec<String>,
}

/// Aggregated dependency picture of one package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDependencyInfo {
    pub components_count: usize,
    pub total_dependencies_out: u32,
    pub depends_on_packages: Vec<String>,
}

/// Project-level metadata attached to the architecture artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// `group:artifact` → full coordinate.
    pub external_dependencies: BTreeMap<String, String>,
    pub package_dependencies: BTreeMap<String, PackageDependencyInfo>,
    pub total_components: usize,
    pub total_loc: u64,
    pub components_with_secrets: usize,
    /// Dotted prefix covering the most components.
    pub shared_domain: String,
}

/// The architecture artifact: everything the serializer emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedArchitecture {
    pub project_metadata: ProjectMetadata,
    pub proposals: Vec<MicroserviceProposal>,
    pub support_libraries: Vec<SupportLibrary>,
    pub summary: String,
}

/// Run consolidation and assemble the architecture artifact.
pub fn build_architecture(
    candidates: &MicroserviceCandidates,
    components: &[Component],
    project_dependencies: &BTreeMap<String, String>,
    config: &AnalysisConfig,
) -> ConsolidatedArchitecture {
    let clusters = &candidates.candidates;
    let index: std::collections::HashMap<&str, &Component> =
        components.iter().map(|c| (c.id.as_str(), c)).collect();

    let graph = InterClusterGraph::build(clusters, &index, config);
    let groups = ClusterConsolidator::new(clusters, &graph, config).consolidate();
    info!(
        clusters = clusters.len(),
        groups = groups.len(),
        "consolidation finished"
    );

    let scorer = ViabilityScorer::new(clusters, components, &config.viability);

    let mut proposals = Vec::new();
    let mut support_libraries = Vec::new();
    let mut filtered_infra: BTreeSet<String> = BTreeSet::new();
    let mut next_id = 0u32;

    for group in &groups {
        if group.is_empty() {
            continue;
        }
        // Groups with no members at all never reach scoring.
        let member_total: usize = resolve(group, clusters).iter().map(|c| c.len()).sum();
        if member_total == 0 {
            continue;
        }
        if is_support_group(group, clusters, config) {
            support_libraries.push(support_library(next_id, group, clusters, config));
            next_id += 1;
        } else {
            let proposal = build_proposal(next_id, group, clusters, &index, &scorer, config);
            next_id += 1;

            for cluster in resolve(group, clusters) {
                for member in &cluster.members {
                    if is_infrastructure_component(member, config) {
                        filtered_infra.insert(member.clone());
                    }
                }
            }
            proposals.push(proposal);
        }
    }

    if !filtered_infra.is_empty() {
        support_libraries.push(SupportLibrary {
            id: next_id,
            name: "Infraestructura y Configuración Filtrada".to_string(),
            clusters: Vec::new(),
            components: filtered_infra.into_iter().collect(),
        });
    }

    let project_metadata = project_metadata(components, project_dependencies);
    let summary = consolidated_summary(&proposals, &support_libraries, config);

    ConsolidatedArchitecture {
        project_metadata,
        proposals,
        support_libraries,
        summary,
    }
}

fn resolve<'a>(group: &BTreeSet<u32>, clusters: &'a [Cluster]) -> Vec<&'a Cluster> {
    group
        .iter()
        .filter_map(|id| clusters.iter().find(|c| c.cluster_id == *id))
        .collect()
}

/// Strict support classification: 80% or more of the group's members are
/// infrastructure-named.
fn is_support_group(group: &BTreeSet<u32>, clusters: &[Cluster], config: &AnalysisConfig) -> bool {
    let resolved = resolve(group, clusters);
    let total: usize = resolved.iter().map(|c| c.len()).sum();
    if total == 0 {
        return false;
    }
    let infra = resolved
        .iter()
        .flat_map(|c| c.members.iter())
        .filter(|m| is_infrastructure_component(m, config))
        .count();
    infra as f64 / total as f64 >= config.consolidation.support_ratio
}

/// Infrastructure check on the simple class name only; package names like
/// `application` in hexagonal layouts must not trip it.
fn is_infrastructure_component(id: &str, config: &AnalysisConfig) -> bool {
    let simple = simple_name(id).to_lowercase();
    config
        .consolidation
        .support_keywords
        .iter()
        .any(|keyword| simple.contains(keyword.as_str()))
}

fn build_proposal(
    id: u32,
    group: &BTreeSet<u32>,
    clusters: &[Cluster],
    index: &std::collections::HashMap<&str, &Component>,
    scorer: &ViabilityScorer<'_>,
    config: &AnalysisConfig,
) -> MicroserviceProposal {
    let cluster_ids: Vec<u32> = group.iter().copied().collect();
    let name = naming::generate_name(&cluster_ids, clusters, config);
    let scored = scorer.calculate(group);
    let resolved = resolve(group, clusters);

    let mut component_names: BTreeSet<String> = BTreeSet::new();
    for cluster in &resolved {
        for member in &cluster.members {
            if !is_infrastructure_component(member, config) {
                component_names.insert(member.clone());
            }
        }
    }

    let metrics = consolidated_metrics(&resolved, index, config);
    let signals = group_signals(&resolved);
    let recommended_actions = recommended_actions(scored.viability, &metrics);

    MicroserviceProposal {
        id,
        name,
        viability: scored.viability,
        clusters: cluster_ids,
        components: component_names.into_iter().collect(),
        metrics,
        signals,
        rationale: scored.rationale,
        recommended_actions,
    }
}

fn support_library(
    id: u32,
    group: &BTreeSet<u32>,
    clusters: &[Cluster],
    config: &AnalysisConfig,
) -> SupportLibrary {
    let cluster_ids: Vec<u32> = group.iter().copied().collect();
    let name = naming::generate_name(&cluster_ids, clusters, config);

    let components: BTreeSet<String> = resolve(group, clusters)
        .iter()
        .flat_map(|c| c.members.iter().cloned())
        .collect();

    SupportLibrary {
        id,
        name,
        clusters: cluster_ids,
        components: components.into_iter().collect(),
    }
}

fn consolidated_metrics(
    resolved: &[&Cluster],
    index: &std::collections::HashMap<&str, &Component>,
    config: &AnalysisConfig,
) -> ConsolidatedMetrics {
    let members: HashSet<&str> = resolved
        .iter()
        .flat_map(|c| c.members.iter())
        .map(String::as_str)
        .filter(|m| !is_infrastructure_component(m, config))
        .collect();
    let size = members.len();

    // Per-member cohesion is the best cohesion among its clusters.
    let mut member_cohesion: BTreeMap<&str, f64> = BTreeMap::new();
    for cluster in resolved {
        for member in &cluster.members {
            if members.contains(member.as_str()) {
                let entry = member_cohesion.entry(member.as_str()).or_insert(0.0);
                *entry = entry.max(cluster.metrics.cohesion);
            }
        }
    }
    let cohesion_avg = if member_cohesion.is_empty() {
        0.0
    } else {
        member_cohesion.values().sum::<f64>() / member_cohesion.len() as f64
    };

    let mut internal = 0usize;
    let mut external = 0usize;
    for member in &members {
        if let Some(component) = index.get(*member) {
            for callee in &component.calls_out {
                if members.contains(callee.as_str()) {
                    internal += 1;
                } else {
                    external += 1;
                }
            }
        }
    }
    let total_calls = internal + external;
    let external_coupling = if total_calls == 0 {
        0.0
    } else {
        external as f64 / total_calls as f64
    };

    let possible = size * size.saturating_sub(1);
    let internal_edge_density = if possible == 0 {
        0.0
    } else {
        internal as f64 / possible as f64
    };

    let tables: BTreeSet<String> = resolved
        .iter()
        .flat_map(|c| c.metrics.tables_shared.iter().cloned())
        .collect();
    let data_jaccard = if tables.is_empty() {
        0.0
    } else {
        DATA_JACCARD_SHARED
    };

    ConsolidatedMetrics {
        size,
        cohesion_avg,
        external_coupling,
        internal_edge_density,
        data_jaccard,
        sensitive: resolved.iter().any(|c| c.metrics.sensitive),
        tables: tables.into_iter().collect(),
    }
}

fn group_signals(resolved: &[&Cluster]) -> GroupSignals {
    let total: usize = resolved.iter().map(|c| c.len()).sum();
    let count = resolved.len();
    GroupSignals {
        cluster_count: count,
        total_components: total,
        avg_cluster_size: if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        },
    }
}

fn recommended_actions(viability: Viability, metrics: &ConsolidatedMetrics) -> Vec<String> {
    let mut actions = Vec::new();
    match viability {
        Viability::Alta => {
            actions.push("✅ Diseñar como microservicio independiente".to_string());
            actions.push("✅ Definir API pública con contratos claros (OpenAPI/gRPC)".to_string());
            if !metrics.tables.is_empty() {
                actions.push(format!(
                    "✅ Asignar base de datos exclusiva con ownership de: {}",
                    metrics.tables.join(", ")
                ));
            }
            actions.push(
                "✅ Implementar patrones de resiliencia (circuit breaker, retry, timeout)"
                    .to_string(),
            );
            if metrics.sensitive {
                actions.push(
                    "⚠️ Implementar encriptación, auditoría y controles de acceso por datos sensibles"
                        .to_string(),
                );
            }
        }
        Viability::Media => {
            actions.push("🔧 Refactorizar para mejorar cohesión y reducir acoplamiento".to_string());
            actions.push(
                "🔧 Aplicar principios SOLID (SRP, DIP) para separación de responsabilidades"
                    .to_string(),
            );
            actions.push(
                "🔧 Considerar eventos asíncronos para reducir acoplamiento síncrono".to_string(),
            );
            actions.push("📋 Re-evaluar después de refactorización".to_string());
        }
        Viability::Baja => {
            actions.push("❌ NO implementar como microservicio en estado actual".to_string());
            actions.push("🔧 Requiere refactorización profunda o fusión con otros dominios".to_string());
            actions.push("💡 Evaluar si debe ser librería compartida o módulo interno".to_string());
        }
    }
    actions
}

fn project_metadata(
    components: &[Component],
    project_dependencies: &BTreeMap<String, String>,
) -> ProjectMetadata {
    let total_loc: u64 = components.iter().map(|c| c.loc as u64).sum();
    let components_with_secrets = components
        .iter()
        .filter(|c| !c.secrets_references.is_empty())
        .count();

    // Caller-supplied coordinates first, then every component's own.
    let mut external_dependencies = project_dependencies.clone();
    for component in components {
        for coordinate in &component.external_dependencies {
            let mut parts = coordinate.splitn(3, ':');
            if let (Some(group), Some(artifact)) = (parts.next(), parts.next()) {
                external_dependencies.insert(format!("{group}:{artifact}"), coordinate.clone());
            }
        }
    }

    ProjectMetadata {
        external_dependencies,
        package_dependencies: aggregate_package_dependencies(components),
        total_components: components.len(),
        total_loc,
        components_with_secrets,
        shared_domain: shared_domain(components),
    }
}

fn aggregate_package_dependencies(
    components: &[Component],
) -> BTreeMap<String, PackageDependencyInfo> {
    let mut component_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut deps_out: BTreeMap<String, u32> = BTreeMap::new();
    let mut depends_on: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for component in components {
        let package = component.package_path();
        if package.is_empty() {
            continue;
        }
        *component_counts.entry(package.to_string()).or_default() += 1;

        for group in &component.package_dependencies {
            depends_on
                .entry(package.to_string())
                .or_default()
                .insert(group.package.clone());
            *deps_out.entry(package.to_string()).or_default() += group.count;
        }
    }

    component_counts
        .into_iter()
        .map(|(package, components_count)| {
            let info = PackageDependencyInfo {
                components_count,
                total_dependencies_out: deps_out.get(&package).copied().unwrap_or(0),
                depends_on_packages: depends_on
                    .get(&package)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default(),
            };
            (package, info)
        })
        .collect()
}

/// Dotted prefix (2–4 segments) covering the most components; count ties
/// break toward the lexicographically smaller prefix.
fn shared_domain(components: &[Component]) -> String {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for component in components {
        let package = package_path(&component.id);
        if package.is_empty() {
            continue;
        }
        let parts: Vec<&str> = package.split('.').collect();
        for take in 2..=parts.len().min(4) {
            let prefix = parts[..take].join(".");
            *counts.entry(prefix).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(prefix_a, count_a), (prefix_b, count_b)| {
            count_a.cmp(count_b).then(prefix_b.cmp(prefix_a))
        })
        .map(|(prefix, _)| prefix)
        .unwrap_or_else(|| "unknown".to_string())
}

fn consolidated_summary(
    proposals: &[MicroserviceProposal],
    support_libraries: &[SupportLibrary],
    config: &AnalysisConfig,
) -> String {
    let mut summary = String::new();
    summary.push_str("ANÁLISIS DE ARQUITECTURA - COMPONENTES AGRUPADOS\n");
    summary.push_str("═════════════════════════════════════════════════\n\n");

    if !proposals.is_empty() {
        summary.push_str("📋 Módulos Identificados por Cohesión/Acoplamiento:\n");
        summary.push_str("───────────────────────────────────────────────────\n");
        for proposal in proposals {
            let cluster_list = proposal
                .clusters
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            summary.push_str(&format!(
                "• {} → Clusters {} ({} componentes)\n",
                proposal.name,
                cluster_list,
                proposal.components.len()
            ));
        }
        summary.push('\n');
    }

    if !support_libraries.is_empty() {
        summary.push_str("📚 Librerías de Soporte:\n");
        summary.push_str("────────────────────────\n");
        for library in support_libraries {
            let cluster_list = library
                .clusters
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            summary.push_str(&format!("• {} → Clusters {}\n", library.name, cluster_list));
        }
        summary.push('\n');
    }

    let high = proposals
        .iter()
        .filter(|p| p.viability == Viability::Alta)
        .count();
    let medium = proposals
        .iter()
        .filter(|p| p.viability == Viability::Media)
        .count();
    let low = proposals
        .iter()
        .filter(|p| p.viability == Viability::Baja)
        .count();

    summary.push_str("📌 Análisis de Cohesión:\n");
    summary.push_str("────────────────────────\n");
    summary.push_str(&format!(
        "✅ Alta cohesión: {high} módulo(s) - Componentes fuertemente relacionados\n"
    ));
    summary.push_str(&format!(
        "⚠️ Media cohesión: {medium} módulo(s) - Cohesión moderada\n"
    ));
    summary.push_str(&format!(
        "❌ Baja cohesión: {low} módulo(s) - Componentes débilmente relacionados\n"
    ));

    let nano = proposals
        .iter()
        .filter(|p| p.metrics.size <= config.viability.nano_max_size)
        .count();
    if nano > 0 {
        summary.push_str(&format!(
            "\n⚠️ Nano-servicios: {nano} propuesta(s) con ≤{} componentes - revisar fusión con dominios vecinos\n",
            config.viability.nano_max_size
        ));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{cluster_metrics, clustering, rules};
    use crate::core::{DependencyGraph, Edge, EdgeKind};

    fn component(id: &str, loc: u32) -> Component {
        let mut comp = Component::new(id);
        comp.loc = loc;
        comp
    }

    fn candidates_for(graph: &DependencyGraph, config: &AnalysisConfig) -> MicroserviceCandidates {
        let mut clusters = clustering::create_clusters(graph, &config.clustering);
        cluster_metrics::annotate_clusters(&mut clusters, graph);
        let rule_set = rules::standard_rules();
        for cluster in &mut clusters {
            rules::apply_rules(cluster, &rule_set);
        }
        MicroserviceCandidates {
            candidates: clusters,
            explanations: Vec::new(),
        }
    }

    fn fixture() -> DependencyGraph {
        let mut components = vec![
            component("com.shop.order.OrderService", 120),
            component("com.shop.order.OrderRepository", 80),
            component("com.shop.billing.InvoiceService", 90),
            component("com.shop.billing.InvoiceRepository", 60),
            component("com.shop.infra.SecurityConfig", 40),
        ];
        components[0].calls_out.insert("com.shop.order.OrderRepository".into());
        components[1].calls_in.insert("com.shop.order.OrderService".into());
        components[2]
            .calls_out
            .insert("com.shop.billing.InvoiceRepository".into());
        components[3]
            .calls_in
            .insert("com.shop.billing.InvoiceService".into());

        let edges = vec![
            Edge::new(
                "com.shop.order.OrderService",
                "com.shop.order.OrderRepository",
                3,
                EdgeKind::Call,
            ),
            Edge::new(
                "com.shop.billing.InvoiceService",
                "com.shop.billing.InvoiceRepository",
                2,
                EdgeKind::Call,
            ),
        ];
        DependencyGraph::new(components, edges)
    }

    #[test]
    fn proposals_exclude_infrastructure_members() {
        let config = AnalysisConfig::default();
        let graph = fixture();
        let candidates = candidates_for(&graph, &config);
        let architecture =
            build_architecture(&candidates, &graph.components, &BTreeMap::new(), &config);

        for proposal in &architecture.proposals {
            assert!(!proposal
                .components
                .iter()
                .any(|c| c.contains("SecurityConfig")));
        }
    }

    #[test]
    fn proposal_members_stay_within_their_clusters() {
        let config = AnalysisConfig::default();
        let graph = fixture();
        let candidates = candidates_for(&graph, &config);
        let architecture =
            build_architecture(&candidates, &graph.components, &BTreeMap::new(), &config);

        for proposal in &architecture.proposals {
            let cluster_members: BTreeSet<&str> = proposal
                .clusters
                .iter()
                .filter_map(|id| candidates.candidates.iter().find(|c| c.cluster_id == *id))
                .flat_map(|c| c.members.iter())
                .map(String::as_str)
                .collect();
            for member in &proposal.components {
                assert!(cluster_members.contains(member.as_str()));
            }
        }
    }

    #[test]
    fn metadata_counts_match_graph_totals() {
        let config = AnalysisConfig::default();
        let graph = fixture();
        let candidates = candidates_for(&graph, &config);
        let architecture =
            build_architecture(&candidates, &graph.components, &BTreeMap::new(), &config);

        let metadata = &architecture.project_metadata;
        assert_eq!(metadata.total_components, graph.components.len());
        assert_eq!(metadata.total_loc, graph.total_loc());
        assert_eq!(metadata.shared_domain, "com.shop");
    }

    #[test]
    fn component_coordinates_join_caller_map() {
        let config = AnalysisConfig::default();
        let mut graph = fixture();
        graph.components[0]
            .external_dependencies
            .insert("org.postgresql:postgresql:42.7.1".into());

        let mut caller = BTreeMap::new();
        caller.insert(
            "org.slf4j:slf4j-api".to_string(),
            "org.slf4j:slf4j-api:2.0.9".to_string(),
        );

        let candidates = candidates_for(&graph, &config);
        let architecture = build_architecture(&candidates, &graph.components, &caller, &config);

        let deps = &architecture.project_metadata.external_dependencies;
        assert_eq!(
            deps.get("org.postgresql:postgresql"),
            Some(&"org.postgresql:postgresql:42.7.1".to_string())
        );
        assert_eq!(
            deps.get("org.slf4j:slf4j-api"),
            Some(&"org.slf4j:slf4j-api:2.0.9".to_string())
        );
    }

    #[test]
    fn data_jaccard_is_the_step_function() {
        let metrics = ConsolidatedMetrics {
            size: 2,
            cohesion_avg: 0.5,
            external_coupling: 0.1,
            internal_edge_density: 0.2,
            data_jaccard: DATA_JACCARD_SHARED,
            tables: vec!["orders".into()],
            sensitive: false,
        };
        assert!((metrics.data_jaccard - 0.8).abs() < 1e-9);
    }

    #[test]
    fn sensitive_groups_get_the_audit_action() {
        let metrics = ConsolidatedMetrics {
            size: 5,
            cohesion_avg: 0.9,
            external_coupling: 0.1,
            internal_edge_density: 0.4,
            data_jaccard: 0.8,
            tables: vec!["patients".into()],
            sensitive: true,
        };
        let actions = recommended_actions(Viability::Alta, &metrics);
        assert!(actions.iter().any(|a| a.contains("auditoría")));
    }

    #[test]
    fn shared_domain_prefers_most_covered_prefix() {
        let components = vec![
            component("com.shop.order.OrderService", 0),
            component("com.shop.order.OrderRepository", 0),
            component("com.shop.billing.InvoiceService", 0),
        ];
        assert_eq!(shared_domain(&components), "com.shop");
    }

    #[test]
    fn summary_tallies_viability_tiers() {
        let config = AnalysisConfig::default();
        let graph = fixture();
        let candidates = candidates_for(&graph, &config);
        let architecture =
            build_architecture(&candidates, &graph.components, &BTreeMap::new(), &config);

        assert!(architecture.summary.contains("Análisis de Cohesión"));
        assert!(architecture.summary.contains("módulo(s)"));
    }
}
