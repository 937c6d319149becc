//! Initial partitioning of components into candidate clusters.
//!
//! Strategy selection follows project shape. Single-domain projects (one
//! domain holding more than 75% of components, i.e. a layered monolith) go
//! straight to entity-based clustering. Multi-domain projects try
//! business-responsibility clustering first, falling back to domain-based
//! and finally entity-based clustering when the result mixes domains,
//! degenerates to one dominant cluster, or produces fewer than two clusters.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::info;

use crate::config::ClusteringConfig;
use crate::core::{package_path, simple_name, Cluster, Component, DependencyGraph};

/// Data-object suffixes that never seed a business function.
static DATA_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Entity|Model|Data|Dto|DTO|Event|Command|Query)$").unwrap());

/// Role-bearing suffixes, longest alternatives first so `ServiceImpl` wins
/// over `Service`. The optional `Repository` prefix strips Spring-style
/// `RepositoryOrder` naming.
static ROLE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:Repository)?(.*?)(?:ServiceImpl|Service|UseCase|Repository|Repo|Controller|Api|API|Operations?|Listener|Publisher|Adapter|Factory|Handler|Db)$",
    )
    .unwrap()
});

/// Suffixes that keep a component in domain/ports packages eligible for
/// function extraction.
static DOMAIN_ROLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(Service|UseCase|Repository|Repo|Db|Publisher|Factory|Handler)$").unwrap()
});

/// Suffixes exempting a singleton from the data-object merge.
static MERGEABLE_ROLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(Service|UseCase|Repository|Repo|Db|Publisher|Factory|Handler|Operations?|Listener|Adapter|Controller)$",
    )
    .unwrap()
});

static ENTITY_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(Entity|Model|Data)$").unwrap());

const INFRASTRUCTURE_NAME_MARKERS: [&str; 9] = [
    "Config",
    "Security",
    "Application",
    "Exception",
    "Error",
    "Jwt",
    "Swagger",
    "Filter",
    "ErrorHandler",
];

/// Create the initial cluster partition for a dependency graph.
pub fn create_clusters(graph: &DependencyGraph, config: &ClusteringConfig) -> Vec<Cluster> {
    let by_domain = group_by_domain(&graph.components);
    let total = graph.components.len();

    if is_single_domain_project(&by_domain, total, config.single_domain_ratio) {
        info!("single-domain project detected, using entity-based clustering");
        return entity_based_clusters(graph);
    }

    let clusters = business_responsibility_clusters(graph, &by_domain);

    let clusters = if has_cross_domain_mixing(&clusters, &graph.components)
        || clusters.len() < config.min_clusters
        || has_large_single_cluster(&clusters, total, config.max_cluster_ratio)
    {
        info!("business-responsibility clustering rejected, falling back to domain-based");
        domain_based_clusters(graph, &by_domain)
    } else {
        clusters
    };

    if clusters.len() < config.min_clusters {
        info!("domain-based clustering too coarse, falling back to entity-based");
        entity_based_clusters(graph)
    } else {
        clusters
    }
}

/// Domain a component belongs to: the pre-assigned one, or the package-path
/// inference.
pub fn effective_domain(component: &Component) -> String {
    component
        .domain
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| infer_domain(&component.id))
}

/// Infer the domain segment from a fully-qualified name, skipping
/// organizational prefixes, company names, and framework tokens.
pub fn infer_domain(id: &str) -> String {
    let parts: Vec<&str> = id.split('.').collect();
    if parts.len() <= 1 {
        return "core".to_string();
    }

    let mut index = 0;
    if matches!(parts[0], "com" | "org" | "net" | "io" | "edu" | "gov") {
        index = 1;
    }
    // The segment after the TLD is usually the company name.
    if parts.len() > index + 1 {
        index += 1;
    }
    while index < parts.len()
        && matches!(
            parts[index],
            "spring" | "boot" | "jakarta" | "javax" | "hibernate" | "jpa" | "monolith"
        )
    {
        index += 1;
    }

    if index < parts.len() {
        let candidate = parts[index].to_lowercase();
        let generic = matches!(
            candidate.as_str(),
            "main"
                | "app"
                | "application"
                | "common"
                | "config"
                | "configuration"
                | "dto"
                | "api"
                | "rest"
                | "web"
        );
        if !generic {
            return candidate;
        }
        index += 1;
        if index < parts.len() {
            let next = parts[index].to_lowercase();
            let technical = matches!(
                next.as_str(),
                "service"
                    | "services"
                    | "util"
                    | "utils"
                    | "helper"
                    | "helpers"
                    | "model"
                    | "models"
                    | "entity"
                    | "entities"
                    | "controller"
                    | "controllers"
                    | "repository"
                    | "repositories"
                    | "dao"
            );
            if !technical {
                return next;
            }
        }
    }

    "core".to_string()
}

fn group_by_domain<'a>(components: &'a [Component]) -> BTreeMap<String, Vec<&'a Component>> {
    let mut groups: BTreeMap<String, Vec<&Component>> = BTreeMap::new();
    for component in components {
        groups
            .entry(effective_domain(component))
            .or_default()
            .push(component);
    }
    groups
}

fn is_single_domain_project(
    by_domain: &BTreeMap<String, Vec<&Component>>,
    total: usize,
    ratio: f64,
) -> bool {
    let largest = by_domain.values().map(Vec::len).max().unwrap_or(0);
    largest as f64 > total as f64 * ratio
}

/// Business function token from a role-bearing simple name, lowercased.
/// Data objects and plain domain objects yield nothing.
pub fn extract_business_function(id: &str) -> Option<String> {
    let simple = simple_name(id);
    let package = package_path(id);

    if DATA_OBJECT_RE.is_match(simple) {
        return None;
    }
    if is_domain_or_ports_package(package) && !DOMAIN_ROLE_RE.is_match(simple) {
        return None;
    }

    ROLE_SUFFIX_RE
        .captures(simple)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .filter(|token| !token.is_empty())
}

fn is_domain_or_ports_package(package: &str) -> bool {
    const MARKERS: [&str; 3] = [".domain", ".primaryports", ".secondaryports"];
    MARKERS
        .iter()
        .any(|m| package.ends_with(m) || package.contains(&format!("{m}.")))
}

/// Shared infrastructure components are pooled apart from business domains.
fn is_shared_infrastructure(id: &str) -> bool {
    let simple = simple_name(id);
    INFRASTRUCTURE_NAME_MARKERS.iter().any(|m| simple.contains(m))
        || id.contains(".config.")
        || id.contains(".exception.")
}

fn business_responsibility_clusters(
    graph: &DependencyGraph,
    by_domain: &BTreeMap<String, Vec<&Component>>,
) -> Vec<Cluster> {
    // id → function token, ordered for deterministic best-match scans.
    let functions: BTreeMap<&str, String> = graph
        .components
        .iter()
        .filter_map(|c| extract_business_function(&c.id).map(|f| (c.id.as_str(), f)))
        .collect();

    fn new_cluster(next_id: &mut u32) -> Cluster {
        let cluster = Cluster::new(*next_id);
        *next_id += 1;
        cluster
    }

    let mut named: BTreeMap<String, Cluster> = BTreeMap::new();
    let mut assigned: HashSet<&str> = HashSet::new();
    let mut next_id = 0u32;

    for (domain, components) in by_domain {
        if domain == "core" {
            continue;
        }

        let domain_functions: BTreeSet<&str> = components
            .iter()
            .filter_map(|c| functions.get(c.id.as_str()).map(String::as_str))
            .collect();

        match domain_functions.len() {
            0 | 1 => {
                // One (or no) responsibility: the whole domain is one cluster.
                let key = match domain_functions.iter().next() {
                    Some(function) => format!("{domain}_{function}"),
                    None => domain.clone(),
                };
                let mut cluster = new_cluster(&mut next_id);
                for component in components {
                    cluster.add_member(&component.id);
                    assigned.insert(component.id.as_str());
                }
                if !cluster.is_empty() {
                    named.insert(key, cluster);
                }
            }
            _ => {
                for function in &domain_functions {
                    named
                        .entry(format!("{domain}_{function}"))
                        .or_insert_with(|| new_cluster(&mut next_id));
                }

                for component in components {
                    if let Some(function) = functions.get(component.id.as_str()) {
                        let key = format!("{domain}_{function}");
                        if let Some(cluster) = named.get_mut(&key) {
                            cluster.add_member(&component.id);
                            assigned.insert(component.id.as_str());
                        }
                    }
                }

                // Token-less components join the best-matching function
                // cluster, or any cluster of their domain.
                for component in components {
                    if assigned.contains(component.id.as_str()) {
                        continue;
                    }
                    let target_key = best_function_match(&component.id, &functions)
                        .map(|function| format!("{domain}_{function}"))
                        .filter(|key| named.contains_key(key))
                        .or_else(|| {
                            named
                                .keys()
                                .find(|key| key.starts_with(&format!("{domain}_")))
                                .cloned()
                        });
                    if let Some(key) = target_key {
                        if let Some(cluster) = named.get_mut(&key) {
                            cluster.add_member(&component.id);
                            assigned.insert(component.id.as_str());
                        }
                    }
                }
            }
        }
    }

    // Infrastructure components get their own pool.
    let mut infra = new_cluster(&mut next_id);
    for component in &graph.components {
        if !assigned.contains(component.id.as_str()) && is_shared_infrastructure(&component.id) {
            infra.add_member(&component.id);
            assigned.insert(component.id.as_str());
        }
    }
    if !infra.is_empty() {
        named.insert("infrastructure".to_string(), infra);
    }

    // Remaining (core-domain) components route by function token.
    for component in &graph.components {
        if assigned.contains(component.id.as_str()) {
            continue;
        }
        match functions.get(component.id.as_str()) {
            Some(function) => {
                let existing = named.keys().find(|key| key.contains(function)).cloned();
                if let Some(cluster) = existing.and_then(|key| named.get_mut(&key)) {
                    cluster.add_member(&component.id);
                } else {
                    let mut cluster = new_cluster(&mut next_id);
                    cluster.add_member(&component.id);
                    named.insert(format!("misc_{function}"), cluster);
                }
            }
            None => {
                named
                    .entry("misc".to_string())
                    .or_insert_with(|| new_cluster(&mut next_id))
                    .add_member(&component.id);
            }
        }
        assigned.insert(component.id.as_str());
    }

    let clusters: Vec<Cluster> = named.into_values().filter(|c| !c.is_empty()).collect();
    let clusters = consolidate_singleton_clusters(clusters, &graph.components);

    if clusters.is_empty() {
        vec![single_cluster(graph)]
    } else {
        clusters
    }
}

/// Word-boundary match of known function tokens against a component's
/// camel-case name words; returns the matching token.
fn best_function_match(id: &str, functions: &BTreeMap<&str, String>) -> Option<String> {
    let words = camel_case_words(simple_name(id));
    for function in functions.values() {
        if words.iter().any(|word| word == function) {
            return Some(function.clone());
        }
    }
    None
}

fn camel_case_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in name.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            words.push(current.to_lowercase());
            current = String::new();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}

/// Merge singleton data-object clusters into their domain's main cluster to
/// prevent over-fragmentation from entities and DTOs.
fn consolidate_singleton_clusters(clusters: Vec<Cluster>, components: &[Component]) -> Vec<Cluster> {
    let index: BTreeMap<&str, &Component> =
        components.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut by_domain: BTreeMap<String, Vec<Cluster>> = BTreeMap::new();
    for cluster in clusters {
        let domains: BTreeSet<String> = cluster
            .members
            .iter()
            .filter_map(|m| index.get(m.as_str()))
            .map(|c| effective_domain(c))
            .filter(|d| d != "core")
            .collect();
        let primary = domains.into_iter().next().unwrap_or_else(|| "core".to_string());
        by_domain.entry(primary).or_default().push(cluster);
    }

    let mut consolidated = Vec::new();
    for (_, mut domain_clusters) in by_domain {
        if domain_clusters.len() <= 1 {
            consolidated.append(&mut domain_clusters);
            continue;
        }

        // First-encountered largest cluster is the merge target.
        let largest_idx = domain_clusters
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.len().cmp(&b.len()).then(ib.cmp(ia)))
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        let mut absorbed = Vec::new();
        for (idx, cluster) in domain_clusters.iter().enumerate() {
            if idx == largest_idx {
                continue;
            }
            if cluster.len() == 1 {
                let member = &cluster.members[0];
                let data_object = index
                    .get(member.as_str())
                    .map(|c| is_mergeable_data_object(c))
                    .unwrap_or(false);
                if data_object || domain_clusters[largest_idx].len() >= 3 {
                    absorbed.push((idx, member.clone()));
                    continue;
                }
            }
        }

        let absorbed_indices: BTreeSet<usize> = absorbed.iter().map(|(idx, _)| *idx).collect();
        for (_, member) in &absorbed {
            domain_clusters[largest_idx].add_member(member);
        }
        for (idx, cluster) in domain_clusters.into_iter().enumerate() {
            if idx == largest_idx || !absorbed_indices.contains(&idx) {
                consolidated.push(cluster);
            }
        }
    }

    consolidated
}

fn is_mergeable_data_object(component: &Component) -> bool {
    let simple = component.simple_name();
    let package = component.package_path();
    if package.is_empty() {
        return false;
    }
    if DATA_OBJECT_RE.is_match(simple) {
        return true;
    }
    is_domain_or_ports_package(package) && !MERGEABLE_ROLE_RE.is_match(simple)
}

fn domain_based_clusters(
    graph: &DependencyGraph,
    by_domain: &BTreeMap<String, Vec<&Component>>,
) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();
    let mut next_id = 0u32;

    // Larger domains first so remainders land in substantial clusters.
    let mut sorted: Vec<(&String, &Vec<&Component>)> = by_domain
        .iter()
        .filter(|(domain, components)| domain.as_str() != "core" && components.len() >= 2)
        .collect();
    sorted.sort_by(|(da, ca), (db, cb)| cb.len().cmp(&ca.len()).then(da.cmp(db)));

    for (_, components) in sorted {
        let mut cluster = Cluster::new(next_id);
        next_id += 1;
        for component in components {
            if used.insert(component.id.as_str()) {
                cluster.add_member(&component.id);
            }
        }
        if !cluster.is_empty() {
            clusters.push(cluster);
        }
    }

    if let Some(core_components) = by_domain.get("core") {
        for component in core_components {
            if used.contains(component.id.as_str()) {
                continue;
            }
            if clusters.is_empty() {
                let mut cluster = Cluster::new(next_id);
                next_id += 1;
                cluster.add_member(&component.id);
                clusters.push(cluster);
            } else {
                clusters[0].add_member(&component.id);
            }
            used.insert(component.id.as_str());
        }
    }

    for component in &graph.components {
        if used.contains(component.id.as_str()) {
            continue;
        }
        if clusters.is_empty() {
            let mut cluster = Cluster::new(next_id);
            next_id += 1;
            cluster.add_member(&component.id);
            clusters.push(cluster);
        } else {
            let best = best_cluster_by_package(component, &clusters, &graph.components);
            clusters[best].add_member(&component.id);
        }
        used.insert(component.id.as_str());
    }

    clusters
}

/// Prefer a cluster holding a member of the exact same package.
fn best_cluster_by_package(
    component: &Component,
    clusters: &[Cluster],
    components: &[Component],
) -> usize {
    let index: BTreeMap<&str, &Component> =
        components.iter().map(|c| (c.id.as_str(), c)).collect();
    let package = component.package_path();

    for (idx, cluster) in clusters.iter().enumerate() {
        for member in &cluster.members {
            if let Some(other) = index.get(member.as_str()) {
                if other.package_path() == package {
                    return idx;
                }
            }
        }
    }
    0
}

fn entity_based_clusters(graph: &DependencyGraph) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    // (entity base name, cluster index) in discovery order.
    let mut entity_clusters: Vec<(String, usize)> = Vec::new();
    let mut assigned: HashSet<&str> = HashSet::new();
    let mut next_id = 0u32;

    for component in &graph.components {
        if is_entity(component) {
            let base = entity_base_name(component.simple_name());
            let mut cluster = Cluster::new(next_id);
            next_id += 1;
            cluster.add_member(&component.id);
            assigned.insert(component.id.as_str());
            entity_clusters.push((base, clusters.len()));
            clusters.push(cluster);
        }
    }

    for component in &graph.components {
        if assigned.contains(component.id.as_str()) {
            continue;
        }
        let simple_lower = component.simple_name().to_lowercase();
        for (base, idx) in &entity_clusters {
            if !base.is_empty() && simple_lower.contains(base.as_str()) {
                clusters[*idx].add_member(&component.id);
                assigned.insert(component.id.as_str());
                break;
            }
        }
    }

    for component in &graph.components {
        if assigned.contains(component.id.as_str()) {
            continue;
        }
        if clusters.is_empty() {
            let mut cluster = Cluster::new(next_id);
            next_id += 1;
            cluster.add_member(&component.id);
            clusters.push(cluster);
        } else {
            clusters[0].add_member(&component.id);
        }
        assigned.insert(component.id.as_str());
    }

    if clusters.is_empty() {
        vec![single_cluster(graph)]
    } else {
        clusters
    }
}

/// JPA-style entity: `*Entity` name, or table usage without a
/// repository/service role.
fn is_entity(component: &Component) -> bool {
    let simple_lower = component.simple_name().to_lowercase();
    simple_lower.ends_with("entity")
        || (!component.tables_used.is_empty()
            && !simple_lower.contains("repository")
            && !simple_lower.contains("service"))
}

fn entity_base_name(simple: &str) -> String {
    ENTITY_SUFFIX_RE.replace(simple, "").to_lowercase()
}

fn has_cross_domain_mixing(clusters: &[Cluster], components: &[Component]) -> bool {
    let index: BTreeMap<&str, &Component> =
        components.iter().map(|c| (c.id.as_str(), c)).collect();

    clusters.iter().any(|cluster| {
        let domains: BTreeSet<String> = cluster
            .members
            .iter()
            .filter_map(|m| index.get(m.as_str()))
            .map(|c| effective_domain(c))
            .filter(|d| d != "core")
            .collect();
        domains.len() > 1
    })
}

fn has_large_single_cluster(clusters: &[Cluster], total: usize, ratio: f64) -> bool {
    if total == 0 {
        return false;
    }
    let largest = clusters.iter().map(Cluster::len).max().unwrap_or(0);
    largest as f64 / total as f64 > ratio
}

fn single_cluster(graph: &DependencyGraph) -> Cluster {
    let mut cluster = Cluster::new(0);
    for component in &graph.components {
        cluster.add_member(&component.id);
    }
    cluster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusteringConfig;

    fn component(id: &str) -> Component {
        Component::new(id)
    }

    fn graph_of(ids: &[&str]) -> DependencyGraph {
        DependencyGraph::new(ids.iter().map(|id| component(id)).collect(), vec![])
    }

    fn member_of<'a>(clusters: &'a [Cluster], id: &str) -> Option<&'a Cluster> {
        clusters.iter().find(|c| c.members.iter().any(|m| m == id))
    }

    #[test]
    fn infer_domain_skips_org_and_company_prefixes() {
        assert_eq!(infer_domain("com.acme.billing.InvoiceService"), "billing");
        assert_eq!(infer_domain("org.example.spring.orders.OrderService"), "orders");
    }

    #[test]
    fn infer_domain_without_package_is_core() {
        assert_eq!(infer_domain("Standalone"), "core");
    }

    #[test]
    fn infer_domain_skips_generic_segments() {
        assert_eq!(infer_domain("com.acme.app.payments.PaymentService"), "payments");
    }

    #[test]
    fn extract_function_matches_longest_suffix_first() {
        assert_eq!(
            extract_business_function("com.a.b.BookingServiceImpl"),
            Some("booking".to_string())
        );
    }

    #[test]
    fn extract_function_ignores_data_objects() {
        assert_eq!(extract_business_function("com.a.b.BookingEntity"), None);
        assert_eq!(extract_business_function("com.a.b.BookingDto"), None);
    }

    #[test]
    fn extract_function_ignores_plain_domain_objects() {
        assert_eq!(extract_business_function("com.a.b.domain.Booking"), None);
        assert_eq!(
            extract_business_function("com.a.b.domain.BookingRepository"),
            Some("booking".to_string())
        );
    }

    #[test]
    fn every_component_lands_in_exactly_one_cluster() {
        let graph = graph_of(&[
            "com.acme.order.OrderService",
            "com.acme.order.OrderRepository",
            "com.acme.invoice.InvoiceService",
            "com.acme.invoice.InvoiceRepository",
            "com.acme.util.StringHelper",
        ]);
        let clusters = create_clusters(&graph, &ClusteringConfig::default());

        let mut seen = BTreeSet::new();
        for cluster in &clusters {
            for member in &cluster.members {
                assert!(seen.insert(member.clone()), "{member} assigned twice");
            }
        }
        assert_eq!(seen.len(), graph.components.len());
    }

    #[test]
    fn single_domain_project_uses_entity_clusters() {
        let mut airport = component("com.acme.flights.AirportEntity");
        airport.tables_used.insert("airport".into());
        let graph = DependencyGraph::new(
            vec![
                airport,
                component("com.acme.flights.AirportService"),
                component("com.acme.flights.AirportRepository"),
                component("com.acme.flights.AirportController"),
            ],
            vec![],
        );
        let clusters = create_clusters(&graph, &ClusteringConfig::default());

        let entity_cluster = member_of(&clusters, "com.acme.flights.AirportEntity").unwrap();
        assert!(entity_cluster
            .members
            .iter()
            .any(|m| m == "com.acme.flights.AirportService"));
        assert!(entity_cluster
            .members
            .iter()
            .any(|m| m == "com.acme.flights.AirportController"));
    }

    #[test]
    fn multi_domain_project_separates_domains() {
        let graph = graph_of(&[
            "com.acme.order.OrderService",
            "com.acme.order.OrderRepository",
            "com.acme.order.OrderController",
            "com.acme.billing.InvoiceService",
            "com.acme.billing.InvoiceRepository",
            "com.acme.billing.InvoiceController",
        ]);
        let clusters = create_clusters(&graph, &ClusteringConfig::default());
        assert!(clusters.len() >= 2);

        let order = member_of(&clusters, "com.acme.order.OrderService").unwrap();
        assert!(!order
            .members
            .iter()
            .any(|m| m.starts_with("com.acme.billing")));
    }

    #[test]
    fn infrastructure_components_are_pooled() {
        let graph = graph_of(&[
            "com.acme.order.OrderService",
            "com.acme.order.OrderRepository",
            "com.acme.billing.InvoiceService",
            "com.acme.billing.InvoiceRepository",
            "com.acme.order.SecurityConfig",
        ]);
        let clusters = create_clusters(&graph, &ClusteringConfig::default());

        // SecurityConfig shares the order domain, but infrastructure naming
        // keeps it out of function clusters; mixing validation may still
        // reroute. Either way it never joins the billing cluster.
        let infra = member_of(&clusters, "com.acme.order.SecurityConfig").unwrap();
        assert!(!infra
            .members
            .iter()
            .any(|m| m.starts_with("com.acme.billing")));
    }

    #[test]
    fn singleton_clusters_merge_into_dominant_domain_cluster() {
        // PaymentService is the only bearer of the "payment" function in the
        // order domain; with a 3-member order cluster alongside, the
        // singleton folds into it.
        let graph = graph_of(&[
            "com.acme.order.OrderService",
            "com.acme.order.OrderRepository",
            "com.acme.order.OrderController",
            "com.acme.order.PaymentService",
            "com.acme.billing.InvoiceService",
            "com.acme.billing.InvoiceRepository",
            "com.acme.billing.InvoiceController",
            "com.acme.billing.InvoiceDto",
        ]);
        let clusters = create_clusters(&graph, &ClusteringConfig::default());

        let payment_cluster = member_of(&clusters, "com.acme.order.PaymentService").unwrap();
        assert_eq!(payment_cluster.len(), 4, "singleton should have merged");
    }

    #[test]
    fn camel_case_words_split_on_boundaries() {
        assert_eq!(camel_case_words("BookingMapper"), vec!["booking", "mapper"]);
    }
}
