//! End-to-end pipeline runs over synthetic multi-domain graphs.

mod common;

use std::collections::{BTreeMap, BTreeSet};

use archmap::analysis::{analyze_graph, build_architecture, ConsolidatedArchitecture};
use archmap::config::AnalysisConfig;
use archmap::core::DependencyGraph;
use common::{class_with_tables, GraphBuilder};

fn shop_graph() -> DependencyGraph {
    let mut item_repo = class_with_tables("com.shop.item.ItemRepository", &["item"]);
    item_repo.sensitive_data = true;

    GraphBuilder::new()
        .class("com.shop.item.ItemController")
        .class("com.shop.item.ItemService")
        .component(item_repo)
        .class("com.shop.item.ItemDto")
        .class("com.shop.order.OrderController")
        .class("com.shop.order.OrderService")
        .component(class_with_tables("com.shop.order.OrderRepository", &["order"]))
        .class("com.shop.infra.SecurityConfig")
        .class("com.shop.infra.AuthFilter")
        .call("com.shop.item.ItemController", "com.shop.item.ItemService", 3)
        .call("com.shop.item.ItemService", "com.shop.item.ItemRepository", 2)
        .call("com.shop.order.OrderController", "com.shop.order.OrderService", 2)
        .call("com.shop.order.OrderService", "com.shop.order.OrderRepository", 2)
        .call("com.shop.order.OrderService", "com.shop.item.ItemService", 1)
        .build()
}

fn run(graph: &mut DependencyGraph, config: &AnalysisConfig) -> ConsolidatedArchitecture {
    let candidates = analyze_graph(graph, config);
    build_architecture(&candidates, &graph.components, &BTreeMap::new(), config)
}

#[test]
fn every_component_is_clustered_exactly_once() {
    let config = AnalysisConfig::default();
    let mut graph = shop_graph();
    let candidates = analyze_graph(&mut graph, &config);

    let mut seen = BTreeSet::new();
    for cluster in &candidates.candidates {
        for member in &cluster.members {
            assert!(seen.insert(member.clone()), "{member} in two clusters");
        }
    }
    assert_eq!(seen.len(), graph.components.len());
}

#[test]
fn cohesion_plus_coupling_never_exceeds_one() {
    let config = AnalysisConfig::default();
    let mut graph = shop_graph();
    let candidates = analyze_graph(&mut graph, &config);

    for cluster in &candidates.candidates {
        let sum = cluster.metrics.cohesion + cluster.metrics.coupling;
        assert!(sum <= 1.0 + 1e-9, "cluster {} sums to {sum}", cluster.cluster_id);
    }
}

#[test]
fn proposals_split_item_and_order_domains() {
    let config = AnalysisConfig::default();
    let mut graph = shop_graph();
    let architecture = run(&mut graph, &config);

    assert!(architecture.proposals.len() >= 2);
    let names: Vec<&str> = architecture
        .proposals
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert!(names.contains(&"Componente de Item"), "names: {names:?}");
    assert!(names.contains(&"Componente de Order"), "names: {names:?}");
}

#[test]
fn infrastructure_lands_in_support_libraries() {
    let config = AnalysisConfig::default();
    let mut graph = shop_graph();
    let architecture = run(&mut graph, &config);

    let all_support: Vec<&String> = architecture
        .support_libraries
        .iter()
        .flat_map(|lib| lib.components.iter())
        .collect();
    assert!(all_support.iter().any(|c| c.ends_with("SecurityConfig")));
    assert!(all_support.iter().any(|c| c.ends_with("AuthFilter")));

    for proposal in &architecture.proposals {
        assert!(!proposal
            .components
            .iter()
            .any(|c| c.ends_with("SecurityConfig") || c.ends_with("AuthFilter")));
    }
}

#[test]
fn sensitivity_propagates_to_group_metrics() {
    let config = AnalysisConfig::default();
    let mut graph = shop_graph();
    let architecture = run(&mut graph, &config);

    let item_proposal = architecture
        .proposals
        .iter()
        .find(|p| p.components.iter().any(|c| c.ends_with("ItemRepository")))
        .expect("item proposal");
    assert!(item_proposal.metrics.sensitive);
}

#[test]
fn project_metadata_counts_match_the_graph() {
    let config = AnalysisConfig::default();
    let mut graph = shop_graph();
    graph.components[0].loc = 120;
    graph.components[1].loc = 80;
    let architecture = run(&mut graph, &config);

    let metadata = &architecture.project_metadata;
    assert_eq!(metadata.total_components, graph.components.len());
    assert_eq!(metadata.total_loc, graph.total_loc());
    assert_eq!(metadata.shared_domain, "com.shop");
}

#[test]
fn architecture_artifact_round_trips_through_json() {
    let config = AnalysisConfig::default();
    let mut graph = shop_graph();
    let architecture = run(&mut graph, &config);

    let json = serde_json::to_string_pretty(&architecture).unwrap();
    let back: ConsolidatedArchitecture = serde_json::from_str(&json).unwrap();
    assert_eq!(back.proposals.len(), architecture.proposals.len());
    assert_eq!(
        back.project_metadata.total_components,
        architecture.project_metadata.total_components
    );
}

#[test]
fn graph_artifact_carries_decomposition_metrics() {
    let config = AnalysisConfig::default();
    let mut graph = shop_graph();
    let candidates = analyze_graph(&mut graph, &config);
    let architecture =
        build_architecture(&candidates, &graph.components, &BTreeMap::new(), &config);
    archmap::analysis::stamp_decomposition_accuracy(&mut graph, &candidates, &architecture);

    let json = serde_json::to_string(&graph).unwrap();
    let back: DependencyGraph = serde_json::from_str(&json).unwrap();
    assert!(back.meta.decomposition_accuracy.contains_key("cluster_count"));
    assert_eq!(back.components.len(), graph.components.len());
}

#[test]
fn empty_graph_degrades_to_empty_architecture() {
    let config = AnalysisConfig::default();
    let mut graph = DependencyGraph::default();
    let architecture = run(&mut graph, &config);

    assert!(architecture.proposals.is_empty());
    assert!(architecture.support_libraries.is_empty());
    assert_eq!(architecture.project_metadata.total_components, 0);
    assert_eq!(architecture.project_metadata.shared_domain, "unknown");
}
