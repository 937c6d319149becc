//! Architectural layer classification.
//!
//! Each component gets exactly one [`Layer`] from a weighted vote over three
//! additive sources — annotations (×10), simple-name substrings (×5), and
//! package-path substrings (×3) — followed by disambiguation rules that
//! resolve the chronic Controller/Business/Persistence/Domain confusions.
//! Ties resolve in the fixed priority order Web > Controller > Business >
//! Persistence > Domain > Transfer > Shared; a zero vote means Shared.

use tracing::debug;

use crate::config::LayerPatterns;
use crate::core::{Component, DependencyGraph, Layer};

const ANNOTATION_WEIGHT: i32 = 10;
const NAME_WEIGHT: i32 = 5;
const PACKAGE_WEIGHT: i32 = 3;

/// Boost applied to the Web layer when the ingester tagged a web role.
const WEB_ROLE_BOOST: i32 = 20;

/// Classification phase: assign a layer to every component.
///
/// The only mutation of the graph after loading; all later phases read it.
pub fn classify_layers(graph: &mut DependencyGraph, patterns: &LayerPatterns) {
    for component in &mut graph.components {
        let layer = classify_component(component, patterns);
        debug!(component = %component.id, layer = ?layer, "layer assigned");
        component.layer = Some(layer);
    }
}

/// Classify a single component into its architectural layer.
pub fn classify_component(component: &Component, patterns: &LayerPatterns) -> Layer {
    let id_lower = component.id.to_lowercase();
    let simple = component.simple_name();
    let simple_lower = simple.to_lowercase();

    let mut controller = 0i32;
    let mut business = 0i32;
    let mut persistence = 0i32;
    let mut domain = 0i32;
    let mut transfer = 0i32;
    let mut web = 0i32;
    let mut shared = 0i32;

    if component.web_role.is_some() {
        web += WEB_ROLE_BOOST;
    }

    controller += score_annotations(component, &patterns.controller_annotations) * ANNOTATION_WEIGHT;
    business += score_annotations(component, &patterns.business_annotations) * ANNOTATION_WEIGHT;
    persistence +=
        score_annotations(component, &patterns.persistence_annotations) * ANNOTATION_WEIGHT;
    domain += score_annotations(component, &patterns.domain_annotations) * ANNOTATION_WEIGHT;
    transfer += score_annotations(component, &patterns.transfer_annotations) * ANNOTATION_WEIGHT;

    controller += score_name(&simple_lower, &patterns.controller_names) * NAME_WEIGHT;
    business += score_name(&simple_lower, &patterns.business_names) * NAME_WEIGHT;
    persistence += score_name(&simple_lower, &patterns.persistence_names) * NAME_WEIGHT;
    domain += score_name(&simple_lower, &patterns.domain_names) * NAME_WEIGHT;
    transfer += score_name(&simple_lower, &patterns.transfer_names) * NAME_WEIGHT;
    shared += score_name(&simple_lower, &patterns.shared_names) * NAME_WEIGHT;

    // `.services.` is ambiguous between controllers and business logic, so it
    // is kept out of the controller package vote and handled by rule 6.
    controller += score_package_excluding(&id_lower, &patterns.controller_packages, ".services.")
        * PACKAGE_WEIGHT;
    business += score_package(&id_lower, &patterns.business_packages) * PACKAGE_WEIGHT;
    persistence += score_package(&id_lower, &patterns.persistence_packages) * PACKAGE_WEIGHT;
    domain += score_package(&id_lower, &patterns.domain_packages) * PACKAGE_WEIGHT;
    transfer += score_package(&id_lower, &patterns.transfer_packages) * PACKAGE_WEIGHT;
    shared += score_package(&id_lower, &patterns.shared_packages) * PACKAGE_WEIGHT;

    // Rule 0: outbound clients and consumers are never controllers.
    if patterns
        .non_controller_names
        .iter()
        .any(|p| simple.contains(p.as_str()))
    {
        controller = 0;
        shared += 8;
    }

    let uses_database = !component.tables_used.is_empty();

    // Rule 1: direct table access is persistence, not domain.
    if uses_database {
        persistence += 15;
        domain = (domain - 10).max(0);
    }

    // Rule 1.5: providers with table access are data-access classes.
    if simple_lower.contains("provider") && uses_database {
        persistence += 20;
        shared = (shared - 10).max(0);
        business = (business - 5).max(0);
    }

    // Rule 2: @Entity/@Table means persistence, never domain.
    if component.has_annotation("Entity") || component.has_annotation("Table") {
        persistence += 10;
        domain = 0;
    }

    // Rule 3: repository/dao interfaces belong to persistence.
    if component.is_interface
        && (simple_lower.contains("repository") || simple_lower.contains("dao"))
    {
        persistence += 10;
        business = (business - 5).max(0);
    }

    // Rule 4: transfer objects living next to controllers.
    if ["dto", "request", "response", "payload"]
        .iter()
        .any(|p| simple_lower.contains(p))
        && (id_lower.contains(".controller.")
            || id_lower.contains(".rest.")
            || id_lower.contains(".api."))
    {
        transfer += 8;
        domain = (domain - 5).max(0);
    }

    // Rule 5: models and domain objects without table access.
    if (simple_lower.contains("model")
        || simple_lower.contains("domain")
        || id_lower.contains(".domain."))
        && !uses_database
    {
        domain += 5;
    }

    // Rule 6: `.services.` and `.api.` without REST annotations lean business.
    let has_rest = has_rest_annotations(component, patterns);
    if id_lower.contains(".services.") && !has_rest {
        controller -= 3;
        business += 3;
    }
    if id_lower.contains(".api.") && !has_rest {
        business += 3;
    }

    // Rule 7: non-persistence interfaces without REST annotations default to
    // business contracts.
    if component.is_interface && !has_rest {
        let persistence_interface = simple_lower.contains("repository")
            || simple_lower.contains("dao")
            || simple_lower.contains("mapper")
            || id_lower.contains(".repository.")
            || id_lower.contains(".dao.");
        if !persistence_interface {
            business += 5;
            controller = (controller - 5).max(0);
        }
    }

    // Tie resolution order: Web > Controller > Business > Persistence >
    // Domain > Transfer > Shared.
    let scored = [
        (Layer::Web, web),
        (Layer::Controller, controller),
        (Layer::Business, business),
        (Layer::Persistence, persistence),
        (Layer::Domain, domain),
        (Layer::Transfer, transfer),
        (Layer::Shared, shared),
    ];
    let max_score = scored.iter().map(|(_, s)| *s).max().unwrap_or(0);
    if max_score <= 0 {
        return Layer::Shared;
    }
    scored
        .iter()
        .find(|(_, score)| *score == max_score)
        .map(|(layer, _)| *layer)
        .unwrap_or(Layer::Shared)
}

fn score_annotations(component: &Component, targets: &[String]) -> i32 {
    targets
        .iter()
        .filter(|t| component.has_annotation(t))
        .count() as i32
}

fn score_name(simple_lower: &str, patterns: &[String]) -> i32 {
    patterns
        .iter()
        .filter(|p| simple_lower.contains(p.to_lowercase().as_str()))
        .count() as i32
}

fn score_package(id_lower: &str, patterns: &[String]) -> i32 {
    patterns.iter().filter(|p| id_lower.contains(p.as_str())).count() as i32
}

fn score_package_excluding(id_lower: &str, patterns: &[String], excluded: &str) -> i32 {
    patterns
        .iter()
        .filter(|p| p.as_str() != excluded && id_lower.contains(p.as_str()))
        .count() as i32
}

fn has_rest_annotations(component: &Component, patterns: &LayerPatterns) -> bool {
    patterns
        .rest_annotations
        .iter()
        .any(|a| component.has_annotation(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> LayerPatterns {
        LayerPatterns::default()
    }

    fn component(id: &str) -> Component {
        Component::new(id)
    }

    #[test]
    fn rest_controller_annotation_wins() {
        let mut comp = component("com.shop.order.OrderController");
        comp.annotations.insert("RestController".into());
        assert_eq!(classify_component(&comp, &patterns()), Layer::Controller);
    }

    #[test]
    fn entity_annotation_forces_persistence_over_domain() {
        let mut comp = component("com.shop.order.domain.OrderModel");
        comp.annotations.insert("Entity".into());
        comp.tables_used.insert("orders".into());
        assert_eq!(classify_component(&comp, &patterns()), Layer::Persistence);
    }

    #[test]
    fn provider_with_tables_is_persistence() {
        let mut comp = component("com.afi.AfiProvider");
        comp.tables_used.insert("afiliados".into());
        assert_eq!(classify_component(&comp, &patterns()), Layer::Persistence);
    }

    #[test]
    fn feign_client_is_never_a_controller() {
        let mut comp = component("com.shop.client.InventoryFeignClient");
        comp.annotations.insert("FeignClient".into());
        let layer = classify_component(&comp, &patterns());
        assert_ne!(layer, Layer::Controller);
    }

    #[test]
    fn dto_near_controller_package_is_transfer() {
        let comp = component("com.shop.rest.OrderRequest");
        assert_eq!(classify_component(&comp, &patterns()), Layer::Transfer);
    }

    #[test]
    fn domain_model_without_tables_is_domain() {
        let comp = component("com.shop.order.domain.OrderModel");
        assert_eq!(classify_component(&comp, &patterns()), Layer::Domain);
    }

    #[test]
    fn web_role_outranks_everything() {
        let mut comp = component("com.shop.web.LoginServlet");
        comp.web_role = Some(crate::core::WebRole::Servlet);
        assert_eq!(classify_component(&comp, &patterns()), Layer::Web);
    }

    #[test]
    fn unmarked_component_falls_back_to_shared() {
        let comp = component("com.shop.misc.Thing");
        assert_eq!(classify_component(&comp, &patterns()), Layer::Shared);
    }

    #[test]
    fn plain_interface_defaults_to_business() {
        let mut comp = component("com.shop.order.OrderPort");
        comp.is_interface = true;
        assert_eq!(classify_component(&comp, &patterns()), Layer::Business);
    }

    #[test]
    fn classify_layers_assigns_every_component() {
        let mut graph = DependencyGraph::new(
            vec![
                component("com.shop.order.OrderService"),
                component("com.shop.misc.Thing"),
            ],
            vec![],
        );
        classify_layers(&mut graph, &patterns());
        assert!(graph.components.iter().all(|c| c.layer.is_some()));
    }
}
