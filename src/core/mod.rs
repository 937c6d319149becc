//! Core data model for the decomposition pipeline.
//!
//! The types here mirror the producer contract: an external ingester emits a
//! [`DependencyGraph`] (components plus typed, weighted edges) as JSON, and
//! the inference pipeline consumes it read-only. Components and edges are
//! immutable once loaded; only the `layer` field is filled in by the layer
//! classification phase before clustering begins.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Architectural layer assigned to a component by the layer classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Controller,
    Business,
    Persistence,
    Domain,
    Transfer,
    Web,
    Shared,
}

impl Layer {
    /// Display name used in human-facing reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Layer::Controller => "Controlador",
            Layer::Business => "Negocio",
            Layer::Persistence => "Persistencia",
            Layer::Domain => "Dominio",
            Layer::Transfer => "Transferencia",
            Layer::Web => "Web",
            Layer::Shared => "Compartida",
        }
    }
}

/// Kind of dependency relation carried by an [`Edge`].
///
/// An edge aggregates every relation observed between the same ordered pair
/// of components; the kinds accumulate as a multiset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Call,
    Db,
    External,
    Reflection,
    Repository,
    InjectionField,
    InjectionConstructor,
    Relation,
    InterfaceImpl,
    SpringEvent,
    Uses,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Call => "call",
            EdgeKind::Db => "db",
            EdgeKind::External => "external",
            EdgeKind::Reflection => "reflection",
            EdgeKind::Repository => "repository",
            EdgeKind::InjectionField => "injection-field",
            EdgeKind::InjectionConstructor => "injection-constructor",
            EdgeKind::Relation => "relation",
            EdgeKind::InterfaceImpl => "interface-impl",
            EdgeKind::SpringEvent => "spring-event",
            EdgeKind::Uses => "uses",
        }
    }

    pub fn parse(label: &str) -> Option<EdgeKind> {
        match label {
            "call" => Some(EdgeKind::Call),
            "db" => Some(EdgeKind::Db),
            "external" => Some(EdgeKind::External),
            "reflection" => Some(EdgeKind::Reflection),
            "repository" => Some(EdgeKind::Repository),
            "injection-field" => Some(EdgeKind::InjectionField),
            "injection-constructor" => Some(EdgeKind::InjectionConstructor),
            "relation" => Some(EdgeKind::Relation),
            "interface-impl" => Some(EdgeKind::InterfaceImpl),
            "spring-event" => Some(EdgeKind::SpringEvent),
            "uses" => Some(EdgeKind::Uses),
            _ => None,
        }
    }
}

/// Serde adapter: edge kinds travel on the wire as one comma-joined label
/// (`"call,injection-field"`), matching the producer contract.
mod edge_kind_label {
    use super::EdgeKind;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(kinds: &[EdgeKind], ser: S) -> Result<S::Ok, S::Error> {
        let joined = kinds
            .iter()
            .map(EdgeKind::as_str)
            .collect::<Vec<_>>()
            .join(",");
        ser.serialize_str(&joined)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<EdgeKind>, D::Error> {
        let label = String::deserialize(de)?;
        label
            .split(',')
            .filter(|part| !part.is_empty())
            .map(|part| {
                EdgeKind::parse(part.trim())
                    .ok_or_else(|| D::Error::custom(format!("unknown edge kind '{part}'")))
            })
            .collect()
    }
}

/// EJB session kind detected on a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EjbKind {
    Stateless,
    Stateful,
    Singleton,
    MessageDriven,
}

/// Messaging technology a component participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessagingKind {
    Jms,
    SpringJms,
    Rabbitmq,
    Kafka,
    Activemq,
}

/// Direction of a component's messaging participation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingRole {
    Publisher,
    Consumer,
    Both,
}

/// Servlet-style web artifact kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebKind {
    Servlet,
    Jsp,
    Filter,
    Listener,
}

/// Role a web artifact plays in request handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebRole {
    Servlet,
    Filter,
    Listener,
}

/// Outgoing dependency count from one component into one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageGroup {
    pub package: String,
    pub count: u32,
}

/// A single class, interface, or enum of the analyzed project.
///
/// `calls_out`/`calls_in` are derived from the edge list by the producer and
/// are guaranteed mutually consistent; table names arrive lowercased and all
/// collections arrive sorted and deduplicated (producer contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Fully-qualified dotted name; unique primary key.
    pub id: String,

    #[serde(default)]
    pub is_interface: bool,

    #[serde(default)]
    pub loc: u32,

    #[serde(default)]
    pub tables_used: BTreeSet<String>,

    #[serde(default)]
    pub sensitive_data: bool,

    /// Simple annotation names, package stripped by the ingester.
    #[serde(default)]
    pub annotations: BTreeSet<String>,

    /// Superclass id; omitted for hierarchy roots.
    #[serde(default, rename = "extends", skip_serializing_if = "Option::is_none")]
    pub extends_class: Option<String>,

    #[serde(default, rename = "implements")]
    pub implements_interfaces: BTreeSet<String>,

    #[serde(default)]
    pub calls_out: BTreeSet<String>,

    #[serde(default)]
    pub calls_in: BTreeSet<String>,

    /// External coordinates `group:artifact[:version]`.
    #[serde(default)]
    pub external_dependencies: BTreeSet<String>,

    #[serde(default)]
    pub secrets_references: BTreeSet<String>,

    #[serde(default)]
    pub package_dependencies: Vec<PackageGroup>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_type: Option<MessagingKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_role: Option<MessagingRole>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ejb_type: Option<EjbKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_type: Option<WebKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_role: Option<WebRole>,

    /// Coupling between objects, when the ingester computed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbo: Option<u32>,

    /// Lack of cohesion in methods, in [0,1]; 0 = high cohesion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcom: Option<f64>,

    /// Assigned by the layer classification phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<Layer>,

    /// Domain inferred from the package path; filled lazily by clustering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl Component {
    pub fn new(id: impl Into<String>) -> Self {
        Component {
            id: id.into(),
            is_interface: false,
            loc: 0,
            tables_used: BTreeSet::new(),
            sensitive_data: false,
            annotations: BTreeSet::new(),
            extends_class: None,
            implements_interfaces: BTreeSet::new(),
            calls_out: BTreeSet::new(),
            calls_in: BTreeSet::new(),
            external_dependencies: BTreeSet::new(),
            secrets_references: BTreeSet::new(),
            package_dependencies: Vec::new(),
            messaging_type: None,
            messaging_role: None,
            ejb_type: None,
            web_type: None,
            web_role: None,
            cbo: None,
            lcom: None,
            layer: None,
            domain: None,
        }
    }

    /// Simple class name (last dotted segment).
    pub fn simple_name(&self) -> &str {
        simple_name(&self.id)
    }

    /// Package path (everything before the last dot), empty for the default
    /// package.
    pub fn package_path(&self) -> &str {
        package_path(&self.id)
    }

    /// Case-insensitive annotation lookup.
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// Last dotted segment of a fully-qualified name.
pub fn simple_name(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}

/// Package portion of a fully-qualified name; empty when there is none.
pub fn package_path(id: &str) -> &str {
    match id.rfind('.') {
        Some(idx) => &id[..idx],
        None => "",
    }
}

/// Directed dependency between two components.
///
/// Deduplicated on `(from, to)`; `weight` sums the atomic contributions and
/// `kinds` accumulates every relation kind observed for the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub weight: u32,
    #[serde(rename = "type", with = "edge_kind_label")]
    pub kinds: Vec<EdgeKind>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: u32, kind: EdgeKind) -> Self {
        Edge {
            from: from.into(),
            to: to.into(),
            weight,
            kinds: vec![kind],
        }
    }

    pub fn has_kind(&self, kind: EdgeKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// API endpoints and schemas collected by the ingester; the pipeline passes
/// them through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiContracts {
    #[serde(default)]
    pub endpoints: Vec<serde_json::Value>,
    #[serde(default)]
    pub schemas: BTreeMap<String, serde_json::Value>,
}

/// Graph-level metadata, stamped by the ingester and enriched by the
/// pipeline before the graph artifact is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphMeta {
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "timestamp_now")]
    pub collected_at: String,

    #[serde(default)]
    pub dependency_accuracy: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub decomposition_accuracy: BTreeMap<String, serde_json::Value>,
}

fn default_source() -> String {
    "ingest".to_string()
}

fn timestamp_now() -> String {
    Utc::now().to_rfc3339()
}

impl Default for GraphMeta {
    fn default() -> Self {
        GraphMeta {
            source: default_source(),
            collected_at: timestamp_now(),
            dependency_accuracy: BTreeMap::new(),
            decomposition_accuracy: BTreeMap::new(),
        }
    }
}

/// The typed dependency graph the pipeline consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    #[serde(default)]
    pub components: Vec<Component>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    #[serde(default)]
    pub api_contracts: ApiContracts,

    #[serde(default)]
    pub meta: GraphMeta,
}

impl DependencyGraph {
    pub fn new(components: Vec<Component>, edges: Vec<Edge>) -> Self {
        DependencyGraph {
            components,
            edges,
            api_contracts: ApiContracts::default(),
            meta: GraphMeta::default(),
        }
    }

    /// Id → component lookup, rebuilt per phase (components are never owned
    /// across phases).
    pub fn component_index(&self) -> HashMap<&str, &Component> {
        self.components
            .iter()
            .map(|c| (c.id.as_str(), c))
            .collect()
    }

    /// Check the producer contract: every edge endpoint and every
    /// `calls_out`/`calls_in` entry must name a known component, and table
    /// names must be lowercase. Returns one message per violation.
    pub fn closure_violations(&self) -> Vec<String> {
        let ids: BTreeSet<&str> = self.components.iter().map(|c| c.id.as_str()).collect();
        let mut violations = Vec::new();

        for edge in &self.edges {
            if !ids.contains(edge.from.as_str()) {
                violations.push(format!("edge source '{}' is not a component", edge.from));
            }
            if !ids.contains(edge.to.as_str()) {
                violations.push(format!("edge target '{}' is not a component", edge.to));
            }
        }

        let mut seen_pairs = BTreeSet::new();
        for edge in &self.edges {
            if !seen_pairs.insert((edge.from.as_str(), edge.to.as_str())) {
                violations.push(format!(
                    "duplicate edge ({} -> {}); pairs must be aggregated",
                    edge.from, edge.to
                ));
            }
        }

        for comp in &self.components {
            for callee in &comp.calls_out {
                if !ids.contains(callee.as_str()) {
                    violations.push(format!(
                        "'{}' calls_out references unknown '{}'",
                        comp.id, callee
                    ));
                }
            }
            for caller in &comp.calls_in {
                if !ids.contains(caller.as_str()) {
                    violations.push(format!(
                        "'{}' calls_in references unknown '{}'",
                        comp.id, caller
                    ));
                }
            }
            for table in &comp.tables_used {
                if table.chars().any(|ch| ch.is_ascii_uppercase()) {
                    violations.push(format!(
                        "'{}' uses non-lowercase table name '{}'",
                        comp.id, table
                    ));
                }
            }
        }

        violations
    }

    pub fn total_loc(&self) -> u64 {
        self.components.iter().map(|c| c.loc as u64).sum()
    }
}

/// A group of components produced by the initial partitioning phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: u32,
    pub members: Vec<String>,
    #[serde(default)]
    pub metrics: ClusterMetrics,
    #[serde(default)]
    pub rules_fired: Vec<String>,
    #[serde(default)]
    pub final_score: f64,
}

impl Cluster {
    pub fn new(cluster_id: u32) -> Self {
        Cluster {
            cluster_id,
            members: Vec::new(),
            metrics: ClusterMetrics::default(),
            rules_fired: Vec::new(),
            final_score: 0.0,
        }
    }

    pub fn add_member(&mut self, id: impl Into<String>) {
        self.members.push(id.into());
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Structural metrics computed per cluster over the full graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterMetrics {
    /// Fraction of outgoing call weight that stays inside the cluster.
    pub cohesion: f64,
    /// Fraction of outgoing call weight that leaves the cluster.
    pub coupling: f64,
    /// Tables used by at least two members.
    pub tables_shared: Vec<String>,
    /// Any member handles sensitive data.
    pub sensitive: bool,
    /// Summed lines of code.
    pub loc: u64,
}

/// Human-readable reasoning attached to one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterExplanation {
    pub cluster_id: u32,
    pub reasoning: Vec<String>,
}

/// Output of the clustering + scoring phases: the microservice candidate
/// clusters and one explanation per cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MicroserviceCandidates {
    pub candidates: Vec<Cluster>,
    pub explanations: Vec<ClusterExplanation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_strips_package() {
        assert_eq!(simple_name("com.shop.order.OrderService"), "OrderService");
        assert_eq!(simple_name("OrderService"), "OrderService");
    }

    #[test]
    fn package_path_of_default_package_is_empty() {
        assert_eq!(package_path("com.shop.OrderService"), "com.shop");
        assert_eq!(package_path("OrderService"), "");
    }

    #[test]
    fn edge_kinds_round_trip_as_comma_label() {
        let edge = Edge {
            from: "a.B".into(),
            to: "a.C".into(),
            weight: 7,
            kinds: vec![EdgeKind::Call, EdgeKind::InjectionField],
        };
        let json = serde_json::to_string(&edge).unwrap();
        assert!(json.contains("\"type\":\"call,injection-field\""));

        let back: Edge = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kinds, vec![EdgeKind::Call, EdgeKind::InjectionField]);
    }

    #[test]
    fn unknown_edge_kind_is_rejected() {
        let json = r#"{"from":"a.B","to":"a.C","weight":1,"type":"teleport"}"#;
        assert!(serde_json::from_str::<Edge>(json).is_err());
    }

    #[test]
    fn closure_violations_flag_dangling_edges() {
        let mut graph = DependencyGraph::new(
            vec![Component::new("a.B")],
            vec![Edge::new("a.B", "a.Missing", 1, EdgeKind::Call)],
        );
        graph.components[0].calls_out.insert("a.Missing".into());

        let violations = graph.closure_violations();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn closure_violations_flag_uppercase_tables() {
        let mut comp = Component::new("a.B");
        comp.tables_used.insert("Orders".into());
        let graph = DependencyGraph::new(vec![comp], vec![]);
        assert_eq!(graph.closure_violations().len(), 1);
    }

    #[test]
    fn clean_graph_has_no_violations() {
        let mut a = Component::new("a.B");
        let mut b = Component::new("a.C");
        a.calls_out.insert("a.C".into());
        b.calls_in.insert("a.B".into());
        let graph =
            DependencyGraph::new(vec![a, b], vec![Edge::new("a.B", "a.C", 1, EdgeKind::Call)]);
        assert!(graph.closure_violations().is_empty());
    }
}
