//! # archmap
//!
//! A monolith decomposition analyzer. archmap consumes the typed class
//! dependency graph of an object-oriented project (produced by an external
//! ingester) and proposes candidate microservices: groups of classes with
//! viability scores, generated names, rationale, and recommended actions.
//!
//! ## How it works
//!
//! The inference core is a pure pipeline with strict phase ordering:
//!
//! 1. **Layer classification** — each component gets an architectural layer
//!    from a weighted vote over annotations, names, and packages.
//! 2. **Clustering** — an initial partition by project shape: entity-based
//!    for layered single-domain projects, business-responsibility (with
//!    domain-based and entity-based fallbacks) otherwise.
//! 3. **Cluster metrics** — cohesion, coupling, shared tables, sensitivity,
//!    and size per cluster.
//! 4. **Inter-cluster signals** — per pair: table Jaccard, call density,
//!    token similarity, and event links, combined into an evidence score.
//! 5. **Consolidation** — greedy union-find over evidence edges under
//!    guardrails (support/business separation, size bounds, strong-candidate
//!    protection), preceded by a name-collision pre-pass.
//! 6. **Naming and viability** — a display name and an Alta/Media/Baja tier
//!    with rationale per consolidated group.
//! 7. **Recommendation** — proposals and support libraries plus project
//!    metadata, assembled into the architecture artifact.
//!
//! ## Quick start
//!
//! ```rust
//! use archmap::config::AnalysisConfig;
//! use archmap::core::{Component, DependencyGraph, Edge, EdgeKind};
//! use std::collections::BTreeMap;
//!
//! let mut service = Component::new("com.shop.order.OrderService");
//! service.calls_out.insert("com.shop.order.OrderRepository".into());
//! let repo = Component::new("com.shop.order.OrderRepository");
//!
//! let mut graph = DependencyGraph::new(
//!     vec![service, repo],
//!     vec![Edge::new(
//!         "com.shop.order.OrderService",
//!         "com.shop.order.OrderRepository",
//!         2,
//!         EdgeKind::Call,
//!     )],
//! );
//!
//! let config = AnalysisConfig::default();
//! let candidates = archmap::analysis::analyze_graph(&mut graph, &config);
//! let architecture = archmap::analysis::build_architecture(
//!     &candidates,
//!     &graph.components,
//!     &BTreeMap::new(),
//!     &config,
//! );
//! println!("{}", architecture.summary);
//! ```
//!
//! ## CLI
//!
//! ```bash
//! # Full analysis with artifacts
//! archmap analyze graph.json --output out.json
//!
//! # Check a graph against the producer contract
//! archmap validate graph.json
//! ```

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod observability;

pub use crate::analysis::{
    analyze_graph, build_architecture, ConsolidatedArchitecture, MicroserviceProposal,
    SupportLibrary, Viability, ViabilityScorer,
};
pub use crate::config::{get_config, init_config, AnalysisConfig};
pub use crate::core::{
    Cluster, ClusterMetrics, Component, DependencyGraph, Edge, EdgeKind, Layer,
    MicroserviceCandidates,
};
pub use crate::io::{create_writer, OutputFormat, OutputWriter};
