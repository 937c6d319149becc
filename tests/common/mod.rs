//! Shared fixture builders for integration tests.
#![allow(dead_code)]

use archmap::core::{Component, DependencyGraph, Edge, EdgeKind};

/// Builds dependency graphs that honor the producer contract: edges are
/// aggregated per pair and `calls_out`/`calls_in` stay mutually consistent.
#[derive(Default)]
pub struct GraphBuilder {
    components: Vec<Component>,
    calls: Vec<(String, String, u32)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        GraphBuilder::default()
    }

    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn class(self, id: &str) -> Self {
        self.component(Component::new(id))
    }

    pub fn call(mut self, from: &str, to: &str, weight: u32) -> Self {
        self.calls.push((from.to_string(), to.to_string(), weight));
        self
    }

    pub fn build(mut self) -> DependencyGraph {
        let mut edges = Vec::new();
        for (from, to, weight) in &self.calls {
            edges.push(Edge::new(from.clone(), to.clone(), *weight, EdgeKind::Call));
            for component in &mut self.components {
                if component.id == *from {
                    component.calls_out.insert(to.clone());
                }
                if component.id == *to {
                    component.calls_in.insert(from.clone());
                }
            }
        }
        DependencyGraph::new(self.components, edges)
    }
}

pub fn class_with_tables(id: &str, tables: &[&str]) -> Component {
    let mut component = Component::new(id);
    for table in tables {
        component.tables_used.insert(table.to_string());
    }
    component
}
