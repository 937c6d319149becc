//! Cluster evaluation rules.
//!
//! Rules are plain data records rather than trait objects: a name, a score
//! contribution, a predicate over the annotated cluster, and an explanation
//! formatter. The engine walks the fixed rule vector, appends the names of
//! fired rules to `rules_fired`, and sums their contributions into
//! `final_score` (capped at 1.0).

use crate::core::{Cluster, ClusterExplanation};

const HIGH_COHESION_THRESHOLD: f64 = 0.7;
const LOW_COUPLING_THRESHOLD: f64 = 0.3;

pub const HIGH_COHESION_RULE: &str = "Alta Cohesión Interna";
pub const LOW_COUPLING_RULE: &str = "Bajo Acoplamiento Externo";
pub const SHARED_DATA_RULE: &str = "Consistencia de Datos (Tablas Compartidas)";

/// One evaluation rule as a data record.
pub struct InferenceRule {
    pub name: &'static str,
    pub contribution: f64,
    pub predicate: fn(&Cluster) -> bool,
    pub explanation: fn(&Cluster) -> String,
}

/// The fixed rule vector, in evaluation order.
pub fn standard_rules() -> Vec<InferenceRule> {
    vec![
        InferenceRule {
            name: HIGH_COHESION_RULE,
            contribution: 0.4,
            predicate: |cluster| cluster.metrics.cohesion >= HIGH_COHESION_THRESHOLD,
            explanation: |cluster| {
                format!(
                    "Alta Cohesión ({:.0}%): Las clases de este clúster se llaman mucho entre sí.",
                    cluster.metrics.cohesion * 100.0
                )
            },
        },
        InferenceRule {
            name: LOW_COUPLING_RULE,
            contribution: 0.4,
            predicate: |cluster| cluster.metrics.coupling <= LOW_COUPLING_THRESHOLD,
            explanation: |cluster| {
                format!(
                    "Bajo Acoplamiento ({:.0}%): El grupo tiene pocas dependencias externas, facilitando su aislamiento.",
                    cluster.metrics.coupling * 100.0
                )
            },
        },
        InferenceRule {
            name: SHARED_DATA_RULE,
            contribution: 0.2,
            predicate: |cluster| !cluster.metrics.tables_shared.is_empty(),
            explanation: |cluster| {
                let tables = &cluster.metrics.tables_shared;
                match tables.first() {
                    Some(example) => format!(
                        "Regla 'Datos Comunes': Los miembros comparten {} tablas (ej. '{}'). Agruparlos mantiene la consistencia de datos.",
                        tables.len(),
                        example
                    ),
                    None => String::new(),
                }
            },
        },
    ]
}

/// Rule phase: evaluate the vector against one cluster.
pub fn apply_rules(cluster: &mut Cluster, rules: &[InferenceRule]) {
    let mut total = 0.0;
    for rule in rules {
        if (rule.predicate)(cluster) {
            cluster.rules_fired.push(rule.name.to_string());
            total += rule.contribution;
        }
    }
    cluster.final_score = total.min(1.0);
}

/// Build the human-readable reasoning for one evaluated cluster.
pub fn explain_cluster(cluster: &Cluster, rules: &[InferenceRule]) -> ClusterExplanation {
    let mut reasoning = Vec::new();

    let cohesion_fired = cluster.rules_fired.iter().any(|r| r == HIGH_COHESION_RULE);
    let coupling_fired = cluster.rules_fired.iter().any(|r| r == LOW_COUPLING_RULE);

    if cohesion_fired && coupling_fired {
        reasoning.push(format!(
            "Alta Cohesión ({:.0}%): Las clases de este clúster se llaman mucho entre sí. \
             Bajo Acoplamiento ({:.0}%): El grupo tiene pocas dependencias externas, facilitando su aislamiento.",
            cluster.metrics.cohesion * 100.0,
            cluster.metrics.coupling * 100.0
        ));

        if cluster.rules_fired.iter().any(|r| r == SHARED_DATA_RULE) {
            if let Some(rule) = rules.iter().find(|r| r.name == SHARED_DATA_RULE) {
                let text = (rule.explanation)(cluster);
                if !text.is_empty() {
                    reasoning.push(text);
                }
            }
        }
    } else {
        reasoning.push(format!(
            "Métricas de estructura: Cohesión interna del {:.0}% y Acoplamiento externo del {:.0}%.",
            cluster.metrics.cohesion * 100.0,
            cluster.metrics.coupling * 100.0
        ));
    }

    ClusterExplanation {
        cluster_id: cluster.cluster_id,
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClusterMetrics;

    fn cluster_with_metrics(cohesion: f64, coupling: f64, tables: &[&str]) -> Cluster {
        let mut cluster = Cluster::new(0);
        cluster.add_member("x.A");
        cluster.add_member("x.B");
        cluster.metrics = ClusterMetrics {
            cohesion,
            coupling,
            tables_shared: tables.iter().map(|t| t.to_string()).collect(),
            sensitive: false,
            loc: 0,
        };
        cluster
    }

    #[test]
    fn all_rules_fire_and_cap_at_one() {
        let mut cluster = cluster_with_metrics(0.9, 0.1, &["orders"]);
        apply_rules(&mut cluster, &standard_rules());

        assert_eq!(cluster.rules_fired.len(), 3);
        assert!((cluster.final_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weak_cluster_fires_nothing() {
        let mut cluster = cluster_with_metrics(0.2, 0.8, &[]);
        apply_rules(&mut cluster, &standard_rules());

        assert!(cluster.rules_fired.is_empty());
        assert_eq!(cluster.final_score, 0.0);
    }

    #[test]
    fn partial_firing_sums_contributions() {
        let mut cluster = cluster_with_metrics(0.8, 0.6, &[]);
        apply_rules(&mut cluster, &standard_rules());

        assert_eq!(cluster.rules_fired, vec![HIGH_COHESION_RULE.to_string()]);
        assert!((cluster.final_score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn strong_cluster_explanation_mentions_shared_tables() {
        let mut cluster = cluster_with_metrics(0.9, 0.1, &["orders"]);
        let rules = standard_rules();
        apply_rules(&mut cluster, &rules);

        let explanation = explain_cluster(&cluster, &rules);
        assert_eq!(explanation.reasoning.len(), 2);
        assert!(explanation.reasoning[1].contains("orders"));
    }

    #[test]
    fn weak_cluster_gets_basic_metrics_line() {
        let mut cluster = cluster_with_metrics(0.3, 0.7, &[]);
        let rules = standard_rules();
        apply_rules(&mut cluster, &rules);

        let explanation = explain_cluster(&cluster, &rules);
        assert_eq!(explanation.reasoning.len(), 1);
        assert!(explanation.reasoning[0].contains("Métricas de estructura"));
    }
}
