//! Viability scoring for consolidated groups.
//!
//! The base score blends adjusted cohesion, inverted external coupling, and
//! data cohesion under configurable weights, then multiplicative size
//! penalties apply. CBO/LCOM averages feed the rationale text only; they
//! never move the score.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::ViabilityConfig;
use crate::core::{Cluster, Component};

/// Below this member count the small-group penalty applies.
const SMALL_GROUP_SIZE: usize = 3;
/// Above this member count a sparse group takes the large-group penalty.
const LARGE_GROUP_SIZE: usize = 50;

/// Viability tier for a consolidated group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Viability {
    Alta,
    Media,
    Baja,
}

impl Viability {
    pub fn label(&self) -> &'static str {
        match self {
            Viability::Alta => "Alta",
            Viability::Media => "Media",
            Viability::Baja => "Baja",
        }
    }
}

/// Tier, numeric score, and ordered rationale lines for one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViabilityResult {
    pub viability: Viability,
    pub score: f64,
    pub rationale: Vec<String>,
}

/// Group-average code-quality metrics, rationale-only.
#[derive(Debug, Clone, Copy)]
struct QualityMetrics {
    avg_cbo: f64,
    avg_lcom: f64,
    with_cbo: usize,
    with_lcom: usize,
}

/// Scores consolidated groups against the full cluster and component sets.
pub struct ViabilityScorer<'a> {
    clusters: &'a [Cluster],
    components: HashMap<&'a str, &'a Component>,
    config: &'a ViabilityConfig,
}

impl<'a> ViabilityScorer<'a> {
    pub fn new(
        clusters: &'a [Cluster],
        components: &'a [Component],
        config: &'a ViabilityConfig,
    ) -> Self {
        ViabilityScorer {
            clusters,
            components: components.iter().map(|c| (c.id.as_str(), c)).collect(),
            config,
        }
    }

    /// Score one group of cluster ids.
    pub fn calculate(&self, cluster_ids: &BTreeSet<u32>) -> ViabilityResult {
        let clusters: Vec<&Cluster> = cluster_ids
            .iter()
            .filter_map(|id| self.clusters.iter().find(|c| c.cluster_id == *id))
            .collect();

        if clusters.is_empty() {
            return ViabilityResult {
                viability: Viability::Baja,
                score: 0.0,
                rationale: vec!["No se encontraron clusters válidos".to_string()],
            };
        }

        let members = group_members(&clusters);
        let total_size: usize = clusters.iter().map(|c| c.len()).sum();

        let density = self.internal_edge_density(&members);
        let cohesion_adj = self.adjusted_cohesion(&clusters, density);
        let external_coupling = self.external_coupling(&members);
        let data_cohesion = data_cohesion(&clusters);
        let quality = self.quality_metrics(&members);

        let mut score = self.config.cohesion_weight * cohesion_adj
            + self.config.coupling_weight * (1.0 - external_coupling)
            + self.config.data_weight * data_cohesion;

        if total_size < SMALL_GROUP_SIZE {
            score *= self.config.small_size_multiplier;
        } else if total_size > LARGE_GROUP_SIZE && density < self.config.large_size_density_threshold {
            score *= self.config.large_size_multiplier;
        }

        let viability = if score >= self.config.high_viability {
            Viability::Alta
        } else if score >= self.config.medium_viability {
            Viability::Media
        } else {
            Viability::Baja
        };

        let rationale = self.rationale(
            cohesion_adj,
            external_coupling,
            data_cohesion,
            total_size,
            quality,
            viability,
        );

        ViabilityResult {
            viability,
            score,
            rationale,
        }
    }

    /// Member-size-weighted cohesion average blended with internal edge
    /// density (70/30).
    fn adjusted_cohesion(&self, clusters: &[&Cluster], density: f64) -> f64 {
        let total: usize = clusters.iter().map(|c| c.len()).sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: f64 = clusters
            .iter()
            .map(|c| c.metrics.cohesion * c.len() as f64)
            .sum();
        let avg = weighted / total as f64;
        0.7 * avg + 0.3 * density
    }

    /// Internal call adjacencies over the n·(n−1) possible ordered pairs.
    fn internal_edge_density(&self, members: &HashSet<&str>) -> f64 {
        let possible = members.len() * members.len().saturating_sub(1);
        if possible == 0 {
            return 0.0;
        }
        let internal = self.internal_calls(members);
        internal as f64 / possible as f64
    }

    fn internal_calls(&self, members: &HashSet<&str>) -> usize {
        members
            .iter()
            .filter_map(|id| self.components.get(*id))
            .flat_map(|c| c.calls_out.iter())
            .filter(|callee| members.contains(callee.as_str()))
            .count()
    }

    /// Fraction of the group's outgoing call adjacencies that leave it.
    fn external_coupling(&self, members: &HashSet<&str>) -> f64 {
        let mut internal = 0usize;
        let mut external = 0usize;
        for id in members {
            if let Some(component) = self.components.get(*id) {
                for callee in &component.calls_out {
                    if members.contains(callee.as_str()) {
                        internal += 1;
                    } else {
                        external += 1;
                    }
                }
            }
        }
        let total = internal + external;
        if total == 0 {
            0.0
        } else {
            external as f64 / total as f64
        }
    }

    fn quality_metrics(&self, members: &HashSet<&str>) -> QualityMetrics {
        let resolved: Vec<&Component> = members
            .iter()
            .filter_map(|id| self.components.get(*id).copied())
            .collect();

        let cbo_values: Vec<u32> = resolved.iter().filter_map(|c| c.cbo).collect();
        let lcom_values: Vec<f64> = resolved.iter().filter_map(|c| c.lcom).collect();

        QualityMetrics {
            avg_cbo: average(cbo_values.iter().map(|v| *v as f64)),
            avg_lcom: average(lcom_values.iter().copied()),
            with_cbo: cbo_values.len(),
            with_lcom: lcom_values.len(),
        }
    }

    fn rationale(
        &self,
        cohesion_adj: f64,
        external_coupling: f64,
        data_cohesion: f64,
        total_size: usize,
        quality: QualityMetrics,
        viability: Viability,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        let cohesion_pct = cohesion_adj * 100.0;
        let coupling_pct = external_coupling * 100.0;

        if quality.with_cbo > 0 {
            lines.push(format!(
                "📊 Métricas de Calidad: CBO promedio {:.1} (acoplamiento entre objetos), LCOM promedio {:.2} (cohesión de métodos: 0=alta, 1=baja)",
                quality.avg_cbo, quality.avg_lcom
            ));
        }

        if cohesion_adj >= 0.7 {
            lines.push(format!(
                "✅ Alta cohesión interna ({cohesion_pct:.0}%) - componentes bien relacionados que trabajan juntos hacia un objetivo común"
            ));
        } else if cohesion_adj >= 0.5 {
            lines.push(format!(
                "⚠️ Cohesión moderada ({cohesion_pct:.0}%) - componentes parcialmente relacionados; considerar refactorización para agrupar responsabilidades más claramente"
            ));
        } else {
            lines.push(format!(
                "❌ Baja cohesión ({cohesion_pct:.0}%) - componentes poco relacionados que no comparten un propósito claro"
            ));
        }

        if external_coupling < 0.3 {
            lines.push(format!(
                "✅ Bajo acoplamiento externo ({coupling_pct:.0}%) - buena independencia y facilidad de mantenimiento"
            ));
        } else if external_coupling < 0.5 {
            lines.push(format!(
                "⚠️ Acoplamiento moderado ({coupling_pct:.0}%) - algunas dependencias externas; considerar aplicar patrones como facades o abstracciones para reducir acoplamiento"
            ));
        } else {
            lines.push(format!(
                "❌ Alto acoplamiento externo ({coupling_pct:.0}%) - fuertemente acoplado a otros módulos, dificultando la extracción independiente"
            ));
        }

        if quality.with_cbo > 0 {
            if quality.avg_cbo <= 5.0 {
                lines.push(format!(
                    "✅ CBO bajo ({:.1}) - acoplamiento entre clases controlado, fácil de mantener",
                    quality.avg_cbo
                ));
            } else if quality.avg_cbo <= 10.0 {
                lines.push(format!(
                    "⚠️ CBO moderado ({:.1}) - acoplamiento moderado; revisar dependencias innecesarias entre clases",
                    quality.avg_cbo
                ));
            } else {
                lines.push(format!(
                    "❌ CBO alto ({:.1}) - acoplamiento excesivo entre clases, dificulta mantenimiento y testing",
                    quality.avg_cbo
                ));
            }
        }

        if quality.with_lcom > 0 {
            if quality.avg_lcom <= 0.3 {
                lines.push(format!(
                    "✅ LCOM bajo ({:.2}) - alta cohesión de métodos, clases con responsabilidad única bien definida",
                    quality.avg_lcom
                ));
            } else if quality.avg_lcom <= 0.6 {
                lines.push(format!(
                    "⚠️ LCOM moderado ({:.2}) - cohesión de métodos moderada; algunas clases podrían dividirse en clases más pequeñas",
                    quality.avg_lcom
                ));
            } else {
                lines.push(format!(
                    "❌ LCOM alto ({:.2}) - baja cohesión de métodos, clases con múltiples responsabilidades que deberían dividirse",
                    quality.avg_lcom
                ));
            }
        }

        if data_cohesion >= 0.6 {
            lines.push("✅ Datos cohesivos - tablas de base de datos bien agrupadas por dominio".to_string());
        } else if data_cohesion >= 0.3 {
            lines.push("⚠️ Datos parcialmente cohesivos - revisar si las tablas compartidas realmente pertenecen al mismo dominio".to_string());
        }

        if total_size < SMALL_GROUP_SIZE {
            lines.push(format!(
                "⚠️ Tamaño muy pequeño ({total_size} componentes) - considerar fusionar con otro módulo relacionado para evitar sobrefragmentación"
            ));
        } else if total_size > LARGE_GROUP_SIZE {
            lines.push(format!(
                "⚠️ Tamaño muy grande ({total_size} componentes) - considerar dividir en submódulos más manejables"
            ));
        } else {
            lines.push(format!(
                "✅ Tamaño adecuado ({total_size} componentes) - módulo de tamaño manejable"
            ));
        }

        if viability == Viability::Baja {
            lines.push(String::new());
            lines.push("⛔ RAZONES POR LAS QUE ESTA DESCOMPOSICIÓN NO ES VIABLE:".to_string());

            let mut reasons = Vec::new();
            if cohesion_adj < 0.5 {
                reasons.push(
                    "• Los componentes no comparten suficiente funcionalidad ni datos como para formar un módulo coherente. Extraerlos juntos crearía un módulo artificial sin un propósito de negocio claro.".to_string(),
                );
            }
            if external_coupling >= 0.5 {
                reasons.push(format!(
                    "• El alto acoplamiento externo ({coupling_pct:.0}%) significa que este módulo depende fuertemente de otros componentes del sistema. Extraerlo como módulo independiente requeriría replicar o exponer demasiada funcionalidad de otros módulos, creando interfaces complejas y frágiles."
                ));
            }
            if quality.with_cbo > 0 && quality.avg_cbo > 10.0 {
                reasons.push(format!(
                    "• CBO promedio alto ({:.1}) indica que las clases están acopladas a muchas otras clases del sistema. Esto dificulta definir límites claros del módulo y aumenta el riesgo de cambios en cascada.",
                    quality.avg_cbo
                ));
            }
            if quality.with_lcom > 0 && quality.avg_lcom > 0.6 {
                reasons.push(format!(
                    "• LCOM promedio alto ({:.2}) sugiere que las clases tienen múltiples responsabilidades no relacionadas. Antes de extraer como módulo, se debería refactorizar para separar estas responsabilidades.",
                    quality.avg_lcom
                ));
            }
            if total_size < SMALL_GROUP_SIZE {
                reasons.push(format!(
                    "• Con solo {total_size} componente(s), no justifica crear un módulo separado. El overhead de gestionar un módulo adicional (interfaces, versionado, deployment) superaría los beneficios."
                ));
            }
            if data_cohesion > 0.0 && data_cohesion < 0.3 {
                reasons.push(
                    "• La baja cohesión de datos indica que los componentes acceden a tablas diferentes sin un patrón claro. Esto sugiere que pertenecen a dominios de negocio distintos y deberían agruparse de otra manera.".to_string(),
                );
            }
            if reasons.is_empty() {
                reasons.push(
                    "• La combinación de métricas sugiere que estos componentes no forman una unidad funcional coherente que justifique su extracción como módulo independiente.".to_string(),
                );
            }
            lines.extend(reasons);

            lines.push(String::new());
            lines.push(
                "💡 RECOMENDACIÓN: Mantener estos componentes en el monolito actual o reagrupar con otros componentes con los que compartan más funcionalidad y datos. Enfocarse primero en extraer módulos con viabilidad Alta o Media.".to_string(),
            );
        }

        lines
    }
}

fn group_members<'a>(clusters: &[&'a Cluster]) -> HashSet<&'a str> {
    clusters
        .iter()
        .flat_map(|c| c.members.iter())
        .map(String::as_str)
        .collect()
}

/// Ratio of tables shared by two or more clusters to total unique tables;
/// 0.5 when no cluster shares any table.
fn data_cohesion(clusters: &[&Cluster]) -> f64 {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for cluster in clusters {
        for table in &cluster.metrics.tables_shared {
            *counts.entry(table.as_str()).or_default() += 1;
        }
    }
    if counts.is_empty() {
        return 0.5;
    }
    let shared = counts.values().filter(|count| **count > 1).count();
    shared as f64 / counts.len() as f64
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        0.0
    } else {
        collected.iter().sum::<f64>() / collected.len() as f64
    }
}
