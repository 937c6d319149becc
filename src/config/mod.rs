//! Configuration surface for the decomposition pipeline.
//!
//! Every tunable the pipeline consults lives here: signal weights,
//! consolidation guardrails, viability scoring weights and cutoffs,
//! clustering shape thresholds, and the naming dictionaries. Defaults match
//! the shipped behavior; `.archmap.toml` overrides any subset.
//!
//! Weight groups must sum to 1.0 and every ratio must lie in [0,1];
//! violations are a fatal setup error at pipeline start, never mid-run.

mod loader;
pub(crate) mod patterns;

pub use loader::{
    get_config, init_config, parse_and_validate_config, CONFIG_ENV_VAR, CONFIG_FILE_NAME,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Weights for the four inter-cluster evidence signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalWeights {
    #[serde(default = "default_table_weight")]
    pub table: f64,
    #[serde(default = "default_call_weight")]
    pub call: f64,
    #[serde(default = "default_token_weight")]
    pub token: f64,
    #[serde(default = "default_event_weight")]
    pub event: f64,
}

fn default_table_weight() -> f64 {
    0.25
}
fn default_call_weight() -> f64 {
    0.35
}
fn default_token_weight() -> f64 {
    0.30
}
fn default_event_weight() -> f64 {
    0.10
}

impl Default for SignalWeights {
    fn default() -> Self {
        SignalWeights {
            table: default_table_weight(),
            call: default_call_weight(),
            token: default_token_weight(),
            event: default_event_weight(),
        }
    }
}

impl SignalWeights {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("table", self.table),
            ("call", self.call),
            ("token", self.token),
            ("event", self.event),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("signal weight '{name}' must be in [0,1], got {value}"));
            }
        }
        let sum = self.table + self.call + self.token + self.event;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("signal weights must sum to 1.0, got {sum:.3}"));
        }
        Ok(())
    }

    /// Rescale so the sum is exactly 1.0.
    pub fn normalize(&mut self) {
        let sum = self.table + self.call + self.token + self.event;
        if sum > 0.0 {
            self.table /= sum;
            self.call /= sum;
            self.token /= sum;
            self.event /= sum;
        }
    }
}

/// Guardrails for the greedy cluster consolidation phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationConfig {
    /// Minimum evidence score for a merge candidate.
    #[serde(default = "default_evidence_threshold")]
    pub evidence_threshold: f64,

    /// How many individually strong signals a candidate needs.
    #[serde(default = "default_min_strong_signals")]
    pub min_strong_signals: usize,

    #[serde(default = "default_strong_table_jaccard")]
    pub strong_table_jaccard: f64,

    #[serde(default = "default_strong_call_density")]
    pub strong_call_density: f64,

    #[serde(default = "default_strong_token_similarity")]
    pub strong_token_similarity: f64,

    /// Combined size above which a merge needs high token similarity.
    #[serde(default = "default_max_size_without_high_similarity")]
    pub max_size_without_high_similarity: usize,

    /// Token similarity that overrides the size guardrail.
    #[serde(default = "default_high_token_similarity")]
    pub high_token_similarity: f64,

    /// Infrastructure-member ratio at which a cluster counts as support.
    #[serde(default = "default_support_ratio")]
    pub support_ratio: f64,

    /// Lower ratio at which a group counts as "significant infrastructure"
    /// for the same-domain pre-merge.
    #[serde(default = "default_significant_infra_ratio")]
    pub significant_infra_ratio: f64,

    /// Combined size cap for the same-domain pre-merge.
    #[serde(default = "default_max_same_domain_size")]
    pub max_same_domain_size: usize,

    /// Keywords marking a member as infrastructure.
    #[serde(default = "patterns::support_keywords")]
    pub support_keywords: BTreeSet<String>,
}

fn default_evidence_threshold() -> f64 {
    0.65
}
fn default_min_strong_signals() -> usize {
    2
}
fn default_strong_table_jaccard() -> f64 {
    0.4
}
fn default_strong_call_density() -> f64 {
    0.35
}
fn default_strong_token_similarity() -> f64 {
    0.6
}
fn default_max_size_without_high_similarity() -> usize {
    40
}
fn default_high_token_similarity() -> f64 {
    0.75
}
fn default_support_ratio() -> f64 {
    0.8
}
fn default_significant_infra_ratio() -> f64 {
    0.3
}
fn default_max_same_domain_size() -> usize {
    50
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        ConsolidationConfig {
            evidence_threshold: default_evidence_threshold(),
            min_strong_signals: default_min_strong_signals(),
            strong_table_jaccard: default_strong_table_jaccard(),
            strong_call_density: default_strong_call_density(),
            strong_token_similarity: default_strong_token_similarity(),
            max_size_without_high_similarity: default_max_size_without_high_similarity(),
            high_token_similarity: default_high_token_similarity(),
            support_ratio: default_support_ratio(),
            significant_infra_ratio: default_significant_infra_ratio(),
            max_same_domain_size: default_max_same_domain_size(),
            support_keywords: patterns::support_keywords(),
        }
    }
}

impl ConsolidationConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("evidence_threshold", self.evidence_threshold),
            ("strong_table_jaccard", self.strong_table_jaccard),
            ("strong_call_density", self.strong_call_density),
            ("strong_token_similarity", self.strong_token_similarity),
            ("high_token_similarity", self.high_token_similarity),
            ("support_ratio", self.support_ratio),
            ("significant_infra_ratio", self.significant_infra_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("consolidation '{name}' must be in [0,1], got {value}"));
            }
        }
        Ok(())
    }
}

/// Weights, cutoffs, and penalties for the viability scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViabilityConfig {
    #[serde(default = "default_cohesion_weight")]
    pub cohesion_weight: f64,
    #[serde(default = "default_coupling_weight")]
    pub coupling_weight: f64,
    #[serde(default = "default_data_weight")]
    pub data_weight: f64,

    /// Score at or above which a group is Alta.
    #[serde(default = "default_high_viability")]
    pub high_viability: f64,
    /// Score at or above which a group is Media.
    #[serde(default = "default_medium_viability")]
    pub medium_viability: f64,

    /// Multiplier applied when the group has fewer than 3 members.
    #[serde(default = "default_small_size_multiplier")]
    pub small_size_multiplier: f64,
    /// Multiplier applied when the group exceeds 50 members with sparse
    /// internal edges.
    #[serde(default = "default_large_size_multiplier")]
    pub large_size_multiplier: f64,
    /// Internal edge density below which the large-size penalty applies.
    #[serde(default = "default_large_size_density_threshold")]
    pub large_size_density_threshold: f64,

    /// Strong-candidate definition: minimum cohesion.
    #[serde(default = "default_strong_cohesion")]
    pub strong_cohesion: f64,
    /// Strong-candidate definition: coupling must stay below this.
    #[serde(default = "default_strong_coupling_max")]
    pub strong_coupling_max: f64,
    /// Strong-candidate definition: minimum member count.
    #[serde(default = "default_strong_min_size")]
    pub strong_min_size: usize,

    /// Proposals at or below this size are reported as nano-services.
    #[serde(default = "default_nano_max_size")]
    pub nano_max_size: usize,
}

fn default_cohesion_weight() -> f64 {
    0.5
}
fn default_coupling_weight() -> f64 {
    0.35
}
fn default_data_weight() -> f64 {
    0.15
}
fn default_high_viability() -> f64 {
    0.7
}
fn default_medium_viability() -> f64 {
    0.5
}
fn default_small_size_multiplier() -> f64 {
    0.6
}
fn default_large_size_multiplier() -> f64 {
    0.7
}
fn default_large_size_density_threshold() -> f64 {
    0.5
}
fn default_strong_cohesion() -> f64 {
    0.7
}
fn default_strong_coupling_max() -> f64 {
    0.3
}
fn default_strong_min_size() -> usize {
    3
}
fn default_nano_max_size() -> usize {
    2
}

impl Default for ViabilityConfig {
    fn default() -> Self {
        ViabilityConfig {
            cohesion_weight: default_cohesion_weight(),
            coupling_weight: default_coupling_weight(),
            data_weight: default_data_weight(),
            high_viability: default_high_viability(),
            medium_viability: default_medium_viability(),
            small_size_multiplier: default_small_size_multiplier(),
            large_size_multiplier: default_large_size_multiplier(),
            large_size_density_threshold: default_large_size_density_threshold(),
            strong_cohesion: default_strong_cohesion(),
            strong_coupling_max: default_strong_coupling_max(),
            strong_min_size: default_strong_min_size(),
            nano_max_size: default_nano_max_size(),
        }
    }
}

impl ViabilityConfig {
    pub fn validate(&self) -> Result<(), String> {
        let sum = self.cohesion_weight + self.coupling_weight + self.data_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("viability weights must sum to 1.0, got {sum:.3}"));
        }
        for (name, value) in [
            ("cohesion_weight", self.cohesion_weight),
            ("coupling_weight", self.coupling_weight),
            ("data_weight", self.data_weight),
            ("high_viability", self.high_viability),
            ("medium_viability", self.medium_viability),
            ("small_size_multiplier", self.small_size_multiplier),
            ("large_size_multiplier", self.large_size_multiplier),
            (
                "large_size_density_threshold",
                self.large_size_density_threshold,
            ),
            ("strong_cohesion", self.strong_cohesion),
            ("strong_coupling_max", self.strong_coupling_max),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("viability '{name}' must be in [0,1], got {value}"));
            }
        }
        if self.medium_viability > self.high_viability {
            return Err(format!(
                "medium_viability ({}) must not exceed high_viability ({})",
                self.medium_viability, self.high_viability
            ));
        }
        Ok(())
    }

    /// Rescale the base-score weights so the sum is exactly 1.0.
    pub fn normalize(&mut self) {
        let sum = self.cohesion_weight + self.coupling_weight + self.data_weight;
        if sum > 0.0 {
            self.cohesion_weight /= sum;
            self.coupling_weight /= sum;
            self.data_weight /= sum;
        }
    }
}

/// Project-shape thresholds for the initial clustering strategy choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Largest-domain share above which the project counts as single-domain.
    #[serde(default = "default_single_domain_ratio")]
    pub single_domain_ratio: f64,

    /// Share of all components a single cluster may hold before the
    /// business-responsibility result is rejected.
    #[serde(default = "default_max_cluster_ratio")]
    pub max_cluster_ratio: f64,

    /// Minimum cluster count a strategy must produce.
    #[serde(default = "default_min_clusters")]
    pub min_clusters: usize,
}

fn default_single_domain_ratio() -> f64 {
    0.75
}
fn default_max_cluster_ratio() -> f64 {
    0.5
}
fn default_min_clusters() -> usize {
    2
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        ClusteringConfig {
            single_domain_ratio: default_single_domain_ratio(),
            max_cluster_ratio: default_max_cluster_ratio(),
            min_clusters: default_min_clusters(),
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("single_domain_ratio", self.single_domain_ratio),
            ("max_cluster_ratio", self.max_cluster_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("clustering '{name}' must be in [0,1], got {value}"));
            }
        }
        Ok(())
    }
}

/// Dictionaries for microservice name generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Tokens never used as name material.
    #[serde(default = "patterns::exclude_tokens")]
    pub exclude_tokens: BTreeSet<String>,

    /// Ordered `(keyword, display)` pairs for infrastructure names; list
    /// position breaks count ties.
    #[serde(default = "patterns::infra_keywords")]
    pub infra_keywords: Vec<(String, String)>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingConfig {
            exclude_tokens: patterns::exclude_tokens(),
            infra_keywords: patterns::infra_keywords(),
        }
    }
}

/// Per-layer pattern lists for the layer classifier vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerPatterns {
    #[serde(default = "patterns::controller_annotations")]
    pub controller_annotations: Vec<String>,
    #[serde(default = "patterns::business_annotations")]
    pub business_annotations: Vec<String>,
    #[serde(default = "patterns::persistence_annotations")]
    pub persistence_annotations: Vec<String>,
    #[serde(default = "patterns::domain_annotations")]
    pub domain_annotations: Vec<String>,
    #[serde(default = "patterns::transfer_annotations")]
    pub transfer_annotations: Vec<String>,
    #[serde(default = "patterns::rest_annotations")]
    pub rest_annotations: Vec<String>,

    #[serde(default = "patterns::controller_name_patterns")]
    pub controller_names: Vec<String>,
    #[serde(default = "patterns::non_controller_name_patterns")]
    pub non_controller_names: Vec<String>,
    #[serde(default = "patterns::business_name_patterns")]
    pub business_names: Vec<String>,
    #[serde(default = "patterns::persistence_name_patterns")]
    pub persistence_names: Vec<String>,
    #[serde(default = "patterns::domain_name_patterns")]
    pub domain_names: Vec<String>,
    #[serde(default = "patterns::transfer_name_patterns")]
    pub transfer_names: Vec<String>,
    #[serde(default = "patterns::shared_name_patterns")]
    pub shared_names: Vec<String>,

    #[serde(default = "patterns::controller_package_patterns")]
    pub controller_packages: Vec<String>,
    #[serde(default = "patterns::business_package_patterns")]
    pub business_packages: Vec<String>,
    #[serde(default = "patterns::persistence_package_patterns")]
    pub persistence_packages: Vec<String>,
    #[serde(default = "patterns::domain_package_patterns")]
    pub domain_packages: Vec<String>,
    #[serde(default = "patterns::transfer_package_patterns")]
    pub transfer_packages: Vec<String>,
    #[serde(default = "patterns::shared_package_patterns")]
    pub shared_packages: Vec<String>,
}

impl Default for LayerPatterns {
    fn default() -> Self {
        LayerPatterns {
            controller_annotations: patterns::controller_annotations(),
            business_annotations: patterns::business_annotations(),
            persistence_annotations: patterns::persistence_annotations(),
            domain_annotations: patterns::domain_annotations(),
            transfer_annotations: patterns::transfer_annotations(),
            rest_annotations: patterns::rest_annotations(),
            controller_names: patterns::controller_name_patterns(),
            non_controller_names: patterns::non_controller_name_patterns(),
            business_names: patterns::business_name_patterns(),
            persistence_names: patterns::persistence_name_patterns(),
            domain_names: patterns::domain_name_patterns(),
            transfer_names: patterns::transfer_name_patterns(),
            shared_names: patterns::shared_name_patterns(),
            controller_packages: patterns::controller_package_patterns(),
            business_packages: patterns::business_package_patterns(),
            persistence_packages: patterns::persistence_package_patterns(),
            domain_packages: patterns::domain_package_patterns(),
            transfer_packages: patterns::transfer_package_patterns(),
            shared_packages: patterns::shared_package_patterns(),
        }
    }
}

/// Root configuration for archmap, loadable from `.archmap.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub signal_weights: SignalWeights,

    #[serde(default)]
    pub consolidation: ConsolidationConfig,

    #[serde(default)]
    pub viability: ViabilityConfig,

    #[serde(default)]
    pub clustering: ClusteringConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub layers: LayerPatterns,
}

impl AnalysisConfig {
    /// Validate every weight group and ratio; the first violation wins.
    pub fn validate(&self) -> Result<(), String> {
        self.signal_weights.validate()?;
        self.consolidation.validate()?;
        self.viability.validate()?;
        self.clustering.validate()?;
        Ok(())
    }

    /// Normalize weight groups to exact unit sums.
    pub fn normalize(&mut self) {
        self.signal_weights.normalize();
        self.viability.normalize();
    }
}
