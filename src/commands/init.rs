//! The `init` command: scaffold a default configuration file.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config::CONFIG_FILE_NAME;

const TEMPLATE: &str = r#"# archmap configuration
# Every section is optional; omitted values keep their defaults.

# Weights for the four inter-cluster evidence signals (must sum to 1.0).
[signal_weights]
table = 0.25
call = 0.35
token = 0.30
event = 0.10

[consolidation]
evidence_threshold = 0.65
min_strong_signals = 2
strong_table_jaccard = 0.4
strong_call_density = 0.35
strong_token_similarity = 0.6
max_size_without_high_similarity = 40
high_token_similarity = 0.75
support_ratio = 0.8
significant_infra_ratio = 0.3
max_same_domain_size = 50

# Viability base-score weights (must sum to 1.0) and tier cutoffs.
[viability]
cohesion_weight = 0.5
coupling_weight = 0.35
data_weight = 0.15
high_viability = 0.7
medium_viability = 0.5
small_size_multiplier = 0.6
large_size_multiplier = 0.7
large_size_density_threshold = 0.5
strong_cohesion = 0.7
strong_coupling_max = 0.3
strong_min_size = 3
nano_max_size = 2

[clustering]
single_domain_ratio = 0.75
max_cluster_ratio = 0.5
min_clusters = 2

# [naming]
# exclude_tokens = ["entity", "model", "..."]
# infra_keywords = [["security", "Seguridad"], ["auth", "Autenticación"]]
"#;

pub fn run(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    std::fs::write(path, TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}
