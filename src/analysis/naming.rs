//! Microservice display-name generation.
//!
//! A group dominated by infrastructure-named members (80% or more) gets an
//! infrastructure name built from its top keyword displays; everything else
//! gets a business name built from the two most frequent domain tokens.
//! Fixed fallback literals cover empty groups and token droughts, and the
//! whole generation depends only on member ids and the dictionaries, so
//! names are deterministic and can be generated speculatively (the
//! consolidator's name-collision pre-pass relies on this).

use std::collections::BTreeMap;

use crate::analysis::tokens::extract_domain_tokens;
use crate::config::AnalysisConfig;
use crate::core::{simple_name, Cluster};

pub const UNKNOWN_COMPONENT_NAME: &str = "Componente Desconocido";
pub const GENERIC_BUSINESS_NAME: &str = "Componente de Negocio";
pub const GENERIC_INFRASTRUCTURE_NAME: &str = "Componente de Infraestructura";

/// Minimum length for a name-worthy domain token.
const MIN_NAME_TOKEN_LEN: usize = 3;

/// Generate the display name for a group of clusters.
pub fn generate_name(cluster_ids: &[u32], all_clusters: &[Cluster], config: &AnalysisConfig) -> String {
    let clusters: Vec<&Cluster> = cluster_ids
        .iter()
        .filter_map(|id| all_clusters.iter().find(|c| c.cluster_id == *id))
        .collect();

    if clusters.is_empty() {
        return UNKNOWN_COMPONENT_NAME.to_string();
    }

    if is_infrastructure_group(&clusters, config) {
        infrastructure_name(&clusters, config)
    } else {
        business_name(&clusters, config)
    }
}

/// 80%-or-more of member simple names carry an infrastructure keyword.
fn is_infrastructure_group(clusters: &[&Cluster], config: &AnalysisConfig) -> bool {
    let total: usize = clusters.iter().map(|c| c.len()).sum();
    if total == 0 {
        return false;
    }

    let infra = clusters
        .iter()
        .flat_map(|c| c.members.iter())
        .filter(|member| {
            let simple = simple_name(member).to_lowercase();
            config
                .naming
                .infra_keywords
                .iter()
                .any(|(keyword, _)| simple.contains(keyword.as_str()))
        })
        .count();

    infra as f64 / total as f64 >= config.consolidation.support_ratio
}

fn infrastructure_name(clusters: &[&Cluster], config: &AnalysisConfig) -> String {
    // keyword -> member hit count; list position breaks count ties.
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for member in clusters.iter().flat_map(|c| c.members.iter()) {
        let simple = simple_name(member).to_lowercase();
        for (position, (keyword, _)) in config.naming.infra_keywords.iter().enumerate() {
            if simple.contains(keyword.as_str()) {
                *counts.entry(position).or_default() += 1;
            }
        }
    }

    if counts.is_empty() {
        return GENERIC_INFRASTRUCTURE_NAME.to_string();
    }

    let mut ranked: Vec<(usize, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(pos_a, count_a), (pos_b, count_b)| {
        count_b.cmp(count_a).then(pos_a.cmp(pos_b))
    });

    let displays: Vec<&str> = ranked
        .iter()
        .take(2)
        .map(|(position, _)| config.naming.infra_keywords[*position].1.as_str())
        .collect();

    match displays.as_slice() {
        [only] => format!("Componente de {only}"),
        [first, second] => format!("Componente de {first} & {second}"),
        _ => GENERIC_INFRASTRUCTURE_NAME.to_string(),
    }
}

fn business_name(clusters: &[&Cluster], config: &AnalysisConfig) -> String {
    // token -> number of clusters contributing it.
    let mut frequency: BTreeMap<String, usize> = BTreeMap::new();
    for cluster in clusters {
        let tokens = extract_domain_tokens(
            &cluster.members,
            &config.naming.exclude_tokens,
            MIN_NAME_TOKEN_LEN,
        );
        for token in tokens {
            *frequency.entry(token).or_default() += 1;
        }
    }

    if frequency.is_empty() {
        return GENERIC_BUSINESS_NAME.to_string();
    }

    let mut ranked: Vec<(String, usize)> = frequency.into_iter().collect();
    ranked.sort_by(|(token_a, count_a), (token_b, count_b)| {
        count_b.cmp(count_a).then(token_a.cmp(token_b))
    });

    let tokens: Vec<String> = ranked
        .iter()
        .take(2)
        .map(|(token, _)| capitalize(token))
        .collect();

    match tokens.as_slice() {
        [only] => format!("Componente de {only}"),
        [first, second] => format!("Componente de {first} y {second}"),
        _ => GENERIC_BUSINESS_NAME.to_string(),
    }
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
