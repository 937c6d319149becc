//! Domain-token extraction from component ids.
//!
//! A domain token is the lowercased simple-name prefix that precedes a role
//! keyword (`OrderService` → `order`), filtered through the exclusion
//! dictionary. The same extraction feeds both the token-similarity signal
//! and business name generation; only the minimum-length filter differs.

use std::collections::BTreeSet;

use crate::core::{package_path, simple_name};

/// Role keywords, in match-priority order. The first keyword found in a
/// simple name wins, so the order is part of the extraction contract.
pub const ROLE_KEYWORDS: [&str; 12] = [
    "service",
    "controller",
    "repository",
    "repo",
    "usecase",
    "operations",
    "listener",
    "publisher",
    "adapter",
    "factory",
    "handler",
    "db",
];

/// Minimum length for package-segment tokens.
const MIN_PACKAGE_TOKEN_LEN: usize = 3;

/// Extract domain tokens from a set of member ids.
///
/// For each member whose lowercased simple name contains a role keyword,
/// the prefix before the keyword (with `repository` and `impl` stripped)
/// becomes a token when it is non-empty, at least `min_token_len` long, and
/// not excluded. The last package segment also becomes a token when longer
/// than two characters and not excluded.
pub fn extract_domain_tokens(
    members: &[String],
    exclude: &BTreeSet<String>,
    min_token_len: usize,
) -> BTreeSet<String> {
    let mut tokens = BTreeSet::new();

    for member in members {
        let simple = simple_name(member).to_lowercase();

        for role in ROLE_KEYWORDS {
            let Some(idx) = simple.find(role) else {
                continue;
            };

            let token = simple[..idx].replace("repository", "").replace("impl", "");
            if token.len() >= min_token_len.max(1) && !exclude.contains(token.as_str()) {
                tokens.insert(token);
            }

            let package = package_path(member);
            if let Some(last_segment) = package.rsplit('.').next().filter(|s| !s.is_empty()) {
                let segment = last_segment.to_lowercase();
                if segment.len() >= MIN_PACKAGE_TOKEN_LEN && !exclude.contains(segment.as_str()) {
                    tokens.insert(segment);
                }
            }
            break;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclude() -> BTreeSet<String> {
        crate::config::AnalysisConfig::default().naming.exclude_tokens
    }

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extracts_prefix_before_role_keyword() {
        let tokens = extract_domain_tokens(&ids(&["com.shop.order.OrderService"]), &exclude(), 1);
        assert!(tokens.contains("order"));
    }

    #[test]
    fn data_objects_yield_no_tokens() {
        let tokens = extract_domain_tokens(&ids(&["com.shop.order.OrderDto"]), &exclude(), 1);
        assert!(tokens.is_empty());
    }

    #[test]
    fn excluded_tokens_are_dropped() {
        // "rest" precedes "controller" but sits in the exclusion dictionary.
        let tokens = extract_domain_tokens(&ids(&["com.shop.web.RestController"]), &exclude(), 1);
        assert!(!tokens.contains("rest"));
    }

    #[test]
    fn package_segment_becomes_a_token() {
        let tokens =
            extract_domain_tokens(&ids(&["com.shop.billing.InvoiceService"]), &exclude(), 1);
        assert!(tokens.contains("billing"));
        assert!(tokens.contains("invoice"));
    }

    #[test]
    fn short_package_segments_are_dropped() {
        let tokens = extract_domain_tokens(&ids(&["com.vn.PayService"]), &exclude(), 1);
        assert!(tokens.contains("pay"));
        assert!(!tokens.contains("vn"));
    }

    #[test]
    fn min_token_len_filters_short_name_prefixes() {
        let loose = extract_domain_tokens(&ids(&["com.shop.hr.HrService"]), &exclude(), 1);
        assert!(loose.contains("hr"));

        let strict = extract_domain_tokens(&ids(&["com.shop.hr.HrService"]), &exclude(), 3);
        assert!(!strict.contains("hr"));
    }

    #[test]
    fn first_role_keyword_wins() {
        // "service" precedes "controller" in priority, so the prefix stops there.
        let tokens = extract_domain_tokens(
            &ids(&["com.shop.order.OrderServiceController"]),
            &exclude(),
            1,
        );
        assert!(tokens.contains("order"));
        assert!(!tokens.contains("orderservice"));
    }
}
