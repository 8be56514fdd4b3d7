//! Search-query expansion for the social fallback.

/// Marketing suffixes appended to each title variant.
pub const SEARCH_SUFFIXES: &[&str] = &[
    "review",
    "unboxing",
    "gadget",
    "shorts",
    "demo",
    "haul",
];

/// Expands title variants into the ordered query list: each variant alone,
/// then the variant with every suffix, de-duplicated preserving order.
#[must_use]
pub fn build_queries(variants: &[String]) -> Vec<String> {
    let mut queries = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for variant in variants {
        let variant = variant.trim();
        if variant.is_empty() {
            continue;
        }
        if seen.insert(variant.to_string()) {
            queries.push(variant.to_string());
        }
        for suffix in SEARCH_SUFFIXES {
            let query = format!("{variant} {suffix}");
            if seen.insert(query.clone()) {
                queries.push(query);
            }
        }
    }
    queries
}
