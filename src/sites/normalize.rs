//! Domain normalization utilities.

use std::collections::HashSet;

/// Maximum length of a DNS name in presentation format.
const MAX_DOMAIN_LENGTH: usize = 253;

/// Canonicalizes a domain name from a site list.
///
/// Trims surrounding whitespace, strips trailing dots and lowercases ASCII.
/// IDNA is not applied: names are expected in their A-label form.
///
/// # Returns
///
/// `None` for empty names, names containing whitespace, and names longer than
/// a DNS name can be.
pub fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('.');
    if trimmed.is_empty()
        || trimmed.len() > MAX_DOMAIN_LENGTH
        || trimmed.chars().any(char::is_whitespace)
    {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

/// Removes duplicates, keeping the first occurrence of each item.
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
