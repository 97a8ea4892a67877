//! Single (domain, selector) probe.

use std::time::Duration;

use super::resolver::TxtResolver;
use crate::error_handling::ProbeFailure;

/// DNS name holding the key for `selector` at `domain`: `<selector>._domainkey.<domain>`.
pub fn query_name(domain: &str, selector: &str) -> String {
    format!("{selector}._domainkey.{domain}")
}

/// Issues one TXT query for `selector` at `domain`, bounded by `timeout`.
///
/// The timeout covers the resolver call as a whole. When it fires the lookup
/// future is dropped, so a hung query never outlives its bound.
///
/// # Errors
///
/// Returns the classified `ProbeFailure` if the lookup fails or times out.
pub async fn probe<R: TxtResolver>(
    resolver: &R,
    domain: &str,
    selector: &str,
    timeout: Duration,
) -> Result<String, ProbeFailure> {
    let name = query_name(domain, selector);
    match tokio::time::timeout(timeout, resolver.query_txt(&name)).await {
        Ok(result) => result,
        Err(_) => Err(ProbeFailure::Timeout(timeout)),
    }
}
