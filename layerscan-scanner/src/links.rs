use crate::target::{HIDDEN_SERVICE_SUFFIX, Target, canonicalize};
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Extract same-service links from a page body.
///
/// Only anchors whose host matches the base host (and carries the
/// hidden-service suffix) survive; everything cross-service is out of crawl
/// scope. Surviving references are canonicalized and deduplicated within the
/// page, preserving document order. Each yielded target sits one hop deeper
/// than `base`.
pub fn extract_links(base: &Target, body: &str) -> Vec<Target> {
    if body.is_empty() {
        return Vec::new();
    }

    let document = Html::parse_document(body);
    let selector = Selector::parse("a[href]").unwrap();
    let base_host = base.host().to_string();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(resolved) = resolve_href(&base.url, href) else {
            continue;
        };
        let Some(host) = resolved.host_str() else {
            continue;
        };
        if host != base_host || !host.ends_with(HIDDEN_SERVICE_SUFFIX) {
            debug!("skipping cross-service link {}", resolved);
            continue;
        }

        let canonical = canonicalize(&resolved);
        if seen.insert(canonical) {
            links.push(Target::child(resolved, base));
        }
    }

    links
}

/// Resolve an href against the page URL, dropping pseudo-links and stripping
/// query/fragment so equivalent references collapse to one canonical form.
fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
    {
        return None;
    }

    let mut resolved = base.join(href).ok()?;
    resolved.set_query(None);
    resolved.set_fragment(None);
    Some(resolved)
}
