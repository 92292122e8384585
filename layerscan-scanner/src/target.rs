use crate::error::{Result, ScanError};
use serde::Serialize;
use url::Url;

/// Host suffix that marks an address as belonging to the anonymizing overlay.
pub const HIDDEN_SERVICE_SUFFIX: &str = ".onion";

/// A canonical crawl target: where it lives, how far from the seed it was
/// discovered, and which page linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub url: Url,
    pub depth: usize,
    pub parent: Option<String>,
}

impl Target {
    /// Child target discovered on `parent`'s page, one hop further out.
    pub fn child(url: Url, parent: &Target) -> Self {
        Self {
            url,
            depth: parent.depth + 1,
            parent: Some(parent.canonical()),
        }
    }

    /// Canonical form used for deduplication and reporting.
    pub fn canonical(&self) -> String {
        canonicalize(&self.url)
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

/// Reduce a URL to scheme + host [+ port] + path, with no query, fragment,
/// or trailing slash. Two references to the same page compare equal in this
/// form regardless of how they were written in the source document.
pub fn canonicalize(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let path = url.path().trim_end_matches('/');
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, path),
        None => format!("{}://{}{}", url.scheme(), host, path),
    }
}

/// Validate raw user input and produce the seed target at depth 0.
///
/// Input without a scheme is assumed to be plain HTTP, which is the norm for
/// hidden services. Anything that does not parse, uses a non-HTTP scheme, or
/// does not carry the hidden-service host suffix is rejected before any
/// network activity happens.
pub fn resolve(raw: &str) -> Result<Target> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScanError::InvalidTarget("empty address".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme)
        .map_err(|e| ScanError::InvalidTarget(format!("{}: {}", trimmed, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ScanError::InvalidTarget(format!(
                "unsupported scheme '{}'",
                other
            )));
        }
    }

    let host = url
        .host_str()
        .ok_or_else(|| ScanError::InvalidTarget(format!("{}: no host", trimmed)))?;
    if !host.ends_with(HIDDEN_SERVICE_SUFFIX) {
        return Err(ScanError::InvalidTarget(format!(
            "{} is not a {} address",
            host, HIDDEN_SERVICE_SUFFIX
        )));
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(Target {
        url,
        depth: 0,
        parent: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_assumes_http_scheme() {
        let target = resolve("exampleabc.onion").unwrap();
        assert_eq!(target.url.scheme(), "http");
        assert_eq!(target.canonical(), "http://exampleabc.onion");
        assert_eq!(target.depth, 0);
        assert!(target.parent.is_none());
    }

    #[test]
    fn resolve_keeps_explicit_https() {
        let target = resolve("https://exampleabc.onion/").unwrap();
        assert_eq!(target.canonical(), "https://exampleabc.onion");
    }

    #[test]
    fn resolve_rejects_clearnet_host() {
        assert!(matches!(
            resolve("http://example.com/"),
            Err(ScanError::InvalidTarget(_))
        ));
    }

    #[test]
    fn resolve_rejects_non_http_scheme() {
        assert!(matches!(
            resolve("ftp://exampleabc.onion/"),
            Err(ScanError::InvalidTarget(_))
        ));
    }

    #[test]
    fn resolve_rejects_empty_input() {
        assert!(resolve("   ").is_err());
    }

    #[test]
    fn resolve_strips_query_and_fragment() {
        let target = resolve("http://exampleabc.onion/page?session=1#top").unwrap();
        assert_eq!(target.canonical(), "http://exampleabc.onion/page");
    }

    #[test]
    fn canonical_keeps_non_default_port() {
        let target = resolve("http://exampleabc.onion:8080/x/").unwrap();
        assert_eq!(target.canonical(), "http://exampleabc.onion:8080/x");
    }

    #[test]
    fn child_tracks_depth_and_parent() {
        let seed = resolve("http://exampleabc.onion/").unwrap();
        let url = Url::parse("http://exampleabc.onion/page2").unwrap();
        let child = Target::child(url, &seed);
        assert_eq!(child.depth, 1);
        assert_eq!(child.parent.as_deref(), Some("http://exampleabc.onion"));
    }
}
