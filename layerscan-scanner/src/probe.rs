use crate::report::{PageMeta, ProbeResult, ProbeStatus};
use crate::target::Target;
use crate::transport::Transport;
use scraper::{Html, Selector};
use std::time::Instant;
use tracing::debug;

/// Marker emitted by common web servers when directory indexing is enabled.
const DIRECTORY_LISTING_MARKER: &str = "Index of /";

/// Fetch `base` + `relative_path` once and classify the outcome.
///
/// Never fails: transport trouble is a classification, not an error. Returns
/// the probe result together with the response body so the caller can feed a
/// successful baseline page to link extraction; common-path callers drop it.
pub async fn probe(
    transport: &dyn Transport,
    base: &Target,
    relative_path: &str,
) -> (ProbeResult, Option<String>) {
    let url = probe_url(base, relative_path);
    let start = Instant::now();

    match transport.fetch(&url).await {
        Ok(response) => {
            let meta = PageMeta {
                title: extract_title(&response.body),
                server: response.server.clone(),
                content_length: response.content_length,
                directory_listing: response.body.contains(DIRECTORY_LISTING_MARKER),
            };
            let result = ProbeResult {
                url,
                path: relative_path.to_string(),
                status: ProbeStatus::Http(response.status),
                meta: Some(meta),
                response_time: start.elapsed(),
            };
            (result, Some(response.body))
        }
        Err(err) => {
            debug!("probe of {} failed: {}", url, err);
            let reason = match err {
                crate::error::ScanError::Transport { reason, .. } => reason,
                other => other.to_string(),
            };
            let result = ProbeResult {
                url,
                path: relative_path.to_string(),
                status: ProbeStatus::TransportError(reason),
                meta: None,
                response_time: start.elapsed(),
            };
            (result, None)
        }
    }
}

fn probe_url(base: &Target, relative_path: &str) -> String {
    if relative_path.is_empty() {
        return base.url.to_string();
    }
    match base.url.join(relative_path) {
        Ok(url) => url.to_string(),
        Err(_) => format!(
            "{}/{}",
            base.canonical(),
            relative_path.trim_start_matches('/')
        ),
    }
}

fn extract_title(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let document = Html::parse_document(body);
    let selector = Selector::parse("title").unwrap();
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target;
    use crate::transport::mock::StaticTransport;

    fn seed() -> Target {
        target::resolve("http://exampleabc.onion/").unwrap()
    }

    #[tokio::test]
    async fn baseline_probe_extracts_metadata() {
        let transport = StaticTransport::new().with_page(
            "http://exampleabc.onion/",
            200,
            "<html><head><title> Hidden Wiki </title></head><body>hi</body></html>",
        );

        let (result, body) = probe(&transport, &seed(), "").await;
        assert_eq!(result.status, ProbeStatus::Http(200));
        assert!(result.is_reachable());
        assert!(body.is_some());

        let meta = result.meta.unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hidden Wiki"));
        assert_eq!(meta.server.as_deref(), Some("nginx"));
        assert!(!meta.directory_listing);
    }

    #[tokio::test]
    async fn not_found_is_a_normal_outcome() {
        let transport =
            StaticTransport::new().with_page("http://exampleabc.onion/admin/", 404, "gone");

        let (result, body) = probe(&transport, &seed(), "/admin/").await;
        assert_eq!(result.status, ProbeStatus::Http(404));
        assert!(result.is_denied());
        assert_eq!(result.path, "/admin/");
        // The body still comes back; callers only use it for the baseline.
        assert!(body.is_some());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let transport = StaticTransport::new();

        let (result, body) = probe(&transport, &seed(), "/.env").await;
        assert!(result.is_transport_error());
        assert!(result.meta.is_none());
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn directory_listing_is_flagged() {
        let transport = StaticTransport::new().with_page(
            "http://exampleabc.onion/backup/",
            200,
            "<html><title>Index of /backup</title><body>Index of /backup</body></html>",
        );

        let (result, _) = probe(&transport, &seed(), "/backup/").await;
        assert!(result.meta.unwrap().directory_listing);
    }

    #[test]
    fn probe_url_joins_relative_paths() {
        assert_eq!(probe_url(&seed(), ""), "http://exampleabc.onion/");
        assert_eq!(
            probe_url(&seed(), "/admin/"),
            "http://exampleabc.onion/admin/"
        );
        assert_eq!(probe_url(&seed(), ".env"), "http://exampleabc.onion/.env");
    }
}
