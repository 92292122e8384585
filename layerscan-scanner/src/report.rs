use crate::robots::RobotsFindings;
use crate::target::Target;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Outcome classification of a single fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProbeStatus {
    /// A response came back; the code is a finding, not a failure.
    Http(u16),
    /// Connect failure, timeout, or proxy trouble before any response.
    TransportError(String),
}

/// Response metadata, present only when an HTTP response was received.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub title: Option<String>,
    pub server: Option<String>,
    pub content_length: Option<u64>,
    pub directory_listing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub url: String,
    /// Relative path probed; empty for the baseline page fetch.
    pub path: String,
    pub status: ProbeStatus,
    pub meta: Option<PageMeta>,
    pub response_time: Duration,
}

impl ProbeResult {
    pub fn status_code(&self) -> Option<u16> {
        match self.status {
            ProbeStatus::Http(code) => Some(code),
            ProbeStatus::TransportError(_) => None,
        }
    }

    /// 2xx and 3xx responses count as reachable content.
    pub fn is_reachable(&self) -> bool {
        matches!(self.status, ProbeStatus::Http(code) if (200..400).contains(&code))
    }

    /// 4xx and 5xx responses: the path exists in name only, or is denied.
    pub fn is_denied(&self) -> bool {
        matches!(self.status, ProbeStatus::Http(code) if code >= 400)
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self.status, ProbeStatus::TransportError(_))
    }
}

/// Everything learned about one visited target.
#[derive(Debug, Clone, Serialize)]
pub struct PageFindings {
    pub target: Target,
    /// Baseline probe first, then the common-path list in configured order.
    pub probes: Vec<ProbeResult>,
    pub robots: RobotsFindings,
}

/// Discovery edge: the page at `parent` linked to `child`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlEdge {
    pub parent: String,
    pub child: String,
}

/// Aggregate result of one crawl run, handed to presentation as-is.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    /// All targets in breadth-first discovery order, including terminal
    /// leaves that were recorded but never probed.
    pub visited: Vec<Target>,
    /// One entry per probed target, in dequeue order.
    pub findings: Vec<PageFindings>,
    pub edges: Vec<CrawlEdge>,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn findings_for(&self, canonical: &str) -> Option<&PageFindings> {
        self.findings
            .iter()
            .find(|f| f.target.canonical() == canonical)
    }
}

/// Accumulates per-target findings while the controller drains the frontier.
/// Pure assembly; the builder never touches the network.
pub struct ReportBuilder {
    seed: String,
    visited: Vec<Target>,
    findings: Vec<PageFindings>,
    edges: Vec<CrawlEdge>,
    started_at: DateTime<Utc>,
}

impl ReportBuilder {
    pub fn new(seed: &Target) -> Self {
        Self {
            seed: seed.canonical(),
            visited: Vec::new(),
            findings: Vec::new(),
            edges: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn record_visited(&mut self, target: &Target) {
        self.visited.push(target.clone());
    }

    pub fn record_findings(&mut self, findings: PageFindings) {
        self.findings.push(findings);
    }

    pub fn record_edge(&mut self, parent: &str, child: &str) {
        self.edges.push(CrawlEdge {
            parent: parent.to_string(),
            child: child.to_string(),
        });
    }

    pub fn finish(self, cancelled: bool) -> CrawlReport {
        CrawlReport {
            seed: self.seed,
            visited: self.visited,
            findings: self.findings,
            edges: self.edges,
            cancelled,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target;

    fn http_result(path: &str, code: u16) -> ProbeResult {
        ProbeResult {
            url: format!("http://exampleabc.onion{}", path),
            path: path.to_string(),
            status: ProbeStatus::Http(code),
            meta: None,
            response_time: Duration::from_millis(10),
        }
    }

    #[test]
    fn status_classification() {
        assert!(http_result("/", 200).is_reachable());
        assert!(http_result("/", 301).is_reachable());
        assert!(!http_result("/", 404).is_reachable());
        assert!(http_result("/admin/", 403).is_denied());
        assert!(http_result("/admin/", 500).is_denied());

        let failed = ProbeResult {
            url: "http://exampleabc.onion/".to_string(),
            path: String::new(),
            status: ProbeStatus::TransportError("request timed out".to_string()),
            meta: None,
            response_time: Duration::from_secs(15),
        };
        assert!(failed.is_transport_error());
        assert!(!failed.is_reachable());
        assert!(!failed.is_denied());
        assert_eq!(failed.status_code(), None);
    }

    #[test]
    fn builder_preserves_order() {
        let seed = target::resolve("http://exampleabc.onion/").unwrap();
        let mut builder = ReportBuilder::new(&seed);
        builder.record_visited(&seed);
        builder.record_findings(PageFindings {
            target: seed.clone(),
            probes: vec![http_result("", 200), http_result("/admin/", 404)],
            robots: RobotsFindings::new(),
        });
        builder.record_edge("http://exampleabc.onion", "http://exampleabc.onion/page2");

        let report = builder.finish(false);
        assert_eq!(report.seed, "http://exampleabc.onion");
        assert_eq!(report.visited.len(), 1);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.edges.len(), 1);
        assert!(!report.cancelled);
        assert!(report.finished_at >= report.started_at);
        assert!(report.findings_for("http://exampleabc.onion").is_some());
        assert!(report.findings_for("http://other.onion").is_none());
    }
}
