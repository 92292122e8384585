use crate::error::Result;
use crate::links::extract_links;
use crate::probe::probe;
use crate::report::{CrawlReport, PageFindings, ReportBuilder};
use crate::robots::fetch_robots;
use crate::target::{self, Target};
use crate::transport::Transport;
use futures::StreamExt;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::join;
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Breadth-first crawl controller.
///
/// Owns the frontier and the visited set for the duration of one crawl; the
/// probe, robots, and link-extraction helpers are pure functions of their
/// inputs, so path probes can run concurrently without shared state. Results
/// are reported in frontier order no matter how the probes interleave.
pub struct Crawler {
    transport: Arc<dyn Transport>,
    max_depth: usize,
    common_paths: Vec<String>,
    concurrency: usize,
    progress_callback: Option<ProgressCallback>,
    cancel: Arc<AtomicBool>,
}

impl Crawler {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            max_depth: 1,
            common_paths: Vec::new(),
            concurrency: 4,
            progress_callback: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Maximum link-traversal distance from the seed. Targets at exactly this
    /// depth are still probed; only their links are not followed.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_common_paths(mut self, paths: Vec<String>) -> Self {
        self.common_paths = paths;
        self
    }

    /// Upper bound on concurrent path probes against one target.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Flipping the returned flag stops the crawl at the next frontier
    /// dequeue; whatever completed so far still comes back as a report.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Run one crawl from `seed` to completion, cancellation, or an empty
    /// frontier. The only fatal error is a seed that fails to resolve; every
    /// per-target failure is absorbed into the report as a finding.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlReport> {
        let seed = target::resolve(seed)?;
        info!(
            "starting crawl of {} (max depth {})",
            seed.canonical(),
            self.max_depth
        );

        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<Target> = VecDeque::new();
        let mut builder = ReportBuilder::new(&seed);

        visited.insert(seed.canonical());
        frontier.push_back(seed);

        loop {
            if self.cancel.load(Ordering::Relaxed) {
                warn!(
                    "crawl cancelled, dropping {} pending targets",
                    frontier.len()
                );
                return Ok(builder.finish(true));
            }

            let Some(current) = frontier.pop_front() else {
                break;
            };
            let canonical = current.canonical();
            builder.record_visited(&current);

            if current.depth > self.max_depth {
                debug!("{} is beyond the depth limit, recorded as a leaf", canonical);
                continue;
            }

            if let Some(ref callback) = self.progress_callback {
                callback(canonical.clone());
            }
            debug!("probing {} (depth {})", canonical, current.depth);

            let (findings, baseline_body) = self.inspect(&current).await;

            // Expand only targets strictly inside the depth limit; pages at
            // the limit are probed but their links are not followed.
            if current.depth < self.max_depth
                && let Some(ref body) = baseline_body
            {
                for link in extract_links(&current, body) {
                    let child = link.canonical();
                    if visited.insert(child.clone()) {
                        debug!("queued {} at depth {}", child, link.depth);
                        builder.record_edge(&canonical, &child);
                        frontier.push_back(link);
                    }
                }
            }

            builder.record_findings(findings);
        }

        let report = builder.finish(false);
        info!(
            "crawl complete: {} targets visited, {} edges",
            report.visited.len(),
            report.edges.len()
        );
        Ok(report)
    }

    /// Probe the baseline page plus every configured common path, and fetch
    /// robots.txt alongside. The buffered stream caps in-flight requests at
    /// `concurrency` while keeping results in probe order, baseline first.
    async fn inspect(&self, current: &Target) -> (PageFindings, Option<String>) {
        let mut paths: Vec<&str> = Vec::with_capacity(self.common_paths.len() + 1);
        paths.push("");
        paths.extend(self.common_paths.iter().map(String::as_str));

        let transport = self.transport.as_ref();
        let probes = async {
            futures::stream::iter(paths.into_iter().map(|path| probe(transport, current, path)))
                .buffered(self.concurrency)
                .collect::<Vec<_>>()
                .await
        };
        let robots = fetch_robots(transport, current);
        let (outcomes, robots) = join!(probes, robots);

        let mut baseline_body = None;
        let mut results = Vec::with_capacity(outcomes.len());
        for (index, (result, body)) in outcomes.into_iter().enumerate() {
            if index == 0 && result.is_reachable() {
                baseline_body = body;
            }
            results.push(result);
        }

        (
            PageFindings {
                target: current.clone(),
                probes: results,
                robots,
            },
            baseline_body,
        )
    }
}
