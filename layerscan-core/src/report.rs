// Rendering of crawl reports for terminal display and export

use chrono::{DateTime, Utc};
use colored::Colorize;
use layerscan_scanner::report::{CrawlReport, PageFindings, ProbeResult, ProbeStatus};
use std::fs;
use std::path::Path;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Render a crawl report as colored terminal text: a summary block followed
/// by one section per probed target.
pub fn generate_text_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    let reachable: usize = report
        .findings
        .iter()
        .flat_map(|f| f.probes.iter())
        .filter(|p| p.is_reachable())
        .count();
    let denied: usize = report
        .findings
        .iter()
        .flat_map(|f| f.probes.iter())
        .filter(|p| p.is_denied())
        .count();
    let failed: usize = report
        .findings
        .iter()
        .flat_map(|f| f.probes.iter())
        .filter(|p| p.is_transport_error())
        .count();
    let robots_total: usize = report.findings.iter().map(|f| f.robots.len()).sum();

    out.push_str(&format!("{}\n\n", DIVIDER));
    out.push_str(&format!("# Scan of {}\n", report.seed));
    out.push_str(&format!(
        "  Started:  {}\n",
        format_timestamp(&report.started_at)
    ));
    out.push_str(&format!(
        "  Finished: {}{}\n\n",
        format_timestamp(&report.finished_at),
        if report.cancelled {
            " (interrupted)"
        } else {
            ""
        }
    ));

    out.push_str("# Summary:\n");
    out.push_str(&format!("  Targets visited: {}\n", report.visited.len()));
    out.push_str(&format!("  Targets probed: {}\n", report.findings.len()));
    out.push_str(&format!("  Reachable paths: {}\n", reachable));
    out.push_str(&format!("  Denied or missing paths: {}\n", denied));
    out.push_str(&format!("  Transport failures: {}\n", failed));
    out.push_str(&format!("  Robots exclusions: {}\n", robots_total));
    out.push_str(&format!("  Link edges: {}\n", report.edges.len()));
    out.push_str(&format!("\n{}\n\n", DIVIDER));

    for findings in &report.findings {
        out.push_str(&render_target(report, findings));
        out.push('\n');
    }

    out
}

fn render_target(report: &CrawlReport, findings: &PageFindings) -> String {
    let mut section = String::new();
    let canonical = findings.target.canonical();

    section.push_str(&format!(
        "## {} (depth {})\n",
        canonical, findings.target.depth
    ));

    for probe in &findings.probes {
        section.push_str(&probe_line(probe));
        section.push('\n');
    }

    if !findings.robots.is_empty() {
        section.push_str("  robots.txt disallows:\n");
        for path in &findings.robots {
            section.push_str(&format!("    {}\n", path));
        }
    }

    let children: Vec<&str> = report
        .edges
        .iter()
        .filter(|e| e.parent == canonical)
        .map(|e| e.child.as_str())
        .collect();
    if !children.is_empty() {
        section.push_str("  links out:\n");
        for child in children {
            section.push_str(&format!("    -> {}\n", child));
        }
    }

    section
}

fn probe_line(probe: &ProbeResult) -> String {
    let path = if probe.path.is_empty() {
        "/"
    } else {
        probe.path.as_str()
    };

    match &probe.status {
        ProbeStatus::Http(code) => {
            let status = match code {
                200..=299 => code.to_string().green().bold(),
                300..=399 => code.to_string().cyan(),
                400..=499 => code.to_string().yellow(),
                _ => code.to_string().red(),
            };
            let mut line = format!("  {} {}", status, path);
            if let Some(ref meta) = probe.meta {
                if let Some(ref title) = meta.title {
                    line.push_str(&format!(" \"{}\"", title));
                }
                if let Some(ref server) = meta.server {
                    line.push_str(&format!(" [{}]", server));
                }
                if let Some(length) = meta.content_length {
                    line.push_str(&format!(" ({} bytes)", length));
                }
                if meta.directory_listing {
                    line.push_str(&format!(" {}", "directory listing".red().bold()));
                }
            }
            line
        }
        ProbeStatus::TransportError(reason) => {
            format!("  {} {} {}", "ERR".red().bold(), path, reason.dimmed())
        }
    }
}

/// Pretty JSON export of the full report for downstream tooling.
pub fn generate_json_report(report: &CrawlReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|e| format!("could not serialize report: {}", e))
}

pub fn write_report(path: &Path, contents: &str) -> Result<(), String> {
    fs::write(path, contents)
        .map_err(|e| format!("could not write report to {}: {}", path.display(), e))
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
