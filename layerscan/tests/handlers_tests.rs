use layerscan::handlers::{effective_config, render_report};
use layerscan_core::config::ScanConfig;
use layerscan_scanner::report::{PageFindings, ProbeResult, ProbeStatus, ReportBuilder};
use layerscan_scanner::robots::RobotsFindings;
use layerscan_scanner::target;
use std::time::Duration;

#[test]
fn effective_config_applies_flag_overrides() {
    let config = effective_config(ScanConfig::default(), Some(3), Some(30), Some(8));
    assert_eq!(config.max_depth, 3);
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.concurrency, 8);
}

#[test]
fn effective_config_keeps_loaded_values_without_flags() {
    let mut loaded = ScanConfig::default();
    loaded.max_depth = 2;
    loaded.timeout_secs = 25;

    let config = effective_config(loaded.clone(), None, None, None);
    assert_eq!(config, loaded);
}

fn tiny_report() -> layerscan_scanner::report::CrawlReport {
    let seed = target::resolve("http://exampleabc.onion/").unwrap();
    let mut builder = ReportBuilder::new(&seed);
    builder.record_visited(&seed);
    builder.record_findings(PageFindings {
        target: seed.clone(),
        probes: vec![ProbeResult {
            url: "http://exampleabc.onion/".to_string(),
            path: String::new(),
            status: ProbeStatus::Http(200),
            meta: None,
            response_time: Duration::from_millis(42),
        }],
        robots: RobotsFindings::new(),
    });
    builder.finish(false)
}

#[test]
fn render_report_text_format() {
    let rendered = render_report(&tiny_report(), "text").unwrap();
    assert!(rendered.contains("Scan of http://exampleabc.onion"));
    assert!(rendered.contains("Targets visited: 1"));
}

#[test]
fn render_report_json_format() {
    let rendered = render_report(&tiny_report(), "json").unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["seed"], "http://exampleabc.onion");
}

#[test]
fn render_report_rejects_unknown_formats() {
    let result = render_report(&tiny_report(), "xml");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("unknown report format"));
}
