use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use layerscan_core::config::{self, ScanConfig};
use layerscan_core::report::{generate_json_report, generate_text_report, write_report};
use layerscan_scanner::Crawler;
use layerscan_scanner::crawler::ProgressCallback;
use layerscan_scanner::report::CrawlReport;
use layerscan_scanner::transport::TorTransport;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Merge CLI flag overrides into the loaded configuration.
pub fn effective_config(
    mut config: ScanConfig,
    depth: Option<usize>,
    timeout: Option<u64>,
    concurrency: Option<usize>,
) -> ScanConfig {
    if let Some(depth) = depth {
        config.max_depth = depth;
    }
    if let Some(timeout) = timeout {
        config.timeout_secs = timeout;
    }
    if let Some(concurrency) = concurrency {
        config.concurrency = concurrency;
    }
    config
}

/// Render the report in the requested output format.
pub fn render_report(report: &CrawlReport, format: &str) -> Result<String, String> {
    match format {
        "json" => generate_json_report(report),
        "text" => Ok(generate_text_report(report)),
        other => Err(format!("unknown report format '{}'", other)),
    }
}

pub async fn handle_scan(args: &ArgMatches) -> Result<()> {
    init_tracing(args.get_flag("verbose"));

    let url = args.get_one::<String>("URL").unwrap();
    let config_path = match args.get_one::<String>("config") {
        Some(path) => config::expand_config_path(path),
        None => config::default_config_path(),
    };
    let config = effective_config(
        ScanConfig::load(&config_path),
        args.get_one::<usize>("depth").copied(),
        args.get_one::<u64>("timeout").copied(),
        args.get_one::<usize>("concurrency").copied(),
    );
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {}", e))?;

    println!(
        "\n{} {} (max depth {})",
        "Scanning".bright_cyan().bold(),
        url,
        config.max_depth
    );
    println!(
        "Proxy: socks5h://{}:{}  Timeout: {}s  Paths per target: {}\n",
        config.proxy_host,
        config.proxy_port,
        config.timeout_secs,
        config.common_paths.len() + 1
    );

    let transport = TorTransport::new(&config.proxy_host, config.proxy_port, config.timeout_secs)
        .context("failed to build the proxied HTTP client")?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("connecting through the proxy...");

    let spinner_clone = spinner.clone();
    let progress: ProgressCallback = Arc::new(move |url: String| {
        spinner_clone.set_message(format!("probing {}", url));
    });

    let crawler = Crawler::new(Arc::new(transport))
        .with_max_depth(config.max_depth)
        .with_common_paths(config.common_paths.clone())
        .with_concurrency(config.concurrency)
        .with_progress_callback(progress);

    // Ctrl-C stops the crawl at the next dequeue; partial results still print.
    let cancel = crawler.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let report = crawler.crawl(url).await?;
    spinner.finish_and_clear();

    if report.cancelled {
        println!(
            "{}",
            "Scan interrupted; reporting partial results.".yellow().bold()
        );
    }

    let format = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let rendered = render_report(&report, format).map_err(|e| anyhow!(e))?;

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            write_report(path, &rendered).map_err(|e| anyhow!(e))?;
            println!(
                "{} Report written to {}",
                "✓".green().bold(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    print_divider();
    println!("{}", "  LAYERSCAN INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let dir = args.get_one::<String>("PATH").unwrap();
    let force = args.get_flag("force");
    let config_path = config::config_path_in(dir);

    println!(
        "{} Target: {}",
        "→".blue(),
        config_path.display().to_string().bright_white()
    );

    if config_path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("A configuration file already exists and will be overwritten.");
        let response = print_prompt("Do you want to continue? [y/N]:");
        if response != "y" && response != "yes" {
            println!("\nInitialization cancelled.");
            return Ok(());
        }
    }

    ScanConfig::write_default(&config_path)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    println!(
        "{} Default configuration written to {}",
        "✓".green().bold(),
        config_path.display()
    );
    println!(
        "{}",
        "Adjust proxy settings and common_paths to taste.".dimmed()
    );
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush().unwrap();
    let mut response = String::new();
    io::stdin().read_line(&mut response).unwrap();
    response.trim().to_lowercase()
}
