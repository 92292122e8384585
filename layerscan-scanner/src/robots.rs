use crate::target::Target;
use crate::transport::Transport;
use std::collections::BTreeSet;
use tracing::debug;

/// Paths the service asks crawlers to stay out of. For reconnaissance these
/// are findings in their own right.
pub type RobotsFindings = BTreeSet<String>;

/// Fetch and parse the exclusion file at the root of `base`'s host.
///
/// A missing, unreachable, or non-200 robots.txt yields an empty set; this
/// never fails the crawl.
pub async fn fetch_robots(transport: &dyn Transport, base: &Target) -> RobotsFindings {
    let url = match base.url.join("/robots.txt") {
        Ok(url) => url.to_string(),
        Err(_) => return RobotsFindings::new(),
    };

    match transport.fetch(&url).await {
        Ok(response) if response.status == 200 => parse_robots(&response.body),
        Ok(response) => {
            debug!("robots.txt at {} returned {}", url, response.status);
            RobotsFindings::new()
        }
        Err(err) => {
            debug!("could not fetch {}: {}", url, err);
            RobotsFindings::new()
        }
    }
}

/// Line-oriented parse of robots.txt, keeping only `Disallow:` values.
/// Malformed lines are skipped individually; one bad line never poisons the
/// rest of the file.
pub fn parse_robots(content: &str) -> RobotsFindings {
    let mut disallowed = RobotsFindings::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((directive, value)) = line.split_once(':') else {
            continue;
        };
        if directive.trim().eq_ignore_ascii_case("disallow") {
            let value = value.trim();
            if !value.is_empty() {
                disallowed.insert(value.to_string());
            }
        }
    }

    disallowed
}
