use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/layerscan/";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Scan configuration, loaded once at startup and passed into the engine.
/// Unknown or missing fields fall back to defaults so old config files keep
/// working across releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// SOCKS5h proxy endpoint; Tor listens on 127.0.0.1:9050 by default.
    pub proxy_host: String,
    pub proxy_port: u16,
    pub timeout_secs: u64,
    /// Maximum crawl depth; 0 probes the seed page only.
    pub max_depth: usize,
    /// Concurrent path probes per target.
    pub concurrency: usize,
    /// Conventionally sensitive paths checked on every visited target.
    pub common_paths: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            proxy_host: "127.0.0.1".to_string(),
            proxy_port: 9050,
            timeout_secs: 15,
            max_depth: 1,
            concurrency: 4,
            common_paths: default_common_paths(),
        }
    }
}

pub fn default_common_paths() -> Vec<String> {
    [
        "/admin/",
        "/login.php",
        "/panel/",
        "/dashboard/",
        "/config.php",
        "/.env",
        "/phpinfo.php",
        "/test.php",
        "/backup.zip",
        "/sitemap.xml",
        "/.git/config",
        "/.svn/entries",
        "/README.md",
        "/index.php.bak",
        "/.htaccess",
        "/wp-admin/",
        "/wp-login.php",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl ScanConfig {
    /// Read a config file, falling back to defaults when the file is absent
    /// or unparseable. A broken file is reported, never fatal.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!("loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!(
                        "could not parse {}: {}; using defaults",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!("no configuration at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the default configuration, creating parent directories.
    pub fn write_default(path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&Self::default())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.proxy_host.trim().is_empty() {
            return Err("proxy_host must not be empty".to_string());
        }
        if self.proxy_port == 0 {
            return Err("proxy_port must be non-zero".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Default location of the config file, tilde-expanded.
pub fn default_config_path() -> PathBuf {
    config_path_in(DEFAULT_CONFIG_DIR)
}

/// Config file path inside a user-supplied directory, tilde-expanded.
pub fn config_path_in(dir: &str) -> PathBuf {
    let expanded = shellexpand::tilde(dir);
    Path::new(expanded.as_ref()).join(CONFIG_FILE_NAME)
}

/// Expand a user-supplied path to a config file itself.
pub fn expand_config_path(path: &str) -> PathBuf {
    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}
