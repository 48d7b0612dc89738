use crate::monitoring::Target;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PROXY_URL: &str = "socks5h://127.0.0.1:9050";
pub const DEFAULT_CHECK_URL: &str = "https://check.torproject.org/api/ip";
pub const DEFAULT_OUTPUT_PATH: &str = "monitoring_results.json";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_REQUEST_DELAY_SECS: u64 = 5;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONTEXT_RADIUS: usize = 150;

const DEFAULT_KEYWORDS: [&str; 5] = [
    "data breach",
    "leaked database",
    "credentials",
    "ransomware",
    "exploit",
];

fn default_targets() -> Vec<Target> {
    vec![
        Target::new(
            "http://vetrisvmxszntuk4rv4fx5t7gvph5mfny2wunkfzegcjgwia4upnatyd.onion/",
            "Example Forum",
        ),
        Target::new("http://example2.onion", "Example Marketplace"),
    ]
}

/// Monitoring configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Forward proxy applied to HTTP and HTTPS traffic. `None` means direct.
    pub proxy_url: Option<String>,
    pub check_url: String,
    pub targets: Vec<Target>,
    pub keywords: Vec<String>,
    pub output_path: PathBuf,
    pub user_agent: String,
    pub request_delay: Duration,
    pub fetch_timeout: Duration,
    pub check_timeout: Duration,
    pub context_radius: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy_url: Some(DEFAULT_PROXY_URL.to_string()),
            check_url: DEFAULT_CHECK_URL.to_string(),
            targets: default_targets(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_delay: Duration::from_secs(DEFAULT_REQUEST_DELAY_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            check_timeout: Duration::from_secs(DEFAULT_CHECK_TIMEOUT_SECS),
            context_radius: DEFAULT_CONTEXT_RADIUS,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to the built-in defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(proxy) = lookup("MONITOR_PROXY_URL") {
            let proxy = proxy.trim();
            config.proxy_url = if proxy.is_empty() || proxy.eq_ignore_ascii_case("none") {
                tracing::warn!("MONITOR_PROXY_URL disables the proxy, requests go out directly");
                None
            } else {
                Some(proxy.to_string())
            };
        }

        if let Some(check_url) = lookup("MONITOR_CHECK_URL") {
            config.check_url = check_url;
        }

        if let Some(path) = lookup("MONITOR_TARGETS_FILE") {
            config.targets = load_targets_file(Path::new(&path))?;
        }

        if let Some(raw) = lookup("MONITOR_KEYWORDS") {
            config.keywords = parse_keywords(&raw);
        }

        if let Some(path) = lookup("MONITOR_OUTPUT_PATH") {
            config.output_path = PathBuf::from(path);
        }

        if let Some(agent) = lookup("MONITOR_USER_AGENT") {
            config.user_agent = agent;
        }

        if let Some(raw) = lookup("MONITOR_REQUEST_DELAY_SECS") {
            config.request_delay = Duration::from_secs(parse_number(
                "MONITOR_REQUEST_DELAY_SECS",
                &raw,
            )?);
        }

        if let Some(raw) = lookup("MONITOR_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout = Duration::from_secs(parse_number(
                "MONITOR_FETCH_TIMEOUT_SECS",
                &raw,
            )?);
        }

        if let Some(raw) = lookup("MONITOR_CHECK_TIMEOUT_SECS") {
            config.check_timeout = Duration::from_secs(parse_number(
                "MONITOR_CHECK_TIMEOUT_SECS",
                &raw,
            )?);
        }

        if let Some(raw) = lookup("MONITOR_CONTEXT_RADIUS") {
            config.context_radius = parse_number("MONITOR_CONTEXT_RADIUS", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::EmptyTargets);
        }
        if self.keywords.is_empty() {
            return Err(ConfigError::EmptyKeywords);
        }
        Ok(())
    }
}

fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}

fn load_targets_file(path: &Path) -> Result<Vec<Target>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::TargetsFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("Could not load targets file {path}: {reason}")]
    TargetsFile { path: String, reason: String },
    #[error("No targets configured")]
    EmptyTargets,
    #[error("No keywords configured")]
    EmptyKeywords,
}
