//! Data model for a monitoring run
//!
//! The JSON shape of `SiteResult` is the output file format:
//! `site`, `url`, `timestamp`, `found_keywords`, `status`, in that order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A configured site to scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub url: String,
    /// Display name
    pub name: String,
}

impl Target {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// A single keyword match with surrounding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub keyword: String,
    pub context: String,
}

/// Outcome of fetching one target
///
/// Rendered as the legacy status strings in the output file:
/// `success`, `HTTP <code>`, `timeout`, `connection_error`, `error: <message>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SiteStatus {
    Success,
    Http(u16),
    Timeout,
    ConnectionError,
    Other(String),
}

impl SiteStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, SiteStatus::Success)
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteStatus::Success => write!(f, "success"),
            SiteStatus::Http(code) => write!(f, "HTTP {}", code),
            SiteStatus::Timeout => write!(f, "timeout"),
            SiteStatus::ConnectionError => write!(f, "connection_error"),
            SiteStatus::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized site status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for SiteStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(SiteStatus::Success),
            "timeout" => Ok(SiteStatus::Timeout),
            "connection_error" => Ok(SiteStatus::ConnectionError),
            _ => {
                if let Some(code) = s.strip_prefix("HTTP ") {
                    return code
                        .parse()
                        .map(SiteStatus::Http)
                        .map_err(|_| ParseStatusError(s.to_string()));
                }
                if let Some(msg) = s.strip_prefix("error: ") {
                    return Ok(SiteStatus::Other(msg.to_string()));
                }
                Err(ParseStatusError(s.to_string()))
            }
        }
    }
}

impl From<SiteStatus> for String {
    fn from(status: SiteStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for SiteStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Outcome record for one target in one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteResult {
    pub site: String,
    pub url: String,
    /// ISO 8601 time the scan started
    pub timestamp: String,
    pub found_keywords: Vec<Finding>,
    pub status: SiteStatus,
}

impl SiteResult {
    /// Start a result for `target`, stamped with the current time
    pub fn started(target: &Target) -> Self {
        Self {
            site: target.name.clone(),
            url: target.url.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            found_keywords: Vec::new(),
            status: SiteStatus::Success,
        }
    }

    pub fn has_findings(&self) -> bool {
        !self.found_keywords.is_empty()
    }
}

/// All site results of one invocation, in target order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunReport {
    pub results: Vec<SiteResult>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: SiteResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SiteResult> {
        self.results.iter()
    }
}

impl From<Vec<SiteResult>> for RunReport {
    fn from(results: Vec<SiteResult>) -> Self {
        Self { results }
    }
}

/// How a monitoring run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every target was scanned
    Completed(RunReport),
    /// The proxy could not be confirmed; no target was contacted
    ProxyUnavailable,
}
