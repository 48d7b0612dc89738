use crate::config::ConfigError;

/// Application-wide error type
///
/// Per-target fetch failures never become an `AppError`; they are folded into
/// `SiteStatus` by the scanner. This type covers the failures that stop a run
/// or that the caller has to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("proxy not confirmed: {0}")]
    ProxyNotConfirmed(String),
}

impl AppError {
    pub fn proxy_not_confirmed(msg: impl Into<String>) -> Self {
        AppError::ProxyNotConfirmed(msg.into())
    }
}
