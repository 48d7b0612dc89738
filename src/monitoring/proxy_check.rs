//! Anonymizing proxy verification
//!
//! Asks a check endpoint (Tor Project's `api/ip` by default), reached through
//! the proxy, whether the request arrived over Tor. The endpoint answers with
//! `{"IsTor": bool, "IP": "<exit address>"}`.

use crate::config::AppConfig;
use crate::monitoring::fetcher::build_client;
use crate::utils::AppError;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Exit node reported by the check endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitNode {
    pub ip: Option<String>,
}

/// Connectivity gate run before any target is contacted
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ConnectivityCheck: Send + Sync {
    /// True only when the proxy is confirmed active
    async fn verify(&self) -> bool;
}

/// Shared connectivity check handle
pub type SharedCheck = Arc<dyn ConnectivityCheck>;

/// Checks the proxy against the configured endpoint. No retries.
#[derive(Debug, Clone)]
pub struct ProxyCheck {
    client: reqwest::Client,
    check_url: String,
}

impl ProxyCheck {
    pub fn new(client: reqwest::Client, check_url: impl Into<String>) -> Self {
        Self {
            client,
            check_url: check_url.into(),
        }
    }

    /// Build from configuration: proxy, 30s default timeout, check URL
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let client = build_client(
            config.proxy_url.as_deref(),
            config.check_timeout,
            &config.user_agent,
        )?;
        Ok(Self::new(client, config.check_url.clone()))
    }

    /// Query the check endpoint and report why the proxy is not confirmed
    pub async fn probe(&self) -> Result<ExitNode, AppError> {
        let body = self
            .client
            .get(&self.check_url)
            .send()
            .await?
            .text()
            .await?;

        Self::parse_check_response(&body)
    }

    /// Interpret a check endpoint body
    pub fn parse_check_response(body: &str) -> Result<ExitNode, AppError> {
        let data: Value = serde_json::from_str(body)?;

        match data.get("IsTor").and_then(Value::as_bool) {
            Some(true) => Ok(ExitNode {
                ip: data.get("IP").and_then(Value::as_str).map(str::to_string),
            }),
            Some(false) => Err(AppError::proxy_not_confirmed(
                "endpoint reports the request did not arrive over Tor",
            )),
            None => Err(AppError::proxy_not_confirmed(
                "response has no boolean IsTor flag",
            )),
        }
    }
}

#[async_trait::async_trait]
impl ConnectivityCheck for ProxyCheck {
    #[instrument(skip(self), fields(check_url = %self.check_url))]
    async fn verify(&self) -> bool {
        match self.probe().await {
            Ok(exit) => {
                info!(
                    exit_ip = exit.ip.as_deref().unwrap_or("<unknown>"),
                    "Tor connection established"
                );
                true
            }
            Err(AppError::ProxyNotConfirmed(reason)) => {
                warn!(reason = %reason, "Not connected through Tor");
                false
            }
            Err(e) => {
                warn!(error = %e, "Error checking Tor connection");
                false
            }
        }
    }
}
