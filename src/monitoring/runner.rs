//! Monitoring run orchestration
//!
//! Connectivity gate first, then each target in order with a fixed pause
//! after every scan (the last one included).

use crate::config::AppConfig;
use crate::monitoring::fetcher::ProxyFetcher;
use crate::monitoring::proxy_check::{ProxyCheck, SharedCheck};
use crate::monitoring::scanner::SiteScanner;
use crate::monitoring::types::{RunOutcome, RunReport, Target};
use crate::utils::AppError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

pub struct MonitoringRun {
    check: SharedCheck,
    scanner: SiteScanner,
    request_delay: Duration,
}

impl MonitoringRun {
    pub fn new(check: SharedCheck, scanner: SiteScanner, request_delay: Duration) -> Self {
        Self {
            check,
            scanner,
            request_delay,
        }
    }

    /// Wire the proxy check and proxy fetcher described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let check = ProxyCheck::from_config(config)?;
        let fetcher = ProxyFetcher::from_config(config)?;
        Ok(Self::new(
            Arc::new(check),
            SiteScanner::new(Arc::new(fetcher), config.context_radius),
            config.request_delay,
        ))
    }

    /// Scan every target, or none if the proxy is not confirmed.
    ///
    /// A failing target is recorded in its `SiteResult` and never stops the
    /// remaining iteration.
    pub async fn run(&self, targets: &[Target], keywords: &[String]) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let span = info_span!("monitoring_run", run_id = %run_id);

        async {
            if !self.check.verify().await {
                warn!("Proxy not confirmed, aborting run before contacting any target");
                return RunOutcome::ProxyUnavailable;
            }

            info!(
                sites = targets.len(),
                keywords = keywords.len(),
                started_at = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                "Monitoring started"
            );

            let mut report = RunReport::new();
            for target in targets {
                let result = self.scanner.scan(target, keywords).await;
                info!(site = %result.site, status = %result.status, "Site scanned");
                report.push(result);

                tokio::time::sleep(self.request_delay).await;
            }

            RunOutcome::Completed(report)
        }
        .instrument(span)
        .await
    }
}
