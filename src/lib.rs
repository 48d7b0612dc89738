pub mod config;
pub mod monitoring;
pub mod shutdown;
pub mod utils;

use config::AppConfig;
use monitoring::{AlertReporter, MonitoringRun, ResultSink, RunOutcome};
use tracing::{info, warn};
use utils::AppError;

/// Run one full monitoring pass: check, scan, save, alert.
///
/// Returns the outcome so the caller can tell an aborted run from a
/// completed one. Save failures are logged and do not skip alerting.
pub async fn monitor(config: &AppConfig) -> Result<RunOutcome, AppError> {
    let run = MonitoringRun::from_config(config)?;
    let outcome = run.run(&config.targets, &config.keywords).await;

    match &outcome {
        RunOutcome::Completed(report) => {
            ResultSink::save(report, &config.output_path);
            let alerts = AlertReporter::notify(report);
            info!(
                sites = report.len(),
                alerts = alerts,
                finished_at = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                "Monitoring complete"
            );
        }
        RunOutcome::ProxyUnavailable => {
            warn!("Please ensure Tor is running: sudo systemctl start tor");
        }
    }

    Ok(outcome)
}
