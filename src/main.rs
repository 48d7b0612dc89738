use onion_watch::config::AppConfig;
use onion_watch::shutdown::shutdown_signal;
use onion_watch::utils::logging::init_logging;

#[tokio::main]
async fn main() {
    // 1. Environment
    dotenvy::dotenv().ok();

    // 2. Logging
    init_logging();

    // 3. Configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return;
        }
    };

    tracing::info!(output = %config.output_path.display(), "Dark web OSINT monitoring");

    // 4. Run until done or interrupted
    let task = tokio::spawn(async move { onion_watch::monitor(&config).await });

    tokio::select! {
        joined = task => match joined {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Unexpected error"),
            Err(e) => tracing::error!(error = %e, "Monitoring task failed"),
        },
        signal = shutdown_signal() => {
            tracing::warn!(signal = %signal, "Monitoring interrupted by user");
        }
    }
}
