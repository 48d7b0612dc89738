//! Logging initialization
//!
//! Human-readable console output by default. Set `LOG_FORMAT=json` for
//! structured JSON lines with RFC 3339 UTC timestamps.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info,onion_watch=debug";

/// Initialize the global tracing subscriber.
///
/// The level is taken from `RUST_LOG` (default `info,onion_watch=debug`).
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_current_span(true)
                    .flatten_event(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init()
    };

    if let Err(err) = result {
        // Detect "already initialized" via source downcasting
        use std::error::Error;
        if err
            .source()
            .and_then(|s| s.downcast_ref::<tracing::dispatcher::SetGlobalDefaultError>())
            .is_none()
        {
            eprintln!("Failed to initialize tracing: {}", err);
        }
    }
}
