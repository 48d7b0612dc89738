//! Keyword monitoring pipeline
//!
//! - Proxy connectivity gate
//! - Per-site fetch through the proxy and keyword scan
//! - Run orchestration with a fixed pacing delay
//! - JSON result file and local alert notices

pub mod alert;
pub mod context;
pub mod fetcher;
pub mod proxy_check;
pub mod result_sink;
pub mod runner;
pub mod scanner;
pub mod text;
pub mod types;

pub use alert::{AlertNotice, AlertReporter};
pub use fetcher::{FetchError, FetchedPage, PageFetcher, ProxyFetcher};
pub use proxy_check::{ConnectivityCheck, ProxyCheck};
pub use result_sink::ResultSink;
pub use runner::MonitoringRun;
pub use scanner::SiteScanner;
pub use types::{Finding, RunOutcome, RunReport, SiteResult, SiteStatus, Target};
