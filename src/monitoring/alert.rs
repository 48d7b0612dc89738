//! Keyword alerts
//!
//! Emits a local notice for every site with findings. Dispatch to an
//! external channel (email, webhook, SMS) is not implemented; `notify` is the
//! place to add one.

use crate::monitoring::types::{RunReport, SiteResult};
use tracing::warn;

/// One alert: the site and the keywords matched on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertNotice {
    pub site: String,
    pub url: String,
    pub keywords: Vec<String>,
}

impl AlertNotice {
    fn from_result(result: &SiteResult) -> Self {
        Self {
            site: result.site.clone(),
            url: result.url.clone(),
            keywords: result
                .found_keywords
                .iter()
                .map(|f| f.keyword.clone())
                .collect(),
        }
    }

    pub fn headline(&self) -> String {
        format!("ALERT: Keywords found on {}", self.site)
    }
}

pub struct AlertReporter;

impl AlertReporter {
    /// Select the sites that need an alert, in report order
    pub fn notices(report: &RunReport) -> Vec<AlertNotice> {
        report
            .iter()
            .filter(|r| r.has_findings())
            .map(AlertNotice::from_result)
            .collect()
    }

    /// Emit one log event per notice and return how many were emitted
    pub fn notify(report: &RunReport) -> usize {
        let notices = Self::notices(report);
        for notice in &notices {
            warn!(
                site = %notice.site,
                url = %notice.url,
                keywords = ?notice.keywords,
                "{}",
                notice.headline()
            );
        }
        notices.len()
    }
}
