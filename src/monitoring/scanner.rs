//! Per-site fetch and keyword scan

use crate::monitoring::context;
use crate::monitoring::fetcher::{FetchError, SharedFetcher};
use crate::monitoring::text::extract_text;
use crate::monitoring::types::{Finding, SiteResult, SiteStatus, Target};
use tracing::{info, instrument, warn};

/// Fetches one target and records which keywords its text contains.
///
/// Every failure is folded into the returned `SiteResult`; nothing escapes.
pub struct SiteScanner {
    fetcher: SharedFetcher,
    context_radius: usize,
}

impl SiteScanner {
    pub fn new(fetcher: SharedFetcher, context_radius: usize) -> Self {
        Self {
            fetcher,
            context_radius,
        }
    }

    #[instrument(skip(self, target, keywords), fields(site = %target.name, url = %target.url))]
    pub async fn scan(&self, target: &Target, keywords: &[String]) -> SiteResult {
        let mut result = SiteResult::started(target);
        info!("Scraping site");

        let page = match self.fetcher.fetch(&target.url).await {
            Ok(page) => page,
            Err(FetchError::Timeout) => {
                warn!("Timeout connecting to site");
                result.status = SiteStatus::Timeout;
                return result;
            }
            Err(FetchError::Connection(reason)) => {
                warn!(reason = %reason, "Connection failed");
                result.status = SiteStatus::ConnectionError;
                return result;
            }
            Err(FetchError::Other(message)) => {
                warn!(error = %message, "Fetch error");
                result.status = SiteStatus::Other(message);
                return result;
            }
        };

        if page.status != 200 {
            warn!(status = page.status, "HTTP error");
            result.status = SiteStatus::Http(page.status);
            return result;
        }

        let text = extract_text(&page.body);
        result.found_keywords = self.find_keywords(&text, keywords);

        if result.found_keywords.is_empty() {
            info!("No keywords found");
        }

        result
    }

    /// Test each keyword, in order, against already-lowercased page text
    pub fn find_keywords(&self, text: &str, keywords: &[String]) -> Vec<Finding> {
        keywords
            .iter()
            .filter_map(|keyword| {
                let needle = keyword.to_lowercase();
                if !text.contains(&needle) {
                    return None;
                }
                info!(keyword = %keyword, "Found keyword");
                Some(Finding {
                    keyword: keyword.clone(),
                    context: context::extract(text, &needle, self.context_radius),
                })
            })
            .collect()
    }
}
