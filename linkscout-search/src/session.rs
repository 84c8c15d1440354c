use crate::browser::SearchBrowser;
use crate::pacing::Pacer;
use linkscout_common::Result;
use std::collections::BTreeSet;
use tracing::debug;

/// Only links starting with this prefix count as profile results.
pub const PROFILE_PREFIX: &str = "https://www.linkedin.com/in/";

/// Hard ceiling on pagination, whatever the "more results" control claims.
const PAGE_CAP: u32 = 10;

// Pacing, in milliseconds. The wide landing pause is the main
// anti-detection measure; the fixed settles give results time to render.
const LANDING_PAUSE_MS: (u64, u64) = (4_000, 15_000);
const RESULTS_RENDER_MS: u64 = 3_000;
const SCAN_SETTLE_MS: u64 = 5_000;
const NEXT_PAGE_PAUSE_MS: (u64, u64) = (3_000, 5_000);

/// One paginated search-and-extract cycle for a single query.
///
/// Drives the browser through NAVIGATE → SUBMIT → COLLECT → CONTINUE until
/// the result set is full, the page cap is hit, or pagination runs out.
#[derive(Debug, Clone)]
pub struct SearchSession {
    max_results: usize,
}

impl SearchSession {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    /// Execute `query` and return up to `max_results` distinct profile URLs.
    ///
    /// An empty result is a valid outcome, not an error. Browser failures
    /// propagate to the caller, which handles them per-query.
    pub async fn run<B, P>(&self, browser: &mut B, pacer: &P, query: &str) -> Result<Vec<String>>
    where
        B: SearchBrowser,
        P: Pacer,
    {
        browser.open_search_page().await?;
        pacer.pause(LANDING_PAUSE_MS.0, LANDING_PAUSE_MS.1).await;

        browser.submit_query(query).await?;
        pacer.settle(RESULTS_RENDER_MS).await;

        let mut urls = BTreeSet::new();
        let mut page = 1u32;

        while urls.len() < self.max_results && page <= PAGE_CAP {
            debug!(page, collected = urls.len(), "scanning result page");

            for href in browser.result_links().await? {
                if urls.len() >= self.max_results {
                    break;
                }
                if href.starts_with(PROFILE_PREFIX) {
                    urls.insert(href);
                }
            }
            pacer.settle(SCAN_SETTLE_MS).await;

            if !browser.load_more().await? {
                debug!(page, "pagination exhausted");
                break;
            }
            page += 1;
            pacer
                .pause(NEXT_PAGE_PAUSE_MS.0, NEXT_PAGE_PAUSE_MS.1)
                .await;
        }

        Ok(urls.into_iter().collect())
    }
}
