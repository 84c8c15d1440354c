use crate::browser::SearchBrowser;
use crate::pacing::Pacer;
use crate::session::SearchSession;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Throttle between consecutive queries for the same person, applied after
/// failures too.
const INTER_QUERY_PAUSE_MS: (u64, u64) = (3_000, 6_000);

/// Runs every query for one person and unions the results.
///
/// A failed query contributes nothing and is logged; it never aborts the
/// person or drops URLs already collected from other queries.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    session: SearchSession,
}

impl ResultAggregator {
    pub fn new(session: SearchSession) -> Self {
        Self { session }
    }

    /// Sequentially search every query, returning the sorted union of all
    /// profile URLs found.
    pub async fn collect<B, P>(&self, browser: &mut B, pacer: &P, queries: &[String]) -> Vec<String>
    where
        B: SearchBrowser,
        P: Pacer,
    {
        let mut all = BTreeSet::new();

        for query in queries {
            info!(%query, "searching");
            match self.session.run(browser, pacer, query).await {
                Ok(urls) => {
                    info!(%query, found = urls.len(), "query finished");
                    all.extend(urls);
                }
                Err(err) => {
                    warn!(%query, error = %err, "search failed; continuing with next query");
                }
            }
            pacer
                .pause(INTER_QUERY_PAUSE_MS.0, INTER_QUERY_PAUSE_MS.1)
                .await;
        }

        all.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::NoopPacer;
    use crate::session::PROFILE_PREFIX;
    use crate::testing::FakeBrowser;

    fn profile(slug: &str) -> String {
        format!("{PROFILE_PREFIX}{slug}")
    }

    #[tokio::test]
    async fn unions_overlapping_results_across_queries() {
        let mut browser = FakeBrowser::with_pages(vec![]);
        browser
            .per_query
            .insert("first".into(), vec![vec![profile("a"), profile("b")]]);
        browser
            .per_query
            .insert("second".into(), vec![vec![profile("b"), profile("c")]]);

        let aggregator = ResultAggregator::new(SearchSession::new(15));
        let urls = aggregator
            .collect(
                &mut browser,
                &NoopPacer,
                &["first".to_string(), "second".to_string()],
            )
            .await;

        assert_eq!(urls, vec![profile("a"), profile("b"), profile("c")]);
    }

    #[tokio::test]
    async fn one_failing_query_does_not_drop_the_others() {
        let mut browser = FakeBrowser::with_pages(vec![]);
        browser
            .per_query
            .insert("good".into(), vec![vec![profile("kept")]]);
        browser
            .per_query
            .insert("late".into(), vec![vec![profile("also-kept")]]);
        browser.fail_submits.insert("bad".to_string());

        let aggregator = ResultAggregator::new(SearchSession::new(15));
        let urls = aggregator
            .collect(
                &mut browser,
                &NoopPacer,
                &["good".to_string(), "bad".to_string(), "late".to_string()],
            )
            .await;

        // All three queries were attempted, in order.
        assert_eq!(browser.submitted, vec!["good", "bad", "late"]);
        assert_eq!(urls, vec![profile("also-kept"), profile("kept")]);
    }

    #[tokio::test]
    async fn no_queries_means_no_results() {
        let mut browser = FakeBrowser::with_pages(vec![]);
        let aggregator = ResultAggregator::new(SearchSession::new(15));
        let urls = aggregator.collect(&mut browser, &NoopPacer, &[]).await;
        assert!(urls.is_empty());
        assert_eq!(browser.opened, 0);
    }
}
