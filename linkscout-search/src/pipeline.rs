use crate::aggregate::ResultAggregator;
use crate::browser::SearchBrowser;
use crate::generate::{QueryGenerator, QueryOutcome};
use crate::pacing::Pacer;
use crate::person::PersonRecord;
use linkscout_common::RecordPolicy;
use tracing::{info, warn};

/// Pause between people, emulating one unhurried operator.
const INTER_PERSON_PAUSE_MS: (u64, u64) = (3_000, 6_000);

/// Processes every person record through query generation and search
/// aggregation, owning the single browser session for the whole run.
pub struct Pipeline<B, P> {
    browser: B,
    pacer: P,
    generator: QueryGenerator,
    aggregator: ResultAggregator,
    policy: RecordPolicy,
}

impl<B, P> Pipeline<B, P>
where
    B: SearchBrowser,
    P: Pacer,
{
    pub fn new(
        browser: B,
        pacer: P,
        generator: QueryGenerator,
        aggregator: ResultAggregator,
        policy: RecordPolicy,
    ) -> Self {
        Self {
            browser,
            pacer,
            generator,
            aggregator,
            policy,
        }
    }

    /// Run the whole input through the pipeline. Failures degrade per
    /// record or per query; this never aborts the run.
    pub async fn run(&mut self, records: Vec<PersonRecord>) -> Vec<PersonRecord> {
        let total = records.len();
        let mut output = Vec::with_capacity(total);

        for (index, mut person) in records.into_iter().enumerate() {
            let name = person.name_text().to_string();
            info!(index, total, %name, "processing person");

            let queries = match self.generator.plan(&person).await {
                Ok(outcome) => {
                    if let QueryOutcome::Fallback { ref reason, .. } = outcome {
                        info!(%name, %reason, "continuing with fallback query");
                    }
                    outcome.into_queries()
                }
                Err(err) => {
                    match self.policy {
                        RecordPolicy::Skip => {
                            warn!(index, %name, error = %err, "skipping record");
                        }
                        RecordPolicy::IncludeWithNulls => {
                            warn!(index, %name, error = %err, "keeping record with null results");
                            output.push(person);
                        }
                    }
                    continue;
                }
            };

            person.query = Some(queries.clone());

            let results = self
                .aggregator
                .collect(&mut self.browser, &self.pacer, &queries)
                .await;
            info!(%name, found = results.len(), "person finished");
            person.search_results = Some(results);

            output.push(person);
            self.pacer
                .pause(INTER_PERSON_PAUSE_MS.0, INTER_PERSON_PAUSE_MS.1)
                .await;
        }

        output
    }

    /// Give the browser session back so the caller can close it.
    pub fn into_browser(self) -> B {
        self.browser
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::NoopPacer;
    use crate::session::SearchSession;
    use crate::testing::{FakeBrowser, StubLlm};
    use std::sync::Arc;

    fn pipeline_with(
        browser: FakeBrowser,
        llm: Arc<StubLlm>,
        policy: RecordPolicy,
    ) -> Pipeline<FakeBrowser, NoopPacer> {
        Pipeline::new(
            browser,
            NoopPacer,
            QueryGenerator::new(llm, 0.7),
            ResultAggregator::new(SearchSession::new(15)),
            policy,
        )
    }

    fn jane() -> PersonRecord {
        serde_json::from_str(
            r#"{"name": "Jane Doe", "intro": "VP Sales", "timezone": "PST",
                "company_industry": "", "company_size": "", "social_profile": []}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn enriches_a_record_end_to_end() {
        // Every query returns one matching and one non-matching link.
        let browser = FakeBrowser::with_pages(vec![vec![
            "https://www.linkedin.com/in/janedoe".to_string(),
            "https://example.com/x".to_string(),
        ]]);
        let llm = Arc::new(StubLlm::replying("q1\nq2\nq3\nq4\nq5"));

        let mut pipeline = pipeline_with(browser, llm, RecordPolicy::Skip);
        let output = pipeline.run(vec![jane()]).await;

        assert_eq!(output.len(), 1);
        let record = &output[0];
        assert_eq!(
            record.query.as_deref().unwrap(),
            ["q1", "q2", "q3", "q4", "q5"]
        );
        assert_eq!(
            record.search_results.as_deref().unwrap(),
            ["https://www.linkedin.com/in/janedoe"]
        );
        assert!(record.image.is_none());

        // Serialized form keeps the full ordered schema with image null.
        let json = serde_json::to_string(record).unwrap();
        assert!(json.contains("\"image\":null"));
        assert!(json.starts_with("{\"name\":\"Jane Doe\",\"image\":null,"));
    }

    #[tokio::test]
    async fn one_person_failure_does_not_affect_the_next() {
        let mut browser = FakeBrowser::with_pages(vec![vec![
            "https://www.linkedin.com/in/found".to_string(),
        ]]);
        // Every query the first person runs fails at submission.
        browser.fail_submits.insert("cached bad query".to_string());

        let llm = Arc::new(StubLlm::replying("fresh query"));
        let mut pipeline = pipeline_with(browser, llm, RecordPolicy::Skip);

        let mut first = jane();
        first.query = Some(vec!["cached bad query".to_string()]);
        let mut second = jane();
        second.name = Some("John Roe".to_string());

        let output = pipeline.run(vec![first, second]).await;

        assert_eq!(output.len(), 2);
        assert!(output[0].search_results.as_deref().unwrap().is_empty());
        assert_eq!(
            output[1].search_results.as_deref().unwrap(),
            ["https://www.linkedin.com/in/found"]
        );
    }

    #[tokio::test]
    async fn unusable_record_is_skipped_under_skip_policy() {
        let browser = FakeBrowser::with_pages(vec![]);
        let llm = Arc::new(StubLlm::failing("endpoint down"));
        let mut pipeline = pipeline_with(browser, llm, RecordPolicy::Skip);

        let nameless = PersonRecord::default();
        let output = pipeline.run(vec![nameless, jane()]).await;

        // The nameless record disappears; Jane survives on her fallback query.
        assert_eq!(output.len(), 1);
        assert_eq!(
            output[0].query.as_deref().unwrap(),
            ["Jane Doe LinkedIn"]
        );
    }

    #[tokio::test]
    async fn unusable_record_is_kept_null_under_include_policy() {
        let browser = FakeBrowser::with_pages(vec![]);
        let llm = Arc::new(StubLlm::failing("endpoint down"));
        let mut pipeline = pipeline_with(browser, llm, RecordPolicy::IncludeWithNulls);

        let output = pipeline.run(vec![PersonRecord::default()]).await;

        assert_eq!(output.len(), 1);
        assert!(output[0].query.is_none());
        assert!(output[0].search_results.is_none());

        let json = serde_json::to_string(&output[0]).unwrap();
        assert!(json.ends_with("\"query\":null,\"search_results\":null}"));
    }

    #[tokio::test]
    async fn reused_queries_never_touch_the_llm() {
        let browser = FakeBrowser::with_pages(vec![]);
        let llm = Arc::new(StubLlm::replying("should not be called"));
        let mut pipeline = pipeline_with(browser, llm.clone(), RecordPolicy::Skip);

        let mut person = jane();
        person.query = Some(vec!["kept as-is".to_string()]);
        let output = pipeline.run(vec![person]).await;

        assert_eq!(output[0].query.as_deref().unwrap(), ["kept as-is"]);
        assert_eq!(llm.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
