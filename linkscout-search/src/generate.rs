use crate::person::PersonRecord;
use linkscout_llm::traits::LlmClient;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, warn};

/// Pattern for reasoning annotations some models prepend to their output.
const REASONING_BLOCK: &str = r"(?s)<think>.*?</think>";

/// Turns a person record into an ordered sequence of search queries.
///
/// Queries are generated at most once per person: a record that already
/// carries a non-empty `query` list is reused verbatim. When the
/// text-generation call fails or returns nothing usable, the generator
/// falls back to a single `"<name> LinkedIn"` query rather than failing
/// the record.
pub struct QueryGenerator {
    llm: Arc<dyn LlmClient>,
    temperature: f32,
}

/// How the queries for a record were obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The record already carried a non-empty query list.
    Reused(Vec<String>),
    /// Fresh queries from the text-generation endpoint.
    Generated(Vec<String>),
    /// The deterministic single-query fallback.
    Fallback { queries: Vec<String>, reason: String },
}

impl QueryOutcome {
    pub fn into_queries(self) -> Vec<String> {
        match self {
            QueryOutcome::Reused(queries) => queries,
            QueryOutcome::Generated(queries) => queries,
            QueryOutcome::Fallback { queries, .. } => queries,
        }
    }
}

/// The one unrecoverable generation failure: the LLM path produced nothing
/// and the record has no name to build the fallback query from.
#[derive(Debug, thiserror::Error)]
#[error("record has no name to fall back on ({reason})")]
pub struct UnusableRecord {
    pub reason: String,
}

impl QueryGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    /// Resolve the queries for one record: reuse, generate, or fall back.
    pub async fn plan(&self, person: &PersonRecord) -> Result<QueryOutcome, UnusableRecord> {
        if let Some(existing) = person.existing_queries() {
            info!(
                name = person.name_text(),
                count = existing.len(),
                "reusing existing queries"
            );
            return Ok(QueryOutcome::Reused(existing.to_vec()));
        }

        let prompt = build_prompt(person);
        match self
            .llm
            .generate(&prompt, None, None, Some(self.temperature))
            .await
        {
            Ok(response) => {
                let queries = parse_queries(&response.text);
                if queries.is_empty() {
                    self.fallback(person, "model returned no usable lines".to_string())
                } else {
                    info!(
                        name = person.name_text(),
                        count = queries.len(),
                        "generated queries"
                    );
                    Ok(QueryOutcome::Generated(queries))
                }
            }
            Err(err) => self.fallback(person, err.to_string()),
        }
    }

    fn fallback(
        &self,
        person: &PersonRecord,
        reason: String,
    ) -> Result<QueryOutcome, UnusableRecord> {
        let name = person.name_text();
        if name.trim().is_empty() {
            return Err(UnusableRecord { reason });
        }
        warn!(name, %reason, "query generation failed; using fallback query");
        Ok(QueryOutcome::Fallback {
            queries: vec![format!("{name} LinkedIn")],
            reason,
        })
    }
}

/// The instruction prompt sent for one person.
fn build_prompt(person: &PersonRecord) -> String {
    let social = person
        .social_profile
        .as_deref()
        .unwrap_or(&[])
        .join(", ");

    format!(
        r#"You are a search engine assistant. Based on the details below, generate *5 distinct, focused search queries* to help locate this person online, specifically on platforms like LinkedIn.
Each query should be tailored with different combinations of details to increase the chance of finding the right match.

Use the following guidelines:
1. Query with full name and intro.
2. Query with name only.
3. Query with name and all available details.
4. Query with name and timezone.
5. Query with intro and everything else except the name.

Add the word "LinkedIn" to all queries to focus the search.

Person Details:
- Full Name: {name}
- Intro / Bio: {intro}
- Timezone / Location: {timezone}
- Industry: {industry}
- Company Size: {size}
- Known Social Profiles: {social}

Only return the 5 queries, each on a new line, without numbering or extra explanation.
"#,
        name = person.name_text(),
        intro = person.intro.as_deref().unwrap_or(""),
        timezone = person.timezone.as_deref().unwrap_or(""),
        industry = person.company_industry.as_deref().unwrap_or(""),
        size = person.company_size.as_deref().unwrap_or(""),
        social = social,
    )
}

/// Strip reasoning annotations, then split into trimmed non-empty lines.
fn parse_queries(raw: &str) -> Vec<String> {
    let stripped = Regex::new(REASONING_BLOCK)
        .map(|re| re.replace_all(raw, "").into_owned())
        .unwrap_or_else(|_| raw.to_string());

    stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubLlm;
    use std::sync::atomic::Ordering;

    fn jane() -> PersonRecord {
        PersonRecord {
            name: Some("Jane Doe".into()),
            intro: Some("VP Sales".into()),
            timezone: Some("PST".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn existing_queries_are_reused_without_an_llm_call() {
        let stub = Arc::new(StubLlm::replying("should never be used"));
        let generator = QueryGenerator::new(stub.clone(), 0.7);

        let mut person = jane();
        person.query = Some(vec!["Jane Doe VP Sales LinkedIn".into()]);

        let outcome = generator.plan(&person).await.unwrap();
        assert_eq!(
            outcome,
            QueryOutcome::Reused(vec!["Jane Doe VP Sales LinkedIn".to_string()])
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn response_lines_become_queries_in_order() {
        let stub = Arc::new(StubLlm::replying(
            "<think>let me think about this person</think>\nq one\n\n  q two  \nq three\nq four\nq five",
        ));
        let generator = QueryGenerator::new(stub.clone(), 0.7);

        let outcome = generator.plan(&jane()).await.unwrap();
        assert_eq!(
            outcome,
            QueryOutcome::Generated(vec![
                "q one".to_string(),
                "q two".to_string(),
                "q three".to_string(),
                "q four".to_string(),
                "q five".to_string(),
            ])
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn llm_failure_falls_back_to_name_query() {
        let stub = Arc::new(StubLlm::failing("endpoint unreachable"));
        let generator = QueryGenerator::new(stub, 0.7);

        let outcome = generator.plan(&jane()).await.unwrap();
        match outcome {
            QueryOutcome::Fallback { queries, reason } => {
                assert_eq!(queries, vec!["Jane Doe LinkedIn".to_string()]);
                assert!(reason.contains("endpoint unreachable"));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_response_falls_back_to_name_query() {
        let stub = Arc::new(StubLlm::replying("<think>only reasoning, no queries</think>\n\n"));
        let generator = QueryGenerator::new(stub, 0.7);

        let outcome = generator.plan(&jane()).await.unwrap();
        assert!(matches!(outcome, QueryOutcome::Fallback { ref queries, .. }
            if queries == &vec!["Jane Doe LinkedIn".to_string()]));
    }

    #[tokio::test]
    async fn nameless_record_with_failing_llm_is_unusable() {
        let stub = Arc::new(StubLlm::failing("down"));
        let generator = QueryGenerator::new(stub, 0.7);

        let err = generator.plan(&PersonRecord::default()).await.unwrap_err();
        assert!(err.reason.contains("down"));
    }

    #[test]
    fn prompt_embeds_person_details() {
        let prompt = build_prompt(&PersonRecord {
            name: Some("Jane Doe".into()),
            intro: Some("VP Sales".into()),
            timezone: Some("PST".into()),
            company_industry: Some("SaaS".into()),
            company_size: Some("51-200".into()),
            social_profile: Some(vec!["https://x.com/jane".into()]),
            ..Default::default()
        });

        assert!(prompt.contains("Jane Doe"));
        assert!(prompt.contains("VP Sales"));
        assert!(prompt.contains("PST"));
        assert!(prompt.contains("SaaS"));
        assert!(prompt.contains("51-200"));
        assert!(prompt.contains("https://x.com/jane"));
        assert!(prompt.contains("LinkedIn"));
    }

    #[test]
    fn multiple_reasoning_blocks_are_stripped() {
        let queries =
            parse_queries("<think>a</think>first\n<think>b\nmore</think>\nsecond");
        assert_eq!(queries, vec!["first".to_string(), "second".to_string()]);
    }
}
