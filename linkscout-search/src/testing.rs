//! In-memory fakes shared by the unit tests.

use crate::browser::SearchBrowser;
use anyhow::anyhow;
use async_trait::async_trait;
use linkscout_common::{Result, ScoutError};
use linkscout_llm::traits::{LlmClient, LlmResponse};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted [`SearchBrowser`]: serves canned result pages, counts every
/// interaction, and can be told to fail specific submissions.
pub(crate) struct FakeBrowser {
    /// Pages served when no per-query override exists.
    pub pages: Vec<Vec<String>>,
    /// Per-query page overrides, keyed by submitted query text.
    pub per_query: HashMap<String, Vec<Vec<String>>>,
    /// Queries whose submission errors.
    pub fail_submits: HashSet<String>,
    /// Report the pagination control clickable forever.
    pub always_more: bool,

    pub opened: usize,
    pub submitted: Vec<String>,
    pub scans: usize,
    pub more_clicks: usize,

    active: Vec<Vec<String>>,
    scan_index: usize,
}

impl FakeBrowser {
    pub fn with_pages(pages: Vec<Vec<String>>) -> Self {
        Self {
            pages,
            per_query: HashMap::new(),
            fail_submits: HashSet::new(),
            always_more: false,
            opened: 0,
            submitted: Vec::new(),
            scans: 0,
            more_clicks: 0,
            active: Vec::new(),
            scan_index: 0,
        }
    }
}

#[async_trait]
impl SearchBrowser for FakeBrowser {
    async fn open_search_page(&mut self) -> Result<()> {
        self.opened += 1;
        Ok(())
    }

    async fn submit_query(&mut self, query: &str) -> Result<()> {
        self.submitted.push(query.to_string());
        if self.fail_submits.contains(query) {
            return Err(ScoutError::Browser(anyhow!("submit failed for {query}")));
        }
        self.active = self
            .per_query
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.pages.clone());
        self.scan_index = 0;
        Ok(())
    }

    async fn result_links(&mut self) -> Result<Vec<String>> {
        self.scans += 1;
        let links = self.active.get(self.scan_index).cloned().unwrap_or_default();
        self.scan_index += 1;
        Ok(links)
    }

    async fn load_more(&mut self) -> Result<bool> {
        self.more_clicks += 1;
        if self.always_more {
            return Ok(true);
        }
        Ok(self.scan_index < self.active.len())
    }
}

/// Scripted [`LlmClient`] that always answers (or always fails) and counts
/// how often it was called.
pub(crate) struct StubLlm {
    reply: std::result::Result<String, String>,
    pub calls: AtomicUsize,
}

impl StubLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn generate(
        &self,
        _prompt: &str,
        _system_prompt: Option<&str>,
        _max_tokens: Option<u32>,
        _temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(LlmResponse {
                text: text.clone(),
                model: None,
                tokens_used: None,
            }),
            Err(message) => Err(ScoutError::Generation(message.clone())),
        }
    }
}
