use async_trait::async_trait;
use linkscout_common::Result;

/// The search-engine capability the session state machine drives.
///
/// One implementor wraps one live browser session; the whole run shares a
/// single instance. The contract mirrors the four interactions the search
/// loop needs and nothing else, so the loop can be tested against an
/// in-memory fake.
#[async_trait]
pub trait SearchBrowser: Send {
    /// Load the search engine's landing page.
    async fn open_search_page(&mut self) -> Result<()>;

    /// Type `query` into the search box and submit it.
    async fn submit_query(&mut self, query: &str) -> Result<()>;

    /// Every result link currently rendered, in page order. Non-result
    /// links are fine; filtering is the caller's job.
    async fn result_links(&mut self) -> Result<Vec<String>>;

    /// Trigger the "more results" control. Returns `false` when the control
    /// is absent or not clickable — the expected end of pagination, not an
    /// error.
    async fn load_more(&mut self) -> Result<bool>;
}
