use crate::browser::SearchBrowser;
use async_trait::async_trait;
use linkscout_common::Result;
use linkscout_drivers::scout_browser::{driver::ScoutDriver, page::ScoutPage};
use tracing::{debug, trace};

const SEARCH_URL: &str = "https://duckduckgo.com/";

// DOM contract for the results page.
const QUERY_INPUT: &str = r#"input[name="q"]"#;
const RESULT_TITLE_ANCHOR: &str = r#"a[data-testid="result-title-a"]"#;
const MORE_RESULTS_BUTTON: &str = "#more-results";

/// [`SearchBrowser`] backed by a live DuckDuckGo tab.
///
/// Owns the driver for the whole run; one instance is one browsing session.
pub struct DuckDuckGoBrowser {
    driver: ScoutDriver,
    page: ScoutPage,
}

impl DuckDuckGoBrowser {
    pub fn new(driver: ScoutDriver) -> Self {
        let page = driver.page();
        Self { driver, page }
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> anyhow::Result<()> {
        self.driver.close().await
    }
}

#[async_trait]
impl SearchBrowser for DuckDuckGoBrowser {
    async fn open_search_page(&mut self) -> Result<()> {
        self.page.goto(SEARCH_URL).await?;
        Ok(())
    }

    async fn submit_query(&mut self, query: &str) -> Result<()> {
        let input = self.page.find_element(QUERY_INPUT).await?;
        input.clear().await?;
        input.type_str(query).await?;
        input.press_enter().await?;
        Ok(())
    }

    async fn result_links(&mut self) -> Result<Vec<String>> {
        let anchors = self.page.find_elements(RESULT_TITLE_ANCHOR).await?;
        let mut hrefs = Vec::with_capacity(anchors.len());
        for anchor in anchors {
            if let Some(href) = anchor.attr("href").await? {
                trace!(%href, "result link");
                hrefs.push(href);
            }
        }
        Ok(hrefs)
    }

    async fn load_more(&mut self) -> Result<bool> {
        let button = match self.page.find_element_now(MORE_RESULTS_BUTTON).await {
            Ok(button) => button,
            Err(err) => {
                debug!(error = %err, "no more-results control");
                return Ok(false);
            }
        };
        match self.page.click_via_script(&button).await {
            Ok(()) => Ok(true),
            Err(err) => {
                debug!(error = %err, "more-results control not clickable");
                Ok(false)
            }
        }
    }
}
