use crate::scout_browser::{
    cadence::Cadence,
    hardening::{build_chrome_arguments, AgentPool, HardeningProfile},
    page::ScoutPage,
};
use anyhow::Result;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client that owns the one
/// browser session used for an entire run.
pub struct ScoutDriver {
    pub client: Client,
    cadence: Cadence,
    profile: HardeningProfile,
}

impl ScoutDriver {
    /// Connect to a running WebDriver service (chromedriver) and start a
    /// Chrome session with the given hardening profile. A desktop identity
    /// is picked from the agent pool and kept for the session's lifetime.
    pub async fn connect(
        webdriver_url: &str,
        headless: bool,
        profile: HardeningProfile,
    ) -> Result<Self> {
        let mut pool = AgentPool::new();
        let agent = pool.session_profile().clone();

        let mut args = build_chrome_arguments(&profile, &agent);
        if headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }

        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(args));

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;

        tracing::info!(webdriver_url, headless, "browser session started");

        Ok(Self {
            client,
            cadence: Cadence::new(),
            profile,
        })
    }

    /// Return a [`ScoutPage`] sharing this driver's session.
    pub fn page(&self) -> ScoutPage {
        ScoutPage::new(
            self.client.clone(),
            self.profile.clone(),
            self.cadence.clone(),
        )
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
