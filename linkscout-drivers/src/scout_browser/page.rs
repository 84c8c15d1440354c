use crate::scout_browser::{
    cadence::Cadence,
    hardening::{EvasionScripts, HardeningProfile},
};
use anyhow::Result;
use fantoccini::key::Key;
use fantoccini::{elements::Element, Client, Locator};

/// High-level page wrapper providing paced navigation and element queries.
pub struct ScoutPage {
    pub(crate) client: Client,
    pub(crate) profile: HardeningProfile,
    pub(crate) cadence: Cadence,
}

impl ScoutPage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client, profile: HardeningProfile, cadence: Cadence) -> Self {
        Self {
            client,
            profile,
            cadence,
        }
    }

    /// Navigate to `url`, applying JS evasions for hardened sessions.
    pub async fn goto(&mut self, url: &str) -> Result<()> {
        self.cadence.random_delay(300, 1200).await;
        self.client.goto(url).await.map_err(anyhow::Error::from)?;

        if let HardeningProfile::Hardened = self.profile {
            self.client
                .execute(EvasionScripts::core(), vec![])
                .await?;
        }

        Ok(())
    }

    /// Find a single element by CSS selector, waiting for it to appear.
    pub async fn find_element(&self, selector: &str) -> Result<ScoutElement> {
        self.cadence.random_delay(100, 500).await;

        let element = self
            .client
            .wait()
            .for_element(Locator::Css(selector))
            .await?;
        Ok(ScoutElement::new(element, &self.cadence))
    }

    /// Find a single element by CSS selector without waiting; errors if it
    /// is not currently in the DOM.
    pub async fn find_element_now(&self, selector: &str) -> Result<ScoutElement> {
        let element = self.client.find(Locator::Css(selector)).await?;
        Ok(ScoutElement::new(element, &self.cadence))
    }

    /// Find zero or more elements by CSS selector.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<ScoutElement>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;

        Ok(elements
            .into_iter()
            .map(|element| ScoutElement::new(element, &self.cadence))
            .collect())
    }

    /// Click an element through injected script. Works where a native click
    /// is intercepted by overlays.
    pub async fn click_via_script(&self, element: &ScoutElement) -> Result<()> {
        let arg = serde_json::to_value(&element.element)?;
        self.client
            .execute("arguments[0].click();", vec![arg])
            .await?;
        Ok(())
    }
}

/// Wrapper for DOM elements with typed helpers consistent with [`ScoutPage`].
#[derive(Clone)]
pub struct ScoutElement {
    pub element: Element,
    pub cadence: Cadence,
}

impl ScoutElement {
    /// Construct an element wrapper.
    pub fn new(element: Element, cadence: &Cadence) -> Self {
        Self {
            element,
            cadence: cadence.clone(),
        }
    }

    /// Clear the element's current value.
    pub async fn clear(&self) -> Result<()> {
        self.element.clear().await.map_err(anyhow::Error::from)
    }

    /// Type into the element using human-like timings.
    pub async fn type_str(&self, text: &str) -> Result<()> {
        self.cadence
            .type_text_human_like(&self.element, text)
            .await
    }

    /// Send an Enter keypress to the element.
    pub async fn press_enter(&self) -> Result<()> {
        let enter: char = Key::Enter.into();
        self.element
            .send_keys(&enter.to_string())
            .await
            .map_err(anyhow::Error::from)
    }

    /// Read an attribute value.
    pub async fn attr(&self, attribute: &str) -> Result<Option<String>> {
        self.element
            .attr(attribute)
            .await
            .map_err(anyhow::Error::from)
    }
}
