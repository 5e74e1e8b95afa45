//! Browser session, page handles and elements
//!
//! A [`BrowserSession`] wraps one [`Driver`] (one isolated browser context).
//! [`PageHandle`] and [`Element`] are cheap clones that carry the session
//! with them, so page abstractions can hand out elements freely.

use std::sync::Arc;

use tracing::debug;

use crate::config::HarnessConfig;
use crate::driver::Driver;
use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;
use crate::protocol::{Command, PageId, MAIN_PAGE};

pub struct BrowserSession {
    driver: Box<dyn Driver>,
    config: Arc<HarnessConfig>,
}

impl BrowserSession {
    pub fn new(driver: Box<dyn Driver>, config: Arc<HarnessConfig>) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub async fn execute(&self, command: Command) -> E2eResult<serde_json::Value> {
        self.driver.execute(command).await
    }

    pub async fn close(&self) -> E2eResult<()> {
        self.driver.close().await
    }

    /// The page every context starts with
    pub fn main_page(self: &Arc<Self>) -> PageHandle {
        PageHandle {
            session: Arc::clone(self),
            id: MAIN_PAGE,
        }
    }
}

#[derive(Clone)]
pub struct PageHandle {
    session: Arc<BrowserSession>,
    id: PageId,
}

impl PageHandle {
    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn session(&self) -> &Arc<BrowserSession> {
        &self.session
    }

    pub fn config(&self) -> &HarnessConfig {
        self.session.config()
    }

    /// Bind a locator to this page. No browser interaction happens here.
    pub fn locate(&self, locator: Locator) -> Element {
        Element {
            page: self.clone(),
            locator,
        }
    }

    /// Navigate to a path relative to the configured base URL
    pub async fn goto(&self, path: &str) -> E2eResult<()> {
        let url = self.config().url(path);
        debug!(page = self.id, "goto {}", url);
        self.session
            .execute(Command::Goto {
                page: self.id,
                url,
                timeout_ms: self.config().timeouts.navigation_ms,
            })
            .await?;
        Ok(())
    }

    pub async fn press(&self, key: &str) -> E2eResult<()> {
        self.session
            .execute(Command::Press {
                page: self.id,
                key: key.to_string(),
            })
            .await?;
        Ok(())
    }

    pub async fn wait_for_load(&self) -> E2eResult<()> {
        self.session
            .execute(Command::WaitForLoad {
                page: self.id,
                timeout_ms: self.config().timeouts.navigation_ms,
            })
            .await?;
        Ok(())
    }
}

/// A locator bound to a page
#[derive(Clone)]
pub struct Element {
    page: PageHandle,
    locator: Locator,
}

impl Element {
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    fn action_timeout_ms(&self) -> u64 {
        self.page.config().timeouts.action_ms
    }

    pub async fn fill(&self, value: &str) -> E2eResult<()> {
        debug!("fill {} ({} chars)", self.locator, value.chars().count());
        self.page
            .session
            .execute(Command::Fill {
                page: self.page.id,
                locator: self.locator.clone(),
                value: value.to_string(),
                timeout_ms: self.action_timeout_ms(),
            })
            .await?;
        Ok(())
    }

    pub async fn click(&self) -> E2eResult<()> {
        debug!("click {}", self.locator);
        self.page
            .session
            .execute(Command::Click {
                page: self.page.id,
                locator: self.locator.clone(),
                timeout_ms: self.action_timeout_ms(),
            })
            .await?;
        Ok(())
    }

    /// Click and return the popup page the click opened
    pub async fn click_for_popup(&self) -> E2eResult<PageHandle> {
        debug!("click {} expecting popup", self.locator);
        let value = self
            .page
            .session
            .execute(Command::ClickForPopup {
                page: self.page.id,
                locator: self.locator.clone(),
                timeout_ms: self.action_timeout_ms(),
            })
            .await?;
        let id = value
            .as_u64()
            .and_then(|id| PageId::try_from(id).ok())
            .ok_or_else(|| E2eError::Protocol(format!("click_for_popup answered {}", value)))?;
        Ok(PageHandle {
            session: Arc::clone(&self.page.session),
            id,
        })
    }

    /// Visible right now, without waiting
    pub async fn is_visible(&self) -> E2eResult<bool> {
        let value = self
            .page
            .session
            .execute(Command::IsVisible {
                page: self.page.id,
                locator: self.locator.clone(),
            })
            .await?;
        value
            .as_bool()
            .ok_or_else(|| E2eError::Protocol(format!("is_visible answered {}", value)))
    }

    pub async fn attribute(&self, name: &str) -> E2eResult<Option<String>> {
        let value = self
            .page
            .session
            .execute(Command::GetAttribute {
                page: self.page.id,
                locator: self.locator.clone(),
                name: name.to_string(),
                timeout_ms: self.action_timeout_ms(),
            })
            .await?;
        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) => Ok(Some(s)),
            other => Err(E2eError::Protocol(format!("get_attribute answered {}", other))),
        }
    }
}
