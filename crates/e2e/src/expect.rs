//! Web-first assertions
//!
//! Assertions poll inside the driver until the expected state appears or
//! the timeout elapses. A miss becomes [`E2eError::AssertionFailed`].

use std::time::Duration;

use crate::config::{Destination, UrlPattern};
use crate::error::E2eResult;
use crate::protocol::Command;
use crate::session::{Element, PageHandle};

pub fn expect(element: &Element) -> ElementExpectation<'_> {
    ElementExpectation {
        element,
        negated: false,
        timeout: None,
    }
}

pub fn expect_page(page: &PageHandle) -> PageExpectation<'_> {
    PageExpectation { page, timeout: None }
}

pub struct ElementExpectation<'a> {
    element: &'a Element,
    negated: bool,
    timeout: Option<Duration>,
}

impl<'a> ElementExpectation<'a> {
    /// Invert the next assertion
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout
            .map(|t| t.as_millis() as u64)
            .unwrap_or(self.element.page().config().timeouts.expect_ms)
    }

    async fn run(&self, command: Command) -> E2eResult<()> {
        self.element.page().session().execute(command).await?;
        Ok(())
    }

    pub async fn to_be_visible(self) -> E2eResult<()> {
        self.run(Command::ExpectVisible {
            page: self.element.page().id(),
            locator: self.element.locator().clone(),
            negated: self.negated,
            timeout_ms: self.timeout_ms(),
        })
        .await
    }

    pub async fn to_have_attribute(self, name: &str, value: &str) -> E2eResult<()> {
        self.run(Command::ExpectAttribute {
            page: self.element.page().id(),
            locator: self.element.locator().clone(),
            name: name.to_string(),
            value: value.to_string(),
            negated: self.negated,
            timeout_ms: self.timeout_ms(),
        })
        .await
    }

    /// Current input value, as opposed to the `value` attribute
    pub async fn to_have_value(self, value: &str) -> E2eResult<()> {
        self.run(Command::ExpectValue {
            page: self.element.page().id(),
            locator: self.element.locator().clone(),
            value: value.to_string(),
            negated: self.negated,
            timeout_ms: self.timeout_ms(),
        })
        .await
    }
}

pub struct PageExpectation<'a> {
    page: &'a PageHandle,
    timeout: Option<Duration>,
}

impl<'a> PageExpectation<'a> {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn to_have_url(self, url: UrlPattern) -> E2eResult<()> {
        let timeout_ms = self
            .timeout
            .map(|t| t.as_millis() as u64)
            .unwrap_or(self.page.config().timeouts.navigation_ms);
        let url = url.resolve(&self.page.config().base_url);
        self.page
            .session()
            .execute(Command::ExpectUrl {
                page: self.page.id(),
                url,
                timeout_ms,
            })
            .await?;
        Ok(())
    }

    /// Assert the page landed on a named destination
    pub async fn to_be_at(self, destination: Destination) -> E2eResult<()> {
        let url = self.page.config().destination(destination);
        self.to_have_url(url).await
    }
}
