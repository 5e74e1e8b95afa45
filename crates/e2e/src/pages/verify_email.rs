use super::PageObject;
use crate::locator::Locator;
use crate::session::{Element, PageHandle};

/// Landing page after a successful signup. Reached only by redirect.
#[derive(Clone)]
pub struct VerifyEmailPage {
    page: PageHandle,
}

impl PageObject for VerifyEmailPage {
    fn bind(page: PageHandle) -> Self {
        Self { page }
    }

    fn page(&self) -> &PageHandle {
        &self.page
    }
}

impl VerifyEmailPage {
    pub fn header(&self) -> Element {
        self.page.locate(Locator::by_role("heading", "Verify your email"))
    }

    pub fn search_in_email_link(&self) -> Element {
        self.page.locate(Locator::by_role("link", "Search for verify your Ramp"))
    }

    pub fn resend_email_button(&self) -> Element {
        self.page.locate(Locator::by_role("button", "Re-send Email"))
    }

    /// The address the verification mail was sent to
    pub fn email_display(&self, email: &str) -> Element {
        self.page.locate(Locator::by_text(email))
    }
}
