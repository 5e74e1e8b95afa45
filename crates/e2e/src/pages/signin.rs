use tracing::info;

use super::{field_error_icon, Navigable, PageObject};
use crate::error::E2eResult;
use crate::locator::Locator;
use crate::session::{Element, PageHandle};

/// Two-step sign in: email, continue, then password
#[derive(Clone)]
pub struct SigninPage {
    page: PageHandle,
}

impl PageObject for SigninPage {
    fn bind(page: PageHandle) -> Self {
        Self { page }
    }

    fn page(&self) -> &PageHandle {
        &self.page
    }
}

impl Navigable for SigninPage {
    const PATH: &'static str = "/sign-in";
}

impl SigninPage {
    pub fn email_textbox(&self) -> Element {
        self.page.locate(Locator::by_role("textbox", "Email address*"))
    }

    pub fn continue_button(&self) -> Element {
        self.page.locate(Locator::by_role("button", "Continue"))
    }

    pub fn password_textbox(&self) -> Element {
        self.page.locate(Locator::by_role("textbox", "Password (required)"))
    }

    pub fn sign_in_button(&self) -> Element {
        self.page.locate(Locator::by_role("button", "Sign in to Ramp"))
    }

    pub fn sign_up_link(&self) -> Element {
        self.page.locate(Locator::css("[data-test-id=\"sign-up-link\"]"))
    }

    pub fn use_a_different_email_link(&self) -> Element {
        self.page.locate(Locator::css("[data-test-id=\"use-a-different-email-link\"]"))
    }

    pub fn reset_password_link(&self) -> Element {
        self.page.locate(Locator::by_role("link", "Reset password"))
    }

    pub fn email_error_icon(&self) -> Element {
        self.page.locate(field_error_icon("email"))
    }

    pub fn password_error_icon(&self) -> Element {
        self.page.locate(field_error_icon("password"))
    }

    pub async fn enter_email(&self, email: &str) -> E2eResult<()> {
        self.email_textbox().fill(email).await
    }

    pub async fn enter_password(&self, password: &str) -> E2eResult<()> {
        self.password_textbox().fill(password).await
    }

    pub async fn click_continue(&self) -> E2eResult<()> {
        self.continue_button().click().await
    }

    pub async fn click_sign_in(&self) -> E2eResult<()> {
        self.sign_in_button().click().await
    }

    /// The sign-up link opens in a new tab; returns that tab
    pub async fn click_sign_up_link(&self) -> E2eResult<PageHandle> {
        self.sign_up_link().click_for_popup().await
    }

    pub async fn use_a_different_email(&self) -> E2eResult<()> {
        self.use_a_different_email_link().click().await
    }

    pub async fn reset_password(&self) -> E2eResult<()> {
        self.reset_password_link().click().await
    }

    pub async fn signin_user(&self, email: &str, password: &str) -> E2eResult<()> {
        info!("Signing in {}", email);
        self.enter_email(email).await?;
        self.click_continue().await?;
        self.enter_password(password).await?;
        self.click_sign_in().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::driver::testing::RecordingDriver;
    use crate::protocol::Command;
    use crate::session::BrowserSession;
    use std::sync::Arc;

    fn signin(driver: RecordingDriver) -> SigninPage {
        let session = Arc::new(BrowserSession::new(Box::new(driver), Arc::new(HarnessConfig::default())));
        SigninPage::bind(session.main_page())
    }

    #[tokio::test]
    async fn test_signin_user_is_fixed_sequence() {
        let (driver, recording) = RecordingDriver::new();
        let page = signin(driver);

        page.signin_user("aa@aa.com", "password0029").await.unwrap();

        assert_eq!(recording.ops(), vec!["fill", "click", "fill", "click"]);
        let commands = recording.commands();
        match (&commands[0], &commands[2]) {
            (Command::Fill { value: email, .. }, Command::Fill { value: password, locator, .. }) => {
                assert_eq!(email, "aa@aa.com");
                assert_eq!(password, "password0029");
                assert_eq!(locator, page.password_textbox().locator());
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signin_user_stops_when_continue_fails() {
        let (driver, recording) = RecordingDriver::new();
        let page = signin(driver.fail_at(1));

        assert!(page.signin_user("a@b.com", "pw").await.is_err());
        assert_eq!(recording.ops(), vec!["fill", "click"]);
    }

    #[tokio::test]
    async fn test_goto_opens_sign_in_path() {
        let (driver, recording) = RecordingDriver::new();
        signin(driver).goto().await.unwrap();

        assert!(matches!(
            &recording.commands()[0],
            Command::Goto { url, .. } if url.ends_with("/sign-in")
        ));
    }
}
