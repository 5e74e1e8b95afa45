use tracing::info;

use super::{field_error_icon, Navigable, PageObject};
use crate::catalog::PasswordRequirement;
use crate::data::Credentials;
use crate::error::E2eResult;
use crate::locator::Locator;
use crate::session::{Element, PageHandle};

/// Grid cell that wraps each name input together with its error state
const NAME_GRID_ITEM: &str = ".RyuGridItemRoot-dChSeW";

const CHECKED_ICON: &str = ".RyuIconSvg--check-square";
const CROSSED_ICON: &str = ".RyuIconSvg--x-square";

#[derive(Clone)]
pub struct SignupPage {
    page: PageHandle,
}

impl PageObject for SignupPage {
    fn bind(page: PageHandle) -> Self {
        Self { page }
    }

    fn page(&self) -> &PageHandle {
        &self.page
    }
}

impl Navigable for SignupPage {
    const PATH: &'static str = "/sign-up";
}

impl SignupPage {
    pub fn email_textbox(&self) -> Element {
        self.page.locate(Locator::by_role("textbox", "Work email address"))
    }

    pub fn first_name_textbox(&self) -> Element {
        self.page.locate(Locator::by_role("textbox", "First name (required)"))
    }

    pub fn last_name_textbox(&self) -> Element {
        self.page.locate(Locator::by_role("textbox", "Last name (required)"))
    }

    pub fn password_textbox(&self) -> Element {
        self.page.locate(Locator::by_label("Choose a password (required)"))
    }

    pub fn start_application_button(&self) -> Element {
        self.page.locate(Locator::by_role("button", "Start application"))
    }

    fn name_error(&self, field: &str) -> Element {
        self.page.locate(
            Locator::css_has(NAME_GRID_ITEM, Locator::css(format!("[name=\"{}\"]", field)))
                .locator(".RyuInputBaseRoot--hasError"),
        )
    }

    /// Error state of the first name field, whatever the message
    pub fn first_name_error_message(&self) -> Element {
        self.name_error("first_name")
    }

    pub fn last_name_error_message(&self) -> Element {
        self.name_error("last_name")
    }

    pub fn email_error_icon(&self) -> Element {
        self.page.locate(field_error_icon("email"))
    }

    pub fn first_name_error_icon(&self) -> Element {
        self.page.locate(field_error_icon("first_name"))
    }

    pub fn last_name_error_icon(&self) -> Element {
        self.page.locate(field_error_icon("last_name"))
    }

    pub fn password_error_icon(&self) -> Element {
        self.page.locate(field_error_icon("password"))
    }

    pub fn show_password_button(&self) -> Element {
        self.page.locate(Locator::by_role("button", "Show password"))
    }

    pub fn hide_password_button(&self) -> Element {
        self.page.locate(Locator::by_role("button", "Hide password"))
    }

    /// The raw input, whose `type` flips between `password` and `text`
    pub fn password_input(&self) -> Element {
        self.page.locate(Locator::css("input[name=\"password\"]"))
    }

    /// Check mark next to a requirement the typed password meets
    pub fn requirement_satisfied(&self, requirement: PasswordRequirement) -> Element {
        self.page
            .locate(Locator::by_text(requirement.label()).locator(CHECKED_ICON))
    }

    /// Cross next to a requirement the typed password misses
    pub fn requirement_unsatisfied(&self, requirement: PasswordRequirement) -> Element {
        self.page
            .locate(Locator::by_text(requirement.label()).locator(CROSSED_ICON))
    }

    pub async fn is_requirement_satisfied(&self, requirement: PasswordRequirement) -> E2eResult<bool> {
        self.requirement_satisfied(requirement).is_visible().await
    }

    pub async fn enter_email(&self, email: &str) -> E2eResult<()> {
        self.email_textbox().fill(email).await
    }

    pub async fn enter_first_name(&self, first_name: &str) -> E2eResult<()> {
        self.first_name_textbox().fill(first_name).await
    }

    pub async fn enter_last_name(&self, last_name: &str) -> E2eResult<()> {
        self.last_name_textbox().fill(last_name).await
    }

    pub async fn enter_password(&self, password: &str) -> E2eResult<()> {
        self.password_textbox().fill(password).await
    }

    pub async fn show_password(&self) -> E2eResult<()> {
        self.show_password_button().click().await
    }

    pub async fn hide_password(&self) -> E2eResult<()> {
        self.hide_password_button().click().await
    }

    pub async fn press_enter(&self) -> E2eResult<()> {
        self.page.press("Enter").await
    }

    pub async fn click_start_application(&self) -> E2eResult<()> {
        self.start_application_button().click().await
    }

    pub async fn signup_user(&self, credentials: &Credentials) -> E2eResult<()> {
        info!("Signing up {}", credentials.email);
        self.enter_email(&credentials.email).await?;
        self.enter_first_name(&credentials.first_name).await?;
        self.enter_last_name(&credentials.last_name).await?;
        self.enter_password(&credentials.password).await?;
        self.click_start_application().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::driver::testing::RecordingDriver;
    use crate::locator::Selector;
    use crate::protocol::Command;
    use crate::session::BrowserSession;
    use serde_json::json;
    use std::sync::Arc;

    fn signup(driver: RecordingDriver) -> SignupPage {
        let session = Arc::new(BrowserSession::new(Box::new(driver), Arc::new(HarnessConfig::default())));
        SignupPage::bind(session.main_page())
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "jane.doe@abcdef.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            password: "Password123!123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_user_fills_fields_in_order() {
        let (driver, recording) = RecordingDriver::new();
        let page = signup(driver);

        page.signup_user(&credentials()).await.unwrap();

        let commands = recording.commands();
        let filled: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                Command::Fill { value, .. } => Some(value.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(filled, vec!["jane.doe@abcdef.com", "Jane", "Doe", "Password123!123"]);
        assert!(matches!(
            commands.last(),
            Some(Command::Click { locator, .. }) if locator == page.start_application_button().locator()
        ));
    }

    #[tokio::test]
    async fn test_signup_user_aborts_on_missing_field() {
        let (driver, recording) = RecordingDriver::new();
        let page = signup(driver.fail_at(2));

        let err = page.signup_user(&credentials()).await.unwrap_err();

        assert!(matches!(err, crate::E2eError::ActionFailed { .. }));
        assert_eq!(recording.ops(), vec!["fill", "fill", "fill"]);
    }

    #[test]
    fn test_requirement_indicators_differ_only_by_icon() {
        let (driver, _recording) = RecordingDriver::new();
        let page = signup(driver);

        let checked = page.requirement_satisfied(PasswordRequirement::Number);
        let crossed = page.requirement_unsatisfied(PasswordRequirement::Number);

        let checked = checked.locator().chain();
        let crossed = crossed.locator().chain();
        assert_eq!(checked[0], crossed[0]);
        assert!(matches!(&checked[0], Selector::Text { text } if text == "At least 1 number"));
        assert_ne!(checked[1], crossed[1]);
    }

    #[test]
    fn test_name_error_is_scoped_to_field() {
        let (driver, _recording) = RecordingDriver::new();
        let page = signup(driver);

        let first = page.first_name_error_message();
        let last = page.last_name_error_message();
        assert_ne!(first.locator(), last.locator());
    }

    #[tokio::test]
    async fn test_requirement_predicate_reads_visibility() {
        let (driver, recording) = RecordingDriver::new();
        let page = signup(driver.answer(|_| json!(true)));

        assert!(page
            .is_requirement_satisfied(PasswordRequirement::Lowercase)
            .await
            .unwrap());
        assert_eq!(recording.ops(), vec!["is_visible"]);
    }

    #[tokio::test]
    async fn test_press_enter_targets_keyboard() {
        let (driver, recording) = RecordingDriver::new();
        signup(driver).press_enter().await.unwrap();

        assert!(matches!(&recording.commands()[0], Command::Press { key, .. } if key == "Enter"));
    }
}
