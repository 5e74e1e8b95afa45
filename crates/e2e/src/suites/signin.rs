use super::{Scenario, Suite};
use crate::cases::{
    valid_email_variants, ALTERNATE_DOMAIN, SIGNIN_INVALID_EMAILS, UNKNOWN_USER_DOMAIN,
};
use crate::catalog::ErrorMessage;
use crate::config::{Destination, HarnessConfig};
use crate::data::DataGenerator;
use crate::expect::{expect, expect_page};
use crate::pages::{Navigable, PageObject};

pub const SUITE: &str = "Sign in page";

pub fn scenarios(config: &HarnessConfig, data: &mut DataGenerator) -> Vec<Scenario> {
    let mut suite = Suite::new(SUITE)
        .tag("signin")
        .before_each(|fx| async move { fx.signin.goto().await });

    suite.test("should not proceed if email is not provided", |fx| async move {
        fx.signin.click_continue().await?;

        expect(&fx.signin.email_error_icon()).to_be_visible().await
    });

    suite.test(
        "should redirect to 'Get started for free' sign up page when link is clicked",
        |fx| async move {
            let popup = fx.signin.click_sign_up_link().await?;
            popup.wait_for_load().await?;

            expect_page(&popup).to_be_at(Destination::GetStarted).await
        },
    );

    for (title, email) in SIGNIN_INVALID_EMAILS {
        suite.test(title, move |fx| async move {
            fx.signin.enter_email(email).await?;
            fx.signin.click_continue().await?;

            expect(&fx.signin.error_message(ErrorMessage::InvalidEmail.text()))
                .to_be_visible()
                .await?;
            expect(&fx.signin.email_error_icon()).to_be_visible().await
        });
    }

    for variant in valid_email_variants(&data.username()) {
        suite.test(format!("should accept an email with {}", variant.title), move |fx| async move {
            fx.signin.enter_email(&variant.value).await?;
            fx.signin.click_continue().await?;

            expect(&fx.signin.email_error_icon()).not().to_be_visible().await?;
            expect(&fx.signin.email_textbox())
                .to_have_attribute("value", variant.echoed())
                .await
        });
    }

    let email = data.email(UNKNOWN_USER_DOMAIN);
    suite.test("should not sign in a non-existing user", move |fx| async move {
        fx.signin.signin_user(&email, "password").await?;

        expect(&fx.signin.error_message(ErrorMessage::EmailPasswordNotRecognized.text()))
            .to_be_visible()
            .await
    });

    let existing = config.existing_account_email.clone();
    suite.test("should not sign in an existing user with incorrect password", move |fx| async move {
        fx.signin.signin_user(&existing, "password0029").await?;

        expect(&fx.signin.error_message(ErrorMessage::EmailPasswordNotRecognized.text()))
            .to_be_visible()
            .await
    });

    let first = data.email(UNKNOWN_USER_DOMAIN);
    let second = data.email(ALTERNATE_DOMAIN);
    suite.test(
        "should be able to change email when user clicks 'Use a different email' link",
        move |fx| async move {
            fx.signin.enter_email(&first).await?;
            fx.signin.click_continue().await?;
            expect(&fx.signin.email_textbox()).to_have_attribute("value", &first).await?;

            fx.signin.use_a_different_email().await?;
            expect(&fx.signin.continue_button()).to_be_visible().await?;

            fx.signin.enter_email(&second).await?;
            fx.signin.click_continue().await?;
            expect(&fx.signin.email_textbox()).to_have_attribute("value", &second).await
        },
    );

    let email = data.email(UNKNOWN_USER_DOMAIN);
    suite.test(
        "should redirect to Forgot Password page when 'Reset password' link is clicked",
        move |fx| async move {
            fx.signin.enter_email(&email).await?;
            fx.signin.click_continue().await?;
            fx.signin.reset_password().await?;

            expect_page(&fx.page).to_be_at(Destination::ForgotPassword).await
        },
    );

    let email = data.email(UNKNOWN_USER_DOMAIN);
    suite.test("should not sign in when user doesn't enter a password", move |fx| async move {
        fx.signin.enter_email(&email).await?;
        fx.signin.click_continue().await?;
        fx.signin.click_sign_in().await?;

        expect(&fx.signin.password_error_icon()).to_be_visible().await
    });

    suite.into_scenarios()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testing::RecordingDriver;
    use crate::fixture::Fixtures;
    use crate::protocol::Command;
    use crate::session::BrowserSession;
    use serde_json::json;
    use std::sync::Arc;

    fn build() -> Vec<Scenario> {
        scenarios(&HarnessConfig::default(), &mut DataGenerator::seeded(9))
    }

    fn take(name: &str) -> Scenario {
        build()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("no scenario named {}", name))
    }

    #[test]
    fn test_one_scenario_per_email_variant() {
        let scenarios = build();
        let accepted = scenarios
            .iter()
            .filter(|s| s.name.starts_with("should accept an email with"))
            .count();
        assert_eq!(accepted, 4);
        assert!(scenarios.iter().all(|s| s.suite == SUITE && s.has_tag("signin")));
    }

    #[tokio::test]
    async fn test_missing_email_scenario_commands() {
        let (driver, recording) = RecordingDriver::new();
        let session = Arc::new(BrowserSession::new(Box::new(driver), Arc::new(HarnessConfig::default())));

        take("should not proceed if email is not provided")
            .run(Fixtures::bind(&session))
            .await
            .unwrap();

        assert_eq!(recording.ops(), vec!["goto", "click", "expect_visible"]);
    }

    #[tokio::test]
    async fn test_existing_account_comes_from_config() {
        let (driver, recording) = RecordingDriver::new();
        let config = HarnessConfig {
            existing_account_email: "seeded@example.com".to_string(),
            ..Default::default()
        };
        let scenario = scenarios(&config, &mut DataGenerator::seeded(1))
            .into_iter()
            .find(|s| s.name == "should not sign in an existing user with incorrect password")
            .unwrap();
        let session = Arc::new(BrowserSession::new(Box::new(driver), Arc::new(config)));

        scenario.run(Fixtures::bind(&session)).await.unwrap();

        assert!(recording
            .commands()
            .iter()
            .any(|c| matches!(c, Command::Fill { value, .. } if value == "seeded@example.com")));
    }

    #[tokio::test]
    async fn test_sign_up_link_asserts_on_popup() {
        let (driver, recording) = RecordingDriver::new();
        let driver = driver.answer(|c| match c {
            Command::ClickForPopup { .. } => json!(1),
            _ => serde_json::Value::Null,
        });
        let session = Arc::new(BrowserSession::new(Box::new(driver), Arc::new(HarnessConfig::default())));

        take("should redirect to 'Get started for free' sign up page when link is clicked")
            .run(Fixtures::bind(&session))
            .await
            .unwrap();

        assert_eq!(recording.ops(), vec!["goto", "click_for_popup", "wait_for_load", "expect_url"]);
        assert!(matches!(recording.commands()[3], Command::ExpectUrl { page: 1, .. }));
    }
}
