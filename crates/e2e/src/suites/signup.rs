use super::{Scenario, Suite};
use crate::cases::{
    valid_email_variants, NameField, INVALID_EMAILS, INVALID_NAMES, LONG_EMAIL_LOCAL_LEN, NAME_MAX_LEN,
    SIGNUP_DOMAIN, VALID_PASSWORD, VARIANT_DOMAIN, WEAK_PASSWORD,
};
use crate::catalog::{ErrorMessage, PasswordRequirement};
use crate::config::{Destination, HarnessConfig};
use crate::data::{Credentials, DataGenerator};
use crate::expect::{expect, expect_page};
use crate::fixture::Fixtures;
use crate::pages::{Navigable, PageObject};
use crate::E2eResult;

pub const SUITE: &str = "Signup page";

/// Redirect to verify-email, heading shown, submitted address shown
async fn assert_verification_requested(fx: &Fixtures, email: &str) -> E2eResult<()> {
    expect_page(&fx.page)
        .with_timeout(fx.config().timeouts.signup_redirect())
        .to_be_at(Destination::VerifyEmail)
        .await?;
    expect(&fx.verify_email.header()).to_be_visible().await?;
    expect(&fx.verify_email.email_display(email)).to_be_visible().await
}

pub fn scenarios(config: &HarnessConfig, data: &mut DataGenerator) -> Vec<Scenario> {
    let mut suite = Suite::new(SUITE)
        .tag("signup")
        .before_each(|fx| async move { fx.signup.goto().await });

    let credentials = data.credentials(SIGNUP_DOMAIN, VALID_PASSWORD);
    suite.test("should successfully sign up using correct details", move |fx| async move {
        fx.signup.signup_user(&credentials).await?;

        assert_verification_requested(&fx, &credentials.email).await
    });

    let credentials = Credentials {
        email: config.existing_account_email.clone(),
        ..data.credentials(SIGNUP_DOMAIN, VALID_PASSWORD)
    };
    suite.test("should redirect to sign in page when email is existing", move |fx| async move {
        fx.signup.signup_user(&credentials).await?;

        expect_page(&fx.page).to_be_at(Destination::SignIn).await?;
        expect(&fx.signin.email_textbox())
            .to_have_attribute("value", &credentials.email)
            .await
    });

    suite.test(
        "should display all errors when Start application is clicked without any input",
        |fx| async move {
            fx.signup.click_start_application().await?;

            expect(&fx.signup.email_error_icon()).to_be_visible().await?;
            expect(&fx.signup.first_name_error_icon()).to_be_visible().await?;
            expect(&fx.signup.last_name_error_icon()).to_be_visible().await?;
            expect(&fx.signup.password_error_icon()).to_be_visible().await
        },
    );

    for email in INVALID_EMAILS {
        suite.test(format!("should display an error for email with value {}", email), move |fx| async move {
            fx.signup.enter_email(email).await?;
            fx.signup.press_enter().await?;

            expect(&fx.signup.error_message(ErrorMessage::InvalidEmail.text()))
                .to_be_visible()
                .await?;
            expect(&fx.signup.email_error_icon()).to_be_visible().await
        });
    }

    let email = data.email("gmail.com");
    suite.test("should display an error if email is not a business one", move |fx| async move {
        fx.signup.enter_email(&email).await?;
        fx.signup.press_enter().await?;

        expect(&fx.signup.error_message(ErrorMessage::NonBusinessGmail.text()))
            .to_be_visible()
            .await?;
        expect(&fx.signup.email_error_icon()).to_be_visible().await
    });

    for variant in valid_email_variants(&data.username()) {
        let credentials = Credentials {
            email: variant.value.clone(),
            ..data.credentials(SIGNUP_DOMAIN, VALID_PASSWORD)
        };
        suite.test(format!("should accept an email with {}", variant.title), move |fx| async move {
            fx.signup.signup_user(&credentials).await?;

            assert_verification_requested(&fx, variant.echoed()).await
        });
    }

    let credentials = Credentials {
        email: format!("{}@{}", data.alphanumeric(LONG_EMAIL_LOCAL_LEN), VARIANT_DOMAIN),
        ..data.credentials(SIGNUP_DOMAIN, VALID_PASSWORD)
    };
    suite.test(
        "should display an error when email is a long string (300+ characters)",
        move |fx| async move {
            fx.signup.signup_user(&credentials).await?;

            expect(&fx.signup.error_message(ErrorMessage::GenericError.text()))
                .to_be_visible()
                .await
        },
    );

    for name in INVALID_NAMES {
        suite.test(
            format!("should not accept names with value {} {}", name.first_name, name.last_name),
            move |fx| async move {
                fx.signup.enter_first_name(name.first_name).await?;
                fx.signup.enter_last_name(name.last_name).await?;
                fx.signup.press_enter().await?;

                expect(&fx.signup.error_message(NameField::First.must_contain_letter().text()))
                    .to_be_visible()
                    .await?;
                expect(&fx.signup.error_message(NameField::Last.must_contain_letter().text()))
                    .to_be_visible()
                    .await?;
                expect(&fx.signup.first_name_error_icon()).to_be_visible().await?;
                expect(&fx.signup.last_name_error_icon()).to_be_visible().await
            },
        );
    }

    let first_name = data.alpha(NAME_MAX_LEN + 1);
    let last_name = data.alpha(NAME_MAX_LEN + 1);
    suite.test(
        "should not accept names that are more than 40 characters long",
        move |fx| async move {
            fx.signup.enter_first_name(&first_name).await?;
            fx.signup.enter_last_name(&last_name).await?;
            fx.signup.press_enter().await?;

            expect(&fx.signup.error_message(NameField::First.too_long().text()))
                .to_be_visible()
                .await?;
            expect(&fx.signup.error_message(NameField::Last.too_long().text()))
                .to_be_visible()
                .await?;
            expect(&fx.signup.first_name_error_icon()).to_be_visible().await?;
            expect(&fx.signup.last_name_error_icon()).to_be_visible().await
        },
    );

    let first_name = data.alpha(NAME_MAX_LEN);
    let last_name = data.alpha(NAME_MAX_LEN);
    suite.test("should accept names that are exactly 40 characters long", move |fx| async move {
        fx.signup.enter_first_name(&first_name).await?;
        fx.signup.enter_last_name(&last_name).await?;
        fx.signup.click_start_application().await?;

        expect(&fx.signup.first_name_error_message()).not().to_be_visible().await?;
        expect(&fx.signup.last_name_error_message()).not().to_be_visible().await?;
        expect(&fx.signup.first_name_error_icon()).not().to_be_visible().await?;
        expect(&fx.signup.last_name_error_icon()).not().to_be_visible().await
    });

    let first_name = format!("{}@!$%^", data.alphanumeric_with_letter(6));
    let last_name = format!("{}@!$%^)(&)", data.alphanumeric_with_letter(6));
    suite.test(
        "should accept names with alphanumeric and special characters",
        move |fx| async move {
            fx.signup.enter_first_name(&first_name).await?;
            fx.signup.enter_last_name(&last_name).await?;
            fx.signup.click_start_application().await?;

            expect(&fx.signup.first_name_error_message()).not().to_be_visible().await?;
            expect(&fx.signup.last_name_error_message()).not().to_be_visible().await
        },
    );

    suite.test(
        "should not accept passwords that don't meet format requirements",
        |fx| async move {
            fx.signup.enter_password(WEAK_PASSWORD).await?;

            for requirement in [PasswordRequirement::Number, PasswordRequirement::Uppercase] {
                expect(&fx.signup.requirement_unsatisfied(requirement)).to_be_visible().await?;
            }
            for requirement in [
                PasswordRequirement::AtLeast12Characters,
                PasswordRequirement::Lowercase,
                PasswordRequirement::NotCommonlyUsed,
            ] {
                expect(&fx.signup.requirement_satisfied(requirement)).to_be_visible().await?;
            }

            expect(&fx.signup.password_error_icon()).to_be_visible().await
        },
    );

    let password = data.password();
    suite.test(
        "should unmask password when Show password button is clicked",
        move |fx| async move {
            fx.signup.enter_password(&password).await?;
            fx.signup.show_password().await?;

            expect(&fx.signup.password_input()).to_have_attribute("type", "text").await?;
            expect(&fx.signup.password_input()).to_have_value(&password).await?;

            fx.signup.hide_password().await?;

            expect(&fx.signup.password_input()).to_have_attribute("type", "password").await?;
            expect(&fx.signup.password_input()).to_have_value(&password).await
        },
    );

    suite.into_scenarios()
}
