//! Input tables for the data-driven scenarios
//!
//! The unit tests check each table against local copies of the rules the
//! application enforces. Scenarios always assert on what the browser renders.

use crate::catalog::ErrorMessage;

/// Password that satisfies every requirement
pub const VALID_PASSWORD: &str = "Password123!123";

/// Meets length, lowercase and not-common; misses uppercase and number
pub const WEAK_PASSWORD: &str = "passwmrdabcd";

/// Inclusive upper bound on first and last name length
pub const NAME_MAX_LEN: usize = 40;

/// Local parts longer than this trip the server-side generic error
pub const LONG_EMAIL_LOCAL_LEN: usize = 300;

/// Domains used for throwaway business addresses
pub const SIGNUP_DOMAIN: &str = "abcdef.com";
pub const UNKNOWN_USER_DOMAIN: &str = "smdaa.com";
pub const ALTERNATE_DOMAIN: &str = "abcdme.com";
pub const VARIANT_DOMAIN: &str = "email.com";

/// Malformed addresses, each rejected with [`ErrorMessage::InvalidEmail`]
pub const INVALID_EMAILS: [&str; 7] = [
    "usernameonly",
    "usernameonly@",
    "gmail.com",
    "email add@abc.com",
    ".email@email.com",
    "abc..name@email.com",
    "email@add@email.com",
];

/// Malformed addresses exercised on the sign in screen
pub const SIGNIN_INVALID_EMAILS: [(&str, &str); 2] = [
    ("should not accept email with more than 1 consecutive dots", "email..add@google.com"),
    ("should not accept an email that starts with a dot", ".email@company.com"),
];

/// A valid address with unusual formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailVariant {
    pub title: &'static str,
    pub value: String,
}

impl EmailVariant {
    /// What the field should hold after the application normalises input
    pub fn echoed(&self) -> &str {
        self.value.trim()
    }
}

pub fn valid_email_variants(username: &str) -> Vec<EmailVariant> {
    vec![
        EmailVariant {
            title: "leading whitespace",
            value: format!("   {}@{}", username, VARIANT_DOMAIN),
        },
        EmailVariant {
            title: "trailing whitespace",
            value: format!("{}@{}   ", username, VARIANT_DOMAIN),
        },
        EmailVariant {
            title: "special characters",
            value: format!("{}!!*$%zxxc@{}", username, VARIANT_DOMAIN),
        },
        EmailVariant {
            title: "all uppercase characters",
            value: format!("{}@{}", username, VARIANT_DOMAIN).to_uppercase(),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePair {
    pub first_name: &'static str,
    pub last_name: &'static str,
}

/// Names with no letter at all
pub const INVALID_NAMES: [NamePair; 3] = [
    NamePair { first_name: "347326256", last_name: "5062719" },
    NamePair { first_name: "!$%#%%%", last_name: "(*&#$$" },
    NamePair { first_name: "   ", last_name: "     " },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    First,
    Last,
}

impl NameField {
    pub fn must_contain_letter(self) -> ErrorMessage {
        match self {
            NameField::First => ErrorMessage::FirstNameMustContainLetter,
            NameField::Last => ErrorMessage::LastNameMustContainLetter,
        }
    }

    pub fn too_long(self) -> ErrorMessage {
        match self {
            NameField::First => ErrorMessage::FirstNameMustBeAtMost40Chars,
            NameField::Last => ErrorMessage::LastNameMustBeAtMost40Chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PasswordRequirement;
    use test_case::test_case;

    /// Message expected for a name value, `None` when it is accepted
    fn expected_name_error(field: NameField, value: &str) -> Option<ErrorMessage> {
        if !value.chars().any(char::is_alphabetic) {
            Some(field.must_contain_letter())
        } else if value.chars().count() > NAME_MAX_LEN {
            Some(field.too_long())
        } else {
            None
        }
    }

    /// Address shape rules: one `@`, non-empty parts, a dotted domain, no
    /// inner whitespace, no leading dot and no consecutive dots. Surrounding
    /// whitespace is trimmed first.
    fn is_well_formed_email(value: &str) -> bool {
        let value = value.trim();
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !value.chars().any(char::is_whitespace)
            && !local.starts_with('.')
            && !value.contains("..")
    }

    /// Free consumer mail is refused even when well formed
    fn is_business_email(value: &str) -> bool {
        value
            .trim()
            .rsplit_once('@')
            .map(|(_, domain)| !domain.eq_ignore_ascii_case("gmail.com"))
            .unwrap_or(false)
    }

    /// Requirements the password visibly misses, for the rules that can be
    /// judged locally. `NotCommonlyUsed` depends on a server-side list and is
    /// never reported.
    fn unmet_requirements(password: &str) -> Vec<PasswordRequirement> {
        PasswordRequirement::ALL
            .into_iter()
            .filter(|requirement| match requirement {
                PasswordRequirement::AtLeast12Characters => password.chars().count() < 12,
                PasswordRequirement::Lowercase => !password.chars().any(char::is_lowercase),
                PasswordRequirement::Uppercase => !password.chars().any(char::is_uppercase),
                PasswordRequirement::Number => !password.chars().any(|c| c.is_ascii_digit()),
                PasswordRequirement::NotCommonlyUsed => false,
            })
            .collect()
    }

    #[test]
    fn test_invalid_emails_break_a_shape_rule() {
        for email in INVALID_EMAILS.iter().chain(SIGNIN_INVALID_EMAILS.iter().map(|(_, e)| e)) {
            assert!(!is_well_formed_email(email), "{} should be malformed", email);
        }
    }

    #[test]
    fn test_email_variants_are_accepted_and_trimmed() {
        for variant in valid_email_variants("Olivia.Smith42") {
            assert!(is_well_formed_email(&variant.value), "{} rejected", variant.title);
            assert!(is_business_email(&variant.value));
            assert_eq!(variant.echoed(), variant.echoed().trim());
        }
    }

    #[test]
    fn test_variant_titles_are_unique() {
        let variants = valid_email_variants("x");
        let titles: std::collections::HashSet<_> = variants.iter().map(|v| v.title).collect();
        assert_eq!(titles.len(), variants.len());
    }

    #[test]
    fn test_gmail_is_well_formed_but_not_business() {
        assert!(is_well_formed_email("liam_garcia@gmail.com"));
        assert!(!is_business_email("liam_garcia@gmail.com"));
        assert!(!is_business_email("liam_garcia@GMAIL.com"));
        assert!(is_business_email("liam_garcia@abcdef.com"));
    }

    #[test]
    fn test_invalid_names_need_a_letter() {
        for pair in INVALID_NAMES {
            assert_eq!(
                expected_name_error(NameField::First, pair.first_name),
                Some(ErrorMessage::FirstNameMustContainLetter)
            );
            assert_eq!(
                expected_name_error(NameField::Last, pair.last_name),
                Some(ErrorMessage::LastNameMustContainLetter)
            );
        }
    }

    #[test_case(NAME_MAX_LEN, None ; "exactly at limit")]
    #[test_case(NAME_MAX_LEN + 1, Some(ErrorMessage::FirstNameMustBeAtMost40Chars) ; "one over limit")]
    fn test_name_length_boundary(len: usize, expected: Option<ErrorMessage>) {
        let name = "a".repeat(len);
        assert_eq!(expected_name_error(NameField::First, &name), expected);
    }

    #[test]
    fn test_names_with_symbols_are_accepted() {
        assert_eq!(expected_name_error(NameField::First, "a1b2c3@!$%^"), None);
        assert_eq!(expected_name_error(NameField::Last, "x9y8z7@!$%^)(&)"), None);
    }

    #[test]
    fn test_weak_password_misses_uppercase_and_number() {
        assert_eq!(
            unmet_requirements(WEAK_PASSWORD),
            vec![PasswordRequirement::Uppercase, PasswordRequirement::Number]
        );
    }

    #[test]
    fn test_valid_password_meets_everything() {
        assert!(unmet_requirements(VALID_PASSWORD).is_empty());
    }
}
