//! Error message catalog
//!
//! Every user-facing validation string the suites assert on lives here.
//! Suites refer to the enum variants, never to the literal copy.

use std::fmt;

/// Semantic validation-failure keys and their exact rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorMessage {
    InvalidEmail,
    GenericError,
    NonBusinessGmail,
    FirstNameMustContainLetter,
    LastNameMustContainLetter,
    FirstNameMustBeAtMost40Chars,
    LastNameMustBeAtMost40Chars,
    EmailPasswordNotRecognized,
}

impl ErrorMessage {
    pub const ALL: [ErrorMessage; 8] = [
        ErrorMessage::InvalidEmail,
        ErrorMessage::GenericError,
        ErrorMessage::NonBusinessGmail,
        ErrorMessage::FirstNameMustContainLetter,
        ErrorMessage::LastNameMustContainLetter,
        ErrorMessage::FirstNameMustBeAtMost40Chars,
        ErrorMessage::LastNameMustBeAtMost40Chars,
        ErrorMessage::EmailPasswordNotRecognized,
    ];

    pub const fn text(self) -> &'static str {
        match self {
            ErrorMessage::InvalidEmail => "Invalid email address",
            ErrorMessage::GenericError => "There was an error",
            ErrorMessage::NonBusinessGmail => "Enter a valid business email (not gmail.com)",
            ErrorMessage::FirstNameMustContainLetter => "First name must contain at least one letter",
            ErrorMessage::LastNameMustContainLetter => "Last name must contain at least one letter",
            ErrorMessage::FirstNameMustBeAtMost40Chars => "First name must be at most 40 characters",
            ErrorMessage::LastNameMustBeAtMost40Chars => "Last name must be at most 40 characters",
            ErrorMessage::EmailPasswordNotRecognized => {
                "We do not recognize this email password combination. Try again or reset your password."
            }
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Password composition rules shown as a checklist under the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordRequirement {
    AtLeast12Characters,
    Lowercase,
    Uppercase,
    Number,
    NotCommonlyUsed,
}

impl PasswordRequirement {
    pub const ALL: [PasswordRequirement; 5] = [
        PasswordRequirement::AtLeast12Characters,
        PasswordRequirement::Lowercase,
        PasswordRequirement::Uppercase,
        PasswordRequirement::Number,
        PasswordRequirement::NotCommonlyUsed,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PasswordRequirement::AtLeast12Characters => "At least 12 characters",
            PasswordRequirement::Lowercase => "At least 1 lowercase character",
            PasswordRequirement::Uppercase => "At least 1 uppercase character",
            PasswordRequirement::Number => "At least 1 number",
            PasswordRequirement::NotCommonlyUsed => "Not a commonly used password",
        }
    }
}
