//! Line-delimited JSON protocol spoken with the Node driver
//!
//! Every request is one JSON object on the driver's stdin. The driver
//! answers each one, in order, with exactly one JSON object on stdout.
//! Request id 0 is reserved for the readiness message sent after the
//! browser context is up.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::UrlPattern;
use crate::error::E2eError;
use crate::locator::Locator;

/// Index of a page inside one browser context. The first page is 0; popups
/// are numbered as they open.
pub type PageId = u32;

pub const MAIN_PAGE: PageId = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Goto {
        page: PageId,
        url: String,
        timeout_ms: u64,
    },
    Fill {
        page: PageId,
        locator: Locator,
        value: String,
        timeout_ms: u64,
    },
    Click {
        page: PageId,
        locator: Locator,
        timeout_ms: u64,
    },
    /// Keyboard press on whatever currently has focus
    Press { page: PageId, key: String },
    /// Click and wait for the popup the click opens; answers with its page id
    ClickForPopup {
        page: PageId,
        locator: Locator,
        timeout_ms: u64,
    },
    WaitForLoad { page: PageId, timeout_ms: u64 },
    /// Non-waiting visibility check; answers with a boolean
    IsVisible { page: PageId, locator: Locator },
    /// Answers with the attribute value or null
    GetAttribute {
        page: PageId,
        locator: Locator,
        name: String,
        timeout_ms: u64,
    },
    ExpectVisible {
        page: PageId,
        locator: Locator,
        negated: bool,
        timeout_ms: u64,
    },
    ExpectAttribute {
        page: PageId,
        locator: Locator,
        name: String,
        value: String,
        negated: bool,
        timeout_ms: u64,
    },
    ExpectValue {
        page: PageId,
        locator: Locator,
        value: String,
        negated: bool,
        timeout_ms: u64,
    },
    ExpectUrl {
        page: PageId,
        url: UrlPattern,
        timeout_ms: u64,
    },
    Close,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Goto { .. } => "goto",
            Command::Fill { .. } => "fill",
            Command::Click { .. } => "click",
            Command::Press { .. } => "press",
            Command::ClickForPopup { .. } => "click_for_popup",
            Command::WaitForLoad { .. } => "wait_for_load",
            Command::IsVisible { .. } => "is_visible",
            Command::GetAttribute { .. } => "get_attribute",
            Command::ExpectVisible { .. } => "expect_visible",
            Command::ExpectAttribute { .. } => "expect_attribute",
            Command::ExpectValue { .. } => "expect_value",
            Command::ExpectUrl { .. } => "expect_url",
            Command::Close => "close",
        }
    }

    /// Human-readable description of what the command acts on
    pub fn target(&self) -> String {
        match self {
            Command::Fill { locator, .. }
            | Command::Click { locator, .. }
            | Command::ClickForPopup { locator, .. }
            | Command::IsVisible { locator, .. }
            | Command::GetAttribute { locator, .. }
            | Command::ExpectVisible { locator, .. }
            | Command::ExpectAttribute { locator, .. }
            | Command::ExpectValue { locator, .. } => locator.to_string(),
            Command::Goto { url, .. } => url.clone(),
            Command::Press { key, .. } => format!("keyboard:{}", key),
            Command::WaitForLoad { page, .. } => format!("page#{}", page),
            Command::ExpectUrl { page, .. } => format!("page#{} url", page),
            Command::Close => "driver".to_string(),
        }
    }

    /// Time the driver itself may spend on the command
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Command::Goto { timeout_ms, .. }
            | Command::Fill { timeout_ms, .. }
            | Command::Click { timeout_ms, .. }
            | Command::ClickForPopup { timeout_ms, .. }
            | Command::WaitForLoad { timeout_ms, .. }
            | Command::GetAttribute { timeout_ms, .. }
            | Command::ExpectVisible { timeout_ms, .. }
            | Command::ExpectAttribute { timeout_ms, .. }
            | Command::ExpectValue { timeout_ms, .. }
            | Command::ExpectUrl { timeout_ms, .. } => Some(Duration::from_millis(*timeout_ms)),
            Command::Press { .. } | Command::IsVisible { .. } | Command::Close => None,
        }
    }

    /// What a passing assertion would have observed
    fn expectation(&self) -> String {
        match self {
            Command::ExpectVisible { negated: false, .. } => "visible".to_string(),
            Command::ExpectVisible { negated: true, .. } => "not visible".to_string(),
            Command::ExpectAttribute { name, value, negated, .. } => {
                format!("{}{}={:?}", if *negated { "not " } else { "" }, name, value)
            }
            Command::ExpectValue { value, negated, .. } => {
                format!("{}value {:?}", if *negated { "not " } else { "" }, value)
            }
            Command::ExpectUrl { url: UrlPattern::Exact(url), .. } => format!("url {:?}", url),
            Command::ExpectUrl { url: UrlPattern::Regex(re), .. } => format!("url =~ /{}/", re),
            other => other.name().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub id: u64,
    #[serde(flatten)]
    pub command: &'a Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Assertion,
    Action,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    pub ok: bool,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub error: Option<Failure>,
}

impl Response {
    pub fn into_result(self, command: &Command) -> Result<serde_json::Value, E2eError> {
        if self.ok {
            return Ok(self.value);
        }
        let failure = self.error.unwrap_or(Failure {
            kind: FailureKind::Error,
            message: "driver reported failure without details".to_string(),
        });
        Err(failure.into_error(command))
    }
}

impl Failure {
    pub fn into_error(self, command: &Command) -> E2eError {
        let message = strip_ansi(&self.message);
        match self.kind {
            FailureKind::Assertion => {
                let (expected, actual) = parse_expectation(&message);
                E2eError::AssertionFailed {
                    locator: command.target(),
                    expected: expected.unwrap_or_else(|| command.expectation()),
                    actual: actual.unwrap_or_else(|| first_line(&message).to_string()),
                }
            }
            FailureKind::Action => E2eError::ActionFailed {
                action: command.name().to_string(),
                locator: command.target(),
                reason: first_line(&message).to_string(),
            },
            FailureKind::Error => E2eError::Playwright(message),
        }
    }
}

fn first_line(message: &str) -> &str {
    message.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}

/// Terminal colour codes Playwright embeds in matcher messages
static ANSI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("ANSI pattern is valid"));

static EXPECTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*Expected[^:\n]*:\s*(.+?)\s*$").expect("Expected pattern is valid"));

static RECEIVED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*Received[^:\n]*:\s*(.+?)\s*$").expect("Received pattern is valid"));

pub fn strip_ansi(text: &str) -> String {
    ANSI.replace_all(text, "").into_owned()
}

/// Lift `Expected...:` and `Received...:` lines out of a matcher message
pub fn parse_expectation(message: &str) -> (Option<String>, Option<String>) {
    let capture = |re: &Regex| re.captures(message).map(|c| c[1].to_string());
    (capture(&EXPECTED), capture(&RECEIVED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_ansi_removes_colour_codes() {
        assert_eq!(strip_ansi("\x1b[2mexpect(\x1b[22m\x1b[31mlocator\x1b[39m)"), "expect(locator)");
        assert_eq!(
            parse_expectation("Expected: visible\nReceived: hidden"),
            (Some("visible".to_string()), Some("hidden".to_string()))
        );
    }

    #[test]
    fn test_request_flattens_command() {
        let command = Command::Click {
            page: MAIN_PAGE,
            locator: Locator::by_role("button", "Continue"),
            timeout_ms: 1000,
        };
        let value = serde_json::to_value(Request { id: 7, command: &command }).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["op"], "click");
        assert_eq!(value["locator"]["chain"][0]["role"], "button");
        assert_eq!(value["timeout_ms"], 1000);
    }

    #[test]
    fn test_url_pattern_wire_shape() {
        let command = Command::ExpectUrl {
            page: 1,
            url: UrlPattern::Regex("/get-started".to_string()),
            timeout_ms: 5000,
        };
        let value = serde_json::to_value(Request { id: 1, command: &command }).unwrap();
        assert_eq!(value["url"], json!({ "regex": "/get-started" }));
    }

    #[test]
    fn test_parse_success_response() {
        let response: Response = serde_json::from_str(r#"{"id":3,"ok":true,"value":true}"#).unwrap();
        let value = response.into_result(&Command::Close).unwrap();
        assert_eq!(value, json!(true));
    }

    #[test]
    fn test_assertion_failure_lifts_expected_and_received() {
        let message = "\u{1b}[2mexpect(\u{1b}[22m\u{1b}[31mlocator\u{1b}[39m).toHaveAttribute()\n\n\
                       Expected string: \u{1b}[32m\"text\"\u{1b}[39m\n\
                       Received string: \u{1b}[31m\"password\"\u{1b}[39m\n";
        let response = Response {
            id: 2,
            ok: false,
            value: serde_json::Value::Null,
            error: Some(Failure { kind: FailureKind::Assertion, message: message.to_string() }),
        };
        let command = Command::ExpectAttribute {
            page: MAIN_PAGE,
            locator: Locator::css("input[name=\"password\"]"),
            name: "type".to_string(),
            value: "text".to_string(),
            negated: false,
            timeout_ms: 5000,
        };

        match response.into_result(&command).unwrap_err() {
            E2eError::AssertionFailed { locator, expected, actual } => {
                assert_eq!(locator, r#"locator("input[name=\"password\"]")"#);
                assert_eq!(expected, "\"text\"");
                assert_eq!(actual, "\"password\"");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_assertion_without_matcher_lines_falls_back_to_command() {
        let failure = Failure {
            kind: FailureKind::Assertion,
            message: "Timed out 5000ms waiting for expect(locator).toBeVisible()".to_string(),
        };
        let command = Command::ExpectVisible {
            page: MAIN_PAGE,
            locator: Locator::by_text("Invalid email address"),
            negated: false,
            timeout_ms: 5000,
        };
        match failure.into_error(&command) {
            E2eError::AssertionFailed { expected, actual, .. } => {
                assert_eq!(expected, "visible");
                assert!(actual.starts_with("Timed out 5000ms"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_action_failure_keeps_first_line() {
        let failure = Failure {
            kind: FailureKind::Action,
            message: "locator.click: Timeout 10000ms exceeded.\nCall log:\n  - waiting for ...".to_string(),
        };
        let command = Command::Click {
            page: MAIN_PAGE,
            locator: Locator::by_role("button", "Sign in to Ramp"),
            timeout_ms: 10_000,
        };
        match failure.into_error(&command) {
            E2eError::ActionFailed { action, reason, .. } => {
                assert_eq!(action, "click");
                assert_eq!(reason, "locator.click: Timeout 10000ms exceeded.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
