//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npm install playwright @playwright/test && npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Driver closed before the command completed")]
    DriverClosed,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Action failed: {action} on {locator} - {reason}")]
    ActionFailed {
        action: String,
        locator: String,
        reason: String,
    },

    #[error("Assertion failed on {locator}: expected {expected}, received {actual}")]
    AssertionFailed {
        locator: String,
        expected: String,
        actual: String,
    },

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Application unreachable at {url}: {reason}")]
    EnvironmentUnreachable { url: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Scenario panicked: {0}")]
    Panicked(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl E2eError {
    /// Assertion and action failures are the expected failure modes of a
    /// scenario; everything else means the environment could not be used.
    pub fn is_environment(&self) -> bool {
        !matches!(
            self,
            E2eError::AssertionFailed { .. } | E2eError::ActionFailed { .. } | E2eError::Timeout(_)
        )
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
