//! Harness configuration
//!
//! Resolved in three layers: built-in defaults, an optional TOML file, then
//! `AUTHFLOW_*` environment variables. The CLI applies its flags last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};
use crate::playwright::Browser;

/// Top-level configuration shared by every scenario in a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Base URL of the application under test
    pub base_url: String,

    /// Browser engine to launch
    pub browser: Browser,

    /// Run without a visible window
    pub headless: bool,

    pub viewport: Viewport,

    pub timeouts: Timeouts,

    /// Where each named navigation target is expected to land
    pub destinations: Destinations,

    /// Pre-seeded account used by the "existing user" scenarios. Read-only.
    pub existing_account_email: String,

    /// Maximum scenarios executing at once
    pub workers: usize,

    /// Directory for the JSON report
    pub output_dir: PathBuf,

    /// Node.js executable used to host Playwright
    pub node_binary: PathBuf,

    /// Probe `base_url` over HTTP before launching any browser
    pub check_reachability: bool,

    /// Seed for generated test data. Unset means a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "https://app.ramp.com".to_string(),
            browser: Browser::Chromium,
            headless: true,
            viewport: Viewport::default(),
            timeouts: Timeouts::default(),
            destinations: Destinations::default(),
            existing_account_email: "aa@aa.com".to_string(),
            workers: 4,
            output_dir: PathBuf::from("test-results"),
            node_binary: PathBuf::from("node"),
            check_reachability: true,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// Timeouts in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Element wait before an action gives up
    pub action_ms: u64,

    /// Polling window for `expect` assertions
    pub expect_ms: u64,

    /// Page load and URL assertions
    pub navigation_ms: u64,

    /// Whole-scenario budget
    pub test_ms: u64,

    /// Redirect to the verify-email page after a full signup
    pub signup_redirect_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: 10_000,
            expect_ms: 5_000,
            navigation_ms: 30_000,
            test_ms: 60_000,
            signup_redirect_ms: 20_000,
        }
    }
}

impl Timeouts {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn test(&self) -> Duration {
        Duration::from_millis(self.test_ms)
    }

    pub fn signup_redirect(&self) -> Duration {
        Duration::from_millis(self.signup_redirect_ms)
    }
}

/// Named navigation targets the suites assert on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    SignIn,
    SignUp,
    VerifyEmail,
    ForgotPassword,
    GetStarted,
}

/// Expected URL: either exact (relative paths are joined to `base_url`) or
/// a regular expression searched anywhere in the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlPattern {
    Exact(String),
    Regex(String),
}

impl UrlPattern {
    /// Make relative exact patterns absolute against `base_url`
    pub fn resolve(&self, base_url: &str) -> UrlPattern {
        match self {
            UrlPattern::Exact(url) if url.starts_with('/') => {
                UrlPattern::Exact(format!("{}{}", base_url.trim_end_matches('/'), url))
            }
            other => other.clone(),
        }
    }

    pub fn matches(&self, url: &str) -> E2eResult<bool> {
        match self {
            UrlPattern::Exact(expected) => Ok(expected == url),
            UrlPattern::Regex(pattern) => Ok(Regex::new(pattern)?.is_match(url)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Destinations {
    pub sign_in: UrlPattern,
    pub sign_up: UrlPattern,
    pub verify_email: UrlPattern,
    pub forgot_password: UrlPattern,
    pub get_started: UrlPattern,
}

impl Default for Destinations {
    fn default() -> Self {
        Self {
            sign_in: UrlPattern::Regex(r"/sign-in(\?.*)?$".to_string()),
            sign_up: UrlPattern::Regex(r"/sign-up(\?.*)?$".to_string()),
            verify_email: UrlPattern::Regex(r"/verify-email".to_string()),
            forgot_password: UrlPattern::Regex(r"/(forgot|reset)-password".to_string()),
            get_started: UrlPattern::Regex(r"/get-started".to_string()),
        }
    }
}

impl Destinations {
    pub fn get(&self, destination: Destination) -> &UrlPattern {
        match destination {
            Destination::SignIn => &self.sign_in,
            Destination::SignUp => &self.sign_up,
            Destination::VerifyEmail => &self.verify_email,
            Destination::ForgotPassword => &self.forgot_password,
            Destination::GetStarted => &self.get_started,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from `path` (defaults when `None`), then apply
    /// the process environment. A named file that does not exist is an error.
    pub fn load(path: Option<&Path>) -> E2eResult<Self> {
        let mut config = match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(E2eError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `AUTHFLOW_*` overrides read through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("AUTHFLOW_BASE_URL") {
            self.base_url = url;
        }
        if let Some(browser) = lookup("AUTHFLOW_BROWSER") {
            self.browser = browser.parse()?;
        }
        if let Some(headless) = lookup("AUTHFLOW_HEADLESS") {
            self.headless = parse_bool("AUTHFLOW_HEADLESS", &headless)?;
        }
        if let Some(workers) = lookup("AUTHFLOW_WORKERS") {
            self.workers = workers
                .parse()
                .map_err(|_| E2eError::Config(format!("AUTHFLOW_WORKERS is not a number: {}", workers)))?;
        }
        if let Some(email) = lookup("AUTHFLOW_EXISTING_ACCOUNT") {
            self.existing_account_email = email;
        }
        if let Some(node) = lookup("AUTHFLOW_NODE") {
            self.node_binary = PathBuf::from(node);
        }
        if let Some(seed) = lookup("AUTHFLOW_SEED") {
            let seed = seed
                .parse()
                .map_err(|_| E2eError::Config(format!("AUTHFLOW_SEED is not a number: {}", seed)))?;
            self.seed = Some(seed);
        }
        Ok(())
    }

    pub fn validate(&self) -> E2eResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::Config(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if self.workers == 0 {
            return Err(E2eError::Config("workers must be at least 1".to_string()));
        }
        for destination in [
            Destination::SignIn,
            Destination::SignUp,
            Destination::VerifyEmail,
            Destination::ForgotPassword,
            Destination::GetStarted,
        ] {
            if let UrlPattern::Regex(pattern) = self.destinations.get(destination) {
                Regex::new(pattern)?;
            }
        }
        Ok(())
    }

    /// Absolute URL for a path on the application
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Resolved pattern for a named destination
    pub fn destination(&self, destination: Destination) -> UrlPattern {
        self.destinations.get(destination).resolve(&self.base_url)
    }
}

fn parse_bool(key: &str, value: &str) -> E2eResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(E2eError::Config(format!("{} is not a boolean: {}", key, value))),
    }
}
