//! Authflow E2E Test Suite
//!
//! Browser tests for the sign up, verify email and sign in flows, driven
//! from Rust:
//! - Hosts Playwright in a Node.js child process and speaks line-delimited
//!   JSON to it
//! - Gives every scenario its own browser context
//! - Models each screen as a page object with lazy locators
//! - Runs scenarios concurrently with a per-scenario time budget
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── preflight() -> node + playwright, base_url reachable │
//! │    ├── run(scenarios, filter) -> TestSuiteResult            │
//! │    └── write_results() -> test-results.json                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario (suites::signin, suites::signup)                  │
//! │    └── body(Fixtures) -> E2eResult<()>                      │
//! │          ├── SigninPage / SignupPage / VerifyEmailPage      │
//! │          │     └── Element { Locator } -> Command           │
//! │          └── expect(&element) / expect_page(&page)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  BrowserSession -> dyn Driver                               │
//! │    └── PlaywrightDriver: node driver.js <-> JSON lines      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cases;
pub mod catalog;
pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod expect;
pub mod fixture;
pub mod locator;
pub mod pages;
pub mod playwright;
pub mod protocol;
pub mod runner;
pub mod session;
pub mod suites;

pub use catalog::{ErrorMessage, PasswordRequirement};
pub use config::{Destination, HarnessConfig, UrlPattern};
pub use data::{Credentials, DataGenerator};
pub use error::{E2eError, E2eResult};
pub use expect::{expect, expect_page};
pub use fixture::Fixtures;
pub use locator::Locator;
pub use runner::{ScenarioFilter, TestResult, TestRunner, TestSuiteResult};
pub use suites::{Scenario, Suite};
