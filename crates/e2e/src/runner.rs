//! Test runner that schedules scenarios across isolated browser sessions

use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::HarnessConfig;
use crate::error::{E2eError, E2eResult};
use crate::fixture::{launch_session, run_scoped};
use crate::playwright::PlaywrightDriver;
use crate::session::BrowserSession;
use crate::suites::Scenario;

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub suite: String,
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    /// The failure came from the harness or the environment rather than
    /// from an assertion or an action on the page
    #[serde(default)]
    pub environment_failure: bool,
}

impl TestResult {
    pub fn full_name(&self) -> String {
        format!("{} › {}", self.suite, self.name)
    }

    fn failed(suite: String, name: String, duration_ms: u64, error: &E2eError) -> Self {
        Self {
            suite,
            name,
            success: false,
            duration_ms,
            error: Some(error.to_string()),
            environment_failure: error.is_environment(),
        }
    }
}

/// Result of running a selection of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn environment_failures(&self) -> usize {
        self.results.iter().filter(|r| r.environment_failure).count()
    }
}

/// Selects scenarios by substring of the full name, exact tag or exact
/// suite name. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct ScenarioFilter {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub suite: Option<String>,
}

impl ScenarioFilter {
    pub fn matches(&self, scenario: &Scenario) -> bool {
        self.name
            .as_deref()
            .map_or(true, |name| scenario.full_name().contains(name))
            && self.tag.as_deref().map_or(true, |tag| scenario.has_tag(tag))
            && self.suite.as_deref().map_or(true, |suite| scenario.suite == suite)
    }

    /// Split `scenarios` into the selected ones and the count left out.
    /// A name filter that selects nothing is an error.
    pub fn select(&self, scenarios: Vec<Scenario>) -> E2eResult<(Vec<Scenario>, usize)> {
        let total = scenarios.len();
        let selected: Vec<Scenario> = scenarios.into_iter().filter(|s| self.matches(s)).collect();
        if selected.is_empty() {
            if let Some(name) = &self.name {
                return Err(E2eError::ScenarioNotFound(name.clone()));
            }
        }
        let skipped = total - selected.len();
        Ok((selected, skipped))
    }
}

/// Opens one isolated browser session per scenario
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self, config: Arc<HarnessConfig>) -> E2eResult<Arc<BrowserSession>>;
}

/// Launches a Node-hosted Playwright driver for each session
pub struct PlaywrightLauncher;

#[async_trait]
impl SessionLauncher for PlaywrightLauncher {
    async fn launch(&self, config: Arc<HarnessConfig>) -> E2eResult<Arc<BrowserSession>> {
        launch_session(config).await
    }
}

/// Main E2E test runner
pub struct TestRunner {
    config: Arc<HarnessConfig>,
    launcher: Arc<dyn SessionLauncher>,
}

impl TestRunner {
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_launcher(config, Arc::new(PlaywrightLauncher))
    }

    pub fn with_launcher(config: HarnessConfig, launcher: Arc<dyn SessionLauncher>) -> Self {
        Self {
            config: Arc::new(config),
            launcher,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Check Playwright is installed and the application answers HTTP
    pub async fn preflight(&self) -> E2eResult<()> {
        PlaywrightDriver::check_installed(&self.config.node_binary).await?;
        if self.config.check_reachability {
            self.check_base_url().await?;
        }
        Ok(())
    }

    async fn check_base_url(&self) -> E2eResult<()> {
        let url = self.config.base_url.clone();
        let client = reqwest::Client::builder()
            .timeout(self.config.timeouts.navigation())
            .build()?;

        // Any HTTP status means a server answered
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| E2eError::EnvironmentUnreachable {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        info!("Application reachable at {} ({})", url, response.status());
        Ok(())
    }

    /// Run the scenarios `filter` selects
    pub async fn run(&self, scenarios: Vec<Scenario>, filter: &ScenarioFilter) -> E2eResult<TestSuiteResult> {
        let (selected, skipped) = filter.select(scenarios)?;
        let mut results = self.run_scenarios(selected).await;
        results.skipped = skipped;
        Ok(results)
    }

    /// Run every scenario, at most `workers` at a time. Results keep the
    /// order the scenarios were given in.
    pub async fn run_scenarios(&self, scenarios: Vec<Scenario>) -> TestSuiteResult {
        let start = Instant::now();
        let total = scenarios.len();
        info!("Running {} test(s) with {} worker(s)...", total, self.config.workers);

        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut labels = Vec::with_capacity(total);
        let mut tasks = JoinSet::new();

        for (index, scenario) in scenarios.into_iter().enumerate() {
            labels.push((scenario.suite.clone(), scenario.name.clone()));
            let semaphore = Arc::clone(&semaphore);
            let launcher = Arc::clone(&self.launcher);
            let config = Arc::clone(&self.config);

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let suite = scenario.suite.clone();
                let name = scenario.name.clone();
                let started = Instant::now();

                let result = AssertUnwindSafe(run_one(launcher, config, scenario))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        let message = payload
                            .downcast_ref::<&str>()
                            .map(|s| s.to_string())
                            .or_else(|| payload.downcast_ref::<String>().cloned())
                            .unwrap_or_else(|| "non-string panic payload".to_string());
                        let e = E2eError::Panicked(message);
                        TestResult::failed(suite, name, started.elapsed().as_millis() as u64, &e)
                    });
                (index, result)
            });
        }

        let mut slots: Vec<Option<TestResult>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if result.success {
                        info!("✓ {} ({} ms)", result.full_name(), result.duration_ms);
                    } else {
                        error!(
                            "✗ {} - {}",
                            result.full_name(),
                            result.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                    slots[index] = Some(result);
                }
                Err(e) => error!("Scenario task aborted: {}", e),
            }
        }

        let results: Vec<TestResult> = slots
            .into_iter()
            .zip(labels)
            .map(|(slot, (suite, name))| {
                slot.unwrap_or_else(|| {
                    TestResult::failed(suite, name, 0, &E2eError::Panicked("task aborted".to_string()))
                })
            })
            .collect();

        let passed = results.iter().filter(|r| r.success).count();
        let failed = total - passed;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!("Test Results: {} passed, {} failed ({} ms)", passed, failed, duration_ms);

        TestSuiteResult {
            total,
            passed,
            failed,
            skipped: 0,
            duration_ms,
            results,
        }
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

async fn run_one(launcher: Arc<dyn SessionLauncher>, config: Arc<HarnessConfig>, scenario: Scenario) -> TestResult {
    let start = Instant::now();
    let suite = scenario.suite.clone();
    let name = scenario.name.clone();
    debug!("Running test: {}", scenario.full_name());

    let outcome = match launcher.launch(Arc::clone(&config)).await {
        Ok(session) => run_scoped(session, config.timeouts.test(), |fx| scenario.run(fx)).await,
        Err(e) => Err(e),
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(()) => TestResult {
            suite,
            name,
            success: true,
            duration_ms,
            error: None,
            environment_failure: false,
        },
        Err(e) => TestResult::failed(suite, name, duration_ms, &e),
    }
}
