//! Per-scenario fixtures
//!
//! Every scenario gets one fresh browser session and one instance of each
//! page abstraction bound to it. [`run_scoped`] guarantees the session is
//! closed whether the body passes, fails or runs out of time.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::config::HarnessConfig;
use crate::error::{E2eError, E2eResult};
use crate::pages::{PageObject, SigninPage, SignupPage, VerifyEmailPage};
use crate::playwright::PlaywrightDriver;
use crate::session::{BrowserSession, PageHandle};

#[derive(Clone)]
pub struct Fixtures {
    /// The context's first page; URL assertions after redirects target it
    pub page: PageHandle,
    pub signin: SigninPage,
    pub signup: SignupPage,
    pub verify_email: VerifyEmailPage,
}

impl Fixtures {
    pub fn bind(session: &Arc<BrowserSession>) -> Self {
        let page = session.main_page();
        Self {
            signin: SigninPage::bind(page.clone()),
            signup: SignupPage::bind(page.clone()),
            verify_email: VerifyEmailPage::bind(page.clone()),
            page,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        self.page.config()
    }
}

/// Launch a Playwright-backed session for one scenario
pub async fn launch_session(config: Arc<HarnessConfig>) -> E2eResult<Arc<BrowserSession>> {
    let driver = PlaywrightDriver::launch(&config).await?;
    Ok(Arc::new(BrowserSession::new(Box::new(driver), config)))
}

/// Run `body` against fixtures bound to `session` within `budget`, then
/// close the session. A body still pending at the deadline is dropped and
/// reported as [`E2eError::Timeout`].
pub async fn run_scoped<F, Fut>(session: Arc<BrowserSession>, budget: Duration, body: F) -> E2eResult<()>
where
    F: FnOnce(Fixtures) -> Fut,
    Fut: Future<Output = E2eResult<()>>,
{
    let fixtures = Fixtures::bind(&session);
    let outcome = match timeout(budget, body(fixtures)).await {
        Ok(result) => result,
        Err(_) => Err(E2eError::Timeout(format!("scenario exceeded {} ms", budget.as_millis()))),
    };

    if let Err(e) = session.close().await {
        warn!("Failed to release browser session: {}", e);
    }
    outcome
}
