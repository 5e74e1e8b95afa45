//! Scenario suites
//!
//! A [`Suite`] groups scenarios that share a `before_each` hook. Data-driven
//! groups expand into one [`Scenario`] per input, so a failing input never
//! hides the others.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use crate::config::HarnessConfig;
use crate::data::DataGenerator;
use crate::error::E2eResult;
use crate::fixture::Fixtures;

pub mod signin;
pub mod signup;

type Body = Box<dyn FnOnce(Fixtures) -> BoxFuture<'static, E2eResult<()>> + Send>;
type Hook = Arc<dyn Fn(Fixtures) -> BoxFuture<'static, E2eResult<()>> + Send + Sync>;

/// One independent test case
pub struct Scenario {
    pub suite: String,
    pub name: String,
    pub tags: Vec<String>,
    body: Body,
}

impl Scenario {
    pub fn new<F, Fut>(suite: impl Into<String>, name: impl Into<String>, body: F) -> Self
    where
        F: FnOnce(Fixtures) -> Fut + Send + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        Self {
            suite: suite.into(),
            name: name.into(),
            tags: Vec::new(),
            body: Box::new(move |fx| body(fx).boxed()),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} › {}", self.suite, self.name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Consume the scenario and run its body
    pub fn run(self, fixtures: Fixtures) -> BoxFuture<'static, E2eResult<()>> {
        (self.body)(fixtures)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish()
    }
}

pub struct Suite {
    name: String,
    tags: Vec<String>,
    before_each: Option<Hook>,
    scenarios: Vec<Scenario>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            before_each: None,
            scenarios: Vec::new(),
        }
    }

    /// Tag applied to every scenario added afterwards
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn before_each<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Fixtures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        self.before_each = Some(Arc::new(move |fx| hook(fx).boxed()));
        self
    }

    pub fn test<F, Fut>(&mut self, name: impl Into<String>, body: F)
    where
        F: FnOnce(Fixtures) -> Fut + Send + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        let hook = self.before_each.clone();
        let mut scenario = Scenario::new(self.name.clone(), name, move |fx: Fixtures| async move {
            if let Some(hook) = hook {
                hook(fx.clone()).await?;
            }
            body(fx).await
        });
        scenario.tags = self.tags.clone();
        self.scenarios.push(scenario);
    }

    pub fn into_scenarios(self) -> Vec<Scenario> {
        self.scenarios
    }
}

/// Every scenario of every suite, in declaration order
pub fn all(config: &HarnessConfig, data: &mut DataGenerator) -> Vec<Scenario> {
    let mut scenarios = signin::scenarios(config, data);
    scenarios.extend(signup::scenarios(config, data));
    scenarios
}
