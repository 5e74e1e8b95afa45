//! Playwright browser automation
//!
//! A small Node program (embedded below) owns one browser, one fresh
//! context and its pages. Rust talks to it over stdin/stdout using
//! [`crate::protocol`]; stderr is forwarded to tracing.

use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{HarnessConfig, Viewport};
use crate::driver::Driver;
use crate::error::{E2eError, E2eResult};
use crate::protocol::{Command, Request, Response};

/// Extra time granted on top of a command's own timeout before the Rust
/// side gives up on the driver
const COMMAND_GRACE: Duration = Duration::from_secs(5);

/// Deadline for commands that carry no timeout of their own
const UNTIMED_COMMAND_DEADLINE: Duration = Duration::from_secs(10);

const CLOSE_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" | "safari" => Ok(Browser::Webkit),
            other => Err(E2eError::Config(format!("unknown browser: {}", other))),
        }
    }
}

/// Launch options handed to the driver program as its only argument
#[derive(Debug, Serialize)]
struct LaunchOptions<'a> {
    browser: &'static str,
    headless: bool,
    viewport: Viewport,
    base_url: &'a str,
}

struct DriverIo {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    /// A request was written and its response not yet read. Left set when
    /// the caller's future is dropped mid-command.
    in_flight: bool,
    closed: bool,
}

impl DriverIo {
    async fn send(&mut self, id: u64, command: &Command) -> E2eResult<()> {
        let mut line = serde_json::to_string(&Request { id, command })?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> E2eResult<Response> {
        loop {
            let line = self.stdout.next_line().await?.ok_or(E2eError::DriverClosed)?;
            let line = line.trim();
            if !line.starts_with('{') {
                debug!(target: "playwright", "stdout: {}", line);
                continue;
            }
            return serde_json::from_str(line)
                .map_err(|e| E2eError::Protocol(format!("bad response {:?}: {}", line, e)));
        }
    }

    fn kill(&mut self) {
        self.closed = true;
        if let Err(e) = self.child.start_kill() {
            debug!("Driver already exited: {}", e);
        }
    }
}

/// One Node process hosting one isolated browser context
pub struct PlaywrightDriver {
    io: Mutex<DriverIo>,
    next_id: AtomicU64,
    // Keeps the materialised driver script alive for the child's lifetime
    _script_dir: tempfile::TempDir,
}

impl PlaywrightDriver {
    /// Verify that Node can resolve the Playwright packages from the
    /// current directory
    pub async fn check_installed(node_binary: &Path) -> E2eResult<()> {
        let status = TokioCommand::new(node_binary)
            .args([
                "-e",
                "require.resolve('playwright'); require.resolve('@playwright/test')",
            ])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Spawn the driver and wait until its browser context is ready
    pub async fn launch(config: &HarnessConfig) -> E2eResult<Self> {
        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_SCRIPT)?;

        let options = serde_json::to_string(&LaunchOptions {
            browser: config.browser.as_str(),
            headless: config.headless,
            viewport: config.viewport,
            base_url: &config.base_url,
        })?;

        debug!("Launching Playwright driver: {}", script_path.display());

        let mut child = TokioCommand::new(&config.node_binary)
            .arg(&script_path)
            .arg(options)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                E2eError::Playwright(format!(
                    "Failed to spawn {}: {}",
                    config.node_binary.display(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Protocol("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Protocol("driver stdout unavailable".to_string()))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "playwright", "{}", line);
                }
            });
        }

        let mut io = DriverIo {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            in_flight: false,
            closed: false,
        };

        let ready = match timeout(config.timeouts.navigation(), io.receive()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                io.kill();
                return Err(e);
            }
            Err(_) => {
                io.kill();
                return Err(E2eError::Timeout(format!("{} browser launch", config.browser.as_str())));
            }
        };
        if !ready.ok {
            io.kill();
            let message = ready
                .error
                .map(|f| f.message)
                .unwrap_or_else(|| "browser launch failed".to_string());
            return Err(E2eError::Playwright(message));
        }

        info!("Playwright {} context ready", config.browser.as_str());

        Ok(Self {
            io: Mutex::new(io),
            next_id: AtomicU64::new(1),
            _script_dir: script_dir,
        })
    }
}

#[async_trait]
impl Driver for PlaywrightDriver {
    async fn execute(&self, command: Command) -> E2eResult<serde_json::Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let deadline = command
            .timeout()
            .map(|t| t + COMMAND_GRACE)
            .unwrap_or(UNTIMED_COMMAND_DEADLINE);

        let mut io = self.io.lock().await;
        if io.closed {
            return Err(E2eError::DriverClosed);
        }
        if io.in_flight {
            // An earlier caller was cancelled before reading its answer; the
            // stream can no longer be matched to requests.
            io.kill();
            return Err(E2eError::DriverClosed);
        }

        debug!(id, op = command.name(), target = %command.target(), "driver command");

        io.in_flight = true;
        io.send(id, &command).await?;
        let response = match timeout(deadline, io.receive()).await {
            Ok(response) => response?,
            Err(_) => {
                io.kill();
                return Err(E2eError::Timeout(format!("{} on {}", command.name(), command.target())));
            }
        };
        io.in_flight = false;

        if response.id != id {
            io.kill();
            return Err(E2eError::Protocol(format!(
                "response id {} does not match request id {}",
                response.id, id
            )));
        }

        response.into_result(&command)
    }

    async fn close(&self) -> E2eResult<()> {
        let mut io = self.io.lock().await;
        if io.closed {
            return Ok(());
        }
        if io.in_flight {
            io.kill();
            return Ok(());
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let graceful = async {
            io.send(id, &Command::Close).await?;
            io.receive().await?;
            io.child.wait().await?;
            Ok::<_, E2eError>(())
        };

        let outcome = timeout(CLOSE_DEADLINE, graceful).await;
        match outcome {
            Ok(Ok(())) => {
                io.closed = true;
                debug!("Playwright driver closed");
            }
            Ok(Err(e)) => {
                warn!("Driver did not close cleanly: {}", e);
                io.kill();
            }
            Err(_) => {
                warn!("Driver close timed out, killing");
                io.kill();
            }
        }
        Ok(())
    }
}

/// Node-side driver. Commands run strictly one at a time; every locator is
/// rebuilt from its description on each command.
const DRIVER_SCRIPT: &str = r#"
const path = require('path');
const readline = require('readline');
const { createRequire } = require('module');

const requireFromCwd = createRequire(path.join(process.cwd(), 'package.json'));
const { chromium, firefox, webkit } = requireFromCwd('playwright');
const { expect } = requireFromCwd('@playwright/test');

const options = JSON.parse(process.argv[2]);
const engines = { chromium, firefox, webkit };
const pages = new Map();
let nextPage = 1;

function send(message) {
  process.stdout.write(JSON.stringify(message) + '\n');
}

function resolve(page, locator) {
  let scope = page;
  for (const link of locator.chain) {
    switch (link.kind) {
      case 'role': scope = scope.getByRole(link.role, { name: link.name }); break;
      case 'label': scope = scope.getByLabel(link.text); break;
      case 'text': scope = scope.getByText(link.text); break;
      case 'css':
        scope = link.has
          ? scope.locator(link.selector, { has: resolve(page, link.has) })
          : scope.locator(link.selector);
        break;
      case 'xpath': scope = scope.locator('xpath=' + link.expr); break;
      default: throw new Error('unknown selector kind: ' + link.kind);
    }
  }
  return scope;
}

function pageFor(id) {
  const page = pages.get(id);
  if (!page) throw new Error('unknown page #' + id);
  return page;
}

function matcher(c, target) {
  return c.negated ? expect(target).not : expect(target);
}

const handlers = {
  goto: async (c) => { await pageFor(c.page).goto(c.url, { timeout: c.timeout_ms }); },
  fill: async (c) => { await resolve(pageFor(c.page), c.locator).fill(c.value, { timeout: c.timeout_ms }); },
  click: async (c) => { await resolve(pageFor(c.page), c.locator).click({ timeout: c.timeout_ms }); },
  press: async (c) => { await pageFor(c.page).keyboard.press(c.key); },
  click_for_popup: async (c) => {
    const page = pageFor(c.page);
    const [popup] = await Promise.all([
      page.waitForEvent('popup', { timeout: c.timeout_ms }),
      resolve(page, c.locator).click({ timeout: c.timeout_ms }),
    ]);
    const id = nextPage++;
    pages.set(id, popup);
    return id;
  },
  wait_for_load: async (c) => { await pageFor(c.page).waitForLoadState('load', { timeout: c.timeout_ms }); },
  is_visible: async (c) => resolve(pageFor(c.page), c.locator).isVisible(),
  get_attribute: async (c) => resolve(pageFor(c.page), c.locator).getAttribute(c.name, { timeout: c.timeout_ms }),
  expect_visible: async (c) => {
    await matcher(c, resolve(pageFor(c.page), c.locator)).toBeVisible({ timeout: c.timeout_ms });
  },
  expect_attribute: async (c) => {
    await matcher(c, resolve(pageFor(c.page), c.locator)).toHaveAttribute(c.name, c.value, { timeout: c.timeout_ms });
  },
  expect_value: async (c) => {
    await matcher(c, resolve(pageFor(c.page), c.locator)).toHaveValue(c.value, { timeout: c.timeout_ms });
  },
  expect_url: async (c) => {
    const url = c.url.regex !== undefined ? new RegExp(c.url.regex) : c.url.exact;
    await expect(pageFor(c.page)).toHaveURL(url, { timeout: c.timeout_ms });
  },
};

const ASSERTIONS = new Set(['expect_visible', 'expect_attribute', 'expect_value', 'expect_url']);
const ACTIONS = new Set(['goto', 'fill', 'click', 'press', 'click_for_popup', 'wait_for_load', 'get_attribute']);

(async () => {
  let browser;
  try {
    browser = await engines[options.browser].launch({ headless: options.headless });
    const context = await browser.newContext({ viewport: options.viewport, baseURL: options.base_url });
    pages.set(0, await context.newPage());
  } catch (error) {
    send({ id: 0, ok: false, error: { kind: 'error', message: String((error && error.message) || error) } });
    process.exit(1);
  }
  send({ id: 0, ok: true, value: 'ready' });

  const lines = readline.createInterface({ input: process.stdin });
  for await (const line of lines) {
    if (!line.trim()) continue;
    let request;
    try {
      request = JSON.parse(line);
    } catch (error) {
      console.error('unparseable request: ' + line);
      continue;
    }
    if (request.op === 'close') {
      await browser.close();
      send({ id: request.id, ok: true, value: null });
      process.exit(0);
    }
    try {
      const handler = handlers[request.op];
      if (!handler) throw new Error('unknown op: ' + request.op);
      const value = await handler(request);
      send({ id: request.id, ok: true, value: value === undefined ? null : value });
    } catch (error) {
      const kind = ASSERTIONS.has(request.op) ? 'assertion' : ACTIONS.has(request.op) ? 'action' : 'error';
      send({ id: request.id, ok: false, error: { kind, message: String((error && error.message) || error) } });
    }
  }
  await browser.close();
})();
"#;
