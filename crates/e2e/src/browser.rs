//! Playwright browser automation
//!
//! A scenario is compiled into a single Playwright script so every step runs
//! in the same browser session. Each step reports a `@@step {json}` line on
//! stdout; the first failing step aborts the script.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};
use crate::scenario::{AttributeAssertion, Scenario, TestStep};

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

    pub fn parse(name: &str) -> Self {
        match name {
            "firefox" => Browser::Firefox,
            "webkit" => Browser::Webkit,
            _ => Browser::Chromium,
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaywrightConfig {
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Upper bound for every wait, action and assertion
    pub command_timeout_ms: u64,

    /// Interval for conditions Playwright cannot wait on natively
    pub poll_interval_ms: u64,

    /// Upper bound for one whole scenario
    pub scenario_timeout_ms: u64,

    pub screenshot_dir: PathBuf,
    pub screenshot_on_failure: bool,

    /// Directory holding `node_modules` with `playwright` and `@playwright/test`
    pub work_dir: PathBuf,
    pub node_binary: String,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            command_timeout_ms: 10_000,
            poll_interval_ms: 100,
            scenario_timeout_ms: 180_000,
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            screenshot_on_failure: true,
            work_dir: PathBuf::from("."),
            node_binary: "node".to_string(),
        }
    }
}

/// Result of executing a test step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot_path: Option<PathBuf>,
}

/// What one scenario script produced
#[derive(Debug, Clone)]
pub struct ScriptOutcome {
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
    pub failure_screenshot: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct StepRecord {
    index: usize,
    name: String,
    success: bool,
    duration_ms: u64,
    #[serde(default)]
    error: Option<String>,
}

const HEADER: &str = r#"const { chromium, firefox, webkit } = require('playwright');
const { expect } = require('@playwright/test');

const TIMEOUT = __TIMEOUT__;
const POLL_MS = __POLL__;
const emit = (record) => console.log('@@step ' + JSON.stringify(record));

const check = async (expected, actual, assertion) => {
  try {
    await assertion();
  } catch (_) {
    let found;
    try {
      found = JSON.stringify(await actual());
    } catch (_) {
      found = '<unavailable>';
    }
    throw new Error(`expected ${expected}; found ${found}`);
  }
};

(async () => {
  const browser = await __BROWSER__.launch({ headless: __HEADLESS__ });
  const context = await browser.newContext({
    viewport: { width: __WIDTH__, height: __HEIGHT__ }
  });
  const page = await context.newPage();
  page.setDefaultTimeout(TIMEOUT);
  const baseUrl = __BASE_URL__;

  const step = async (index, name, body) => {
    const started = Date.now();
    try {
      await body();
      emit({ index, name, success: true, duration_ms: Date.now() - started });
    } catch (error) {
      emit({ index, name, success: false, duration_ms: Date.now() - started, error: String(error.message) });
      throw error;
    }
  };

  const holdUrl = async (fragment, negate, holdMs) => {
    const deadline = Date.now() + TIMEOUT + holdMs;
    let since = null;
    while (Date.now() < deadline) {
      if (page.url().includes(fragment) !== negate) {
        if (since === null) since = Date.now();
        if (Date.now() - since >= holdMs) return;
      } else {
        since = null;
      }
      await page.waitForTimeout(POLL_MS);
    }
    const what = negate ? 'url without ' : 'url with ';
    const span = holdMs > 0 ? ` for ${holdMs}ms` : '';
    throw new Error(`expected ${what}${JSON.stringify(fragment)}${span}; found ${JSON.stringify(page.url())}`);
  };

  try {
"#;

const FOOTER: &str = r#"
  } catch (error) {
__FAILURE_SCREENSHOT__
    console.error(JSON.stringify({ success: false, error: String(error.message) }));
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})().catch((error) => {
  console.error(String(error && error.stack ? error.stack : error));
  process.exit(2);
});
"#;

/// Turns scenarios into Playwright scripts
#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    base_url: String,
    config: PlaywrightConfig,
}

impl ScriptBuilder {
    pub fn new(base_url: &str, config: PlaywrightConfig) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    /// Where the failure screenshot of `scenario` is written
    pub fn failure_screenshot_path(&self, scenario: &Scenario) -> PathBuf {
        self.config
            .screenshot_dir
            .join(format!("{}--failed.png", file_stem(&scenario.full_name())))
    }

    pub fn screenshot_path(&self, name: &str) -> PathBuf {
        self.config.screenshot_dir.join(format!("{}.png", file_stem(name)))
    }

    /// Build the Playwright script for a whole scenario
    pub fn build_script(&self, scenario: &Scenario) -> String {
        let mut script = HEADER
            .replace("__TIMEOUT__", &self.config.command_timeout_ms.to_string())
            .replace("__POLL__", &self.config.poll_interval_ms.to_string())
            .replace("__BROWSER__", self.config.browser.as_str())
            .replace("__HEADLESS__", if self.config.headless { "true" } else { "false" })
            .replace("__WIDTH__", &self.config.viewport_width.to_string())
            .replace("__HEIGHT__", &self.config.viewport_height.to_string())
            .replace("__BASE_URL__", &js(&self.base_url));

        for (i, step) in scenario.steps.iter().enumerate() {
            script.push_str(&format!(
                "\n    await step({}, {}, async () => {{\n",
                i,
                js(&step.label())
            ));
            script.push_str(&self.step_to_js(step));
            script.push_str("\n    });\n");
        }

        let screenshot = if self.config.screenshot_on_failure {
            let path = self.failure_screenshot_path(scenario);
            format!(
                "    await page.screenshot({{ path: {}, fullPage: true }}).catch(() => {{}});",
                js(&path.to_string_lossy())
            )
        } else {
            String::new()
        };
        script.push_str(&FOOTER.replace("__FAILURE_SCREENSHOT__", &screenshot));

        script
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, step: &TestStep) -> String {
        match step {
            TestStep::Navigate { url, wait_for_selector } => {
                let wait = wait_for_selector
                    .as_ref()
                    .map(|s| format!("\n      await page.locator({}).first().waitFor({{ state: 'visible' }});", js(s)))
                    .unwrap_or_default();
                format!("      await page.goto(baseUrl + {});{}", js(url), wait)
            }
            TestStep::Click { selector, position, timeout_ms } => {
                let timeout = timeout_ms.unwrap_or(self.config.command_timeout_ms);
                let position = position
                    .map(|p| format!(", position: {{ x: {}, y: {} }}", p.x, p.y))
                    .unwrap_or_default();
                format!(
                    "      await page.locator({}).first().click({{ timeout: {}{} }});",
                    js(selector),
                    timeout,
                    position
                )
            }
            TestStep::Fill { selector, value } => {
                format!("      await page.locator({}).first().fill({});", js(selector), js(value))
            }
            TestStep::Clear { selector } => {
                format!("      await page.locator({}).first().fill('');", js(selector))
            }
            TestStep::Press { selector, key } => match selector {
                Some(sel) => format!("      await page.locator({}).first().press({});", js(sel), js(key)),
                None => format!("      await page.keyboard.press({});", js(key)),
            },
            TestStep::Wait { selector, timeout_ms, state } => format!(
                "      await page.locator({}).first().waitFor({{ state: '{}', timeout: {} }});",
                js(selector),
                state.as_str(),
                timeout_ms
            ),
            TestStep::Assert {
                selector,
                has_text,
                visible,
                text,
                text_contains,
                value,
                class,
                attribute,
                count,
            } => {
                let mut lines = Vec::new();

                let mut locator = format!("page.locator({})", js(selector));
                if let Some(filter) = has_text {
                    locator.push_str(&format!(".filter({{ hasText: {} }})", js_regex(&regex::escape(filter))));
                }
                lines.push(format!("      const loc = {};", locator));

                let subject = match has_text {
                    Some(filter) => format!("{} containing {:?}", selector, filter),
                    None => selector.clone(),
                };
                let texts = "() => loc.allInnerTexts()";
                let counted = "() => loc.count()";

                if let Some(vis) = visible {
                    if *vis {
                        lines.push(check(
                            &format!("{} to be visible", subject),
                            counted,
                            "expect(loc.first()).toBeVisible({ timeout: TIMEOUT })",
                        ));
                    } else {
                        lines.push(check(
                            &format!("{} to be hidden", subject),
                            counted,
                            "expect(loc.first()).toBeHidden({ timeout: TIMEOUT })",
                        ));
                    }
                }

                if let Some(t) = text {
                    lines.push(check(
                        &format!("{} to have text {:?}", subject, t),
                        texts,
                        &format!("expect(loc.first()).toHaveText({}, {{ timeout: TIMEOUT }})", js(t)),
                    ));
                }

                if let Some(tc) = text_contains {
                    lines.push(check(
                        &format!("{} to contain {:?}", subject, tc),
                        texts,
                        &format!(
                            "expect(loc.filter({{ hasText: {} }}).first()).toBeVisible({{ timeout: TIMEOUT }})",
                            js_regex(&regex::escape(tc))
                        ),
                    ));
                }

                if let Some(v) = value {
                    lines.push(check(
                        &format!("{} to have value {:?}", subject, v),
                        "() => loc.first().inputValue()",
                        &format!("expect(loc.first()).toHaveValue({}, {{ timeout: TIMEOUT }})", js(v)),
                    ));
                }

                if let Some(c) = class {
                    let pattern = format!(r"(^|\s){}(\s|$)", regex::escape(c));
                    lines.push(check(
                        &format!("{} to have class {:?}", subject, c),
                        "() => loc.first().getAttribute('class')",
                        &format!("expect(loc.first()).toHaveClass({}, {{ timeout: TIMEOUT }})", js_regex(&pattern)),
                    ));
                }

                if let Some(attr) = attribute {
                    lines.push(attribute_check(&subject, attr));
                }

                if let Some(c) = count {
                    lines.push(check(
                        &format!("{} to match {} element(s)", subject, c),
                        counted,
                        &format!("expect(loc).toHaveCount({}, {{ timeout: TIMEOUT }})", c),
                    ));
                }

                lines.join("\n")
            }
            TestStep::AssertUrl { contains, negate, stable_for_ms } => format!(
                "      await holdUrl({}, {}, {});",
                js(contains),
                negate,
                stable_for_ms.unwrap_or(0)
            ),
            TestStep::Screenshot { name, selector, full_page } => {
                let path = self.screenshot_path(name);
                let path_str = js(&path.to_string_lossy());

                match selector {
                    Some(sel) => format!(
                        "      await page.locator({}).first().screenshot({{ path: {} }});",
                        js(sel),
                        path_str
                    ),
                    None => format!(
                        "      await page.screenshot({{ path: {}, fullPage: {} }});",
                        path_str, full_page
                    ),
                }
            }
            TestStep::Log { message } => {
                format!("      console.log({});", js(&format!("[scenario] {}", message)))
            }
        }
    }
}

/// Playwright browser handle
pub struct PlaywrightHandle {
    builder: ScriptBuilder,
    config: PlaywrightConfig,
}

impl PlaywrightHandle {
    /// Create a new Playwright handle
    pub fn new(base_url: &str, mut config: PlaywrightConfig) -> E2eResult<Self> {
        // Verify playwright is installed
        Self::check_playwright_installed(&config)?;

        // Scripts run from work_dir; screenshot paths must not depend on it
        config.screenshot_dir = absolute(&config.screenshot_dir)?;
        std::fs::create_dir_all(&config.screenshot_dir)?;

        Ok(Self {
            builder: ScriptBuilder::new(base_url, config.clone()),
            config,
        })
    }

    /// Check if Playwright is installed
    fn check_playwright_installed(config: &PlaywrightConfig) -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .current_dir(&config.work_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    pub fn builder(&self) -> &ScriptBuilder {
        &self.builder
    }

    /// Execute every step of `scenario` in one browser session
    pub async fn run_scenario(&self, scenario: &Scenario) -> E2eResult<ScriptOutcome> {
        let script = self.builder.build_script(scenario);

        // Write script to temp file
        let temp_dir = tempfile::Builder::new().prefix("conduit-e2e").tempdir()?;
        let script_path = temp_dir.path().join("scenario.js");
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let work_dir = absolute(&self.config.work_dir)?;
        let mut cmd = TokioCommand::new(&self.config.node_binary);
        cmd.arg(&script_path)
            .current_dir(&work_dir)
            .env("NODE_PATH", work_dir.join("node_modules"))
            .kill_on_drop(true);

        let limit = Duration::from_millis(self.config.scenario_timeout_ms);
        let output = tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| {
                E2eError::Timeout(format!(
                    "scenario '{}' after {} ms",
                    scenario.full_name(),
                    self.config.scenario_timeout_ms
                ))
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        for line in stdout.lines().filter(|l| l.starts_with("[scenario]")) {
            info!("{}", line);
        }

        let steps = parse_step_results(&stdout, scenario, &self.builder)?;

        if output.status.success() {
            return Ok(ScriptOutcome {
                steps,
                error: None,
                failure_screenshot: None,
            });
        }

        match steps.iter().find(|s| !s.success) {
            Some(failed) => {
                let reason = failed.error.clone().unwrap_or_else(|| "unknown error".to_string());
                let failure_screenshot = Some(self.builder.failure_screenshot_path(scenario))
                    .filter(|p| p.exists());
                Ok(ScriptOutcome {
                    error: Some(
                        E2eError::StepFailed {
                            step: failed.step_name.clone(),
                            reason,
                        }
                        .to_string(),
                    ),
                    steps,
                    failure_screenshot,
                })
            }
            None => Err(E2eError::Playwright(format!(
                "Script failed:\nstdout: {}\nstderr: {}",
                stdout, stderr
            ))),
        }
    }
}

/// Collect the `@@step` records a script printed
pub fn parse_step_results(
    stdout: &str,
    scenario: &Scenario,
    builder: &ScriptBuilder,
) -> E2eResult<Vec<StepResult>> {
    static STEP_LINE: OnceLock<Regex> = OnceLock::new();
    let pattern = STEP_LINE.get_or_init(|| Regex::new(r"(?m)^@@step (\{.*\})\s*$").expect("valid step pattern"));

    let mut results = Vec::new();
    for caps in pattern.captures_iter(stdout) {
        let record: StepRecord = serde_json::from_str(&caps[1])?;

        let screenshot_path = match scenario.steps.get(record.index) {
            Some(TestStep::Screenshot { name, .. }) if record.success => Some(builder.screenshot_path(name)),
            _ => None,
        };

        results.push(StepResult {
            success: record.success,
            step_name: record.name,
            duration_ms: record.duration_ms,
            error: record.error.map(|e| describe_failure(&e)),
            screenshot_path,
        });
    }

    Ok(results)
}

/// Render `expected X; found Y` failures as assertion errors
fn describe_failure(message: &str) -> String {
    static ASSERTION: OnceLock<Regex> = OnceLock::new();
    let pattern = ASSERTION.get_or_init(|| Regex::new(r"(?s)^expected (.+); found (.*)$").expect("valid assertion pattern"));

    match pattern.captures(message) {
        Some(caps) => E2eError::AssertionFailed {
            expected: caps[1].to_string(),
            actual: caps[2].to_string(),
        }
        .to_string(),
        None => message.to_string(),
    }
}

fn check(expected: &str, actual: &str, assertion: &str) -> String {
    format!(
        "      await check({}, {}, () => {});",
        js(expected),
        actual,
        assertion
    )
}

fn attribute_check(subject: &str, attr: &AttributeAssertion) -> String {
    let actual = format!("() => loc.first().getAttribute({})", js(&attr.name));

    let (expected, matcher) = match (&attr.value, &attr.contains) {
        (Some(v), _) => (
            format!("{} to have {}={:?}", subject, attr.name, v),
            format!("toHaveAttribute({}, {}, {{ timeout: TIMEOUT }})", js(&attr.name), js(v)),
        ),
        (None, Some(c)) => (
            format!("{} to have {} containing {:?}", subject, attr.name, c),
            format!(
                "toHaveAttribute({}, {}, {{ timeout: TIMEOUT }})",
                js(&attr.name),
                js_regex(&regex::escape(c))
            ),
        ),
        (None, None) => (
            format!("{} to have attribute {}", subject, attr.name),
            format!("toHaveAttribute({}, {{ timeout: TIMEOUT }})", js(&attr.name)),
        ),
    };

    check(&expected, &actual, &format!("expect(loc.first()).{}", matcher))
}

/// JavaScript string literal
fn js(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// JavaScript `RegExp` built from a pattern string
fn js_regex(pattern: &str) -> String {
    format!("new RegExp({})", js(pattern))
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    stem.split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn absolute(path: &Path) -> E2eResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Mode, Position};

    fn scenario(steps: Vec<TestStep>) -> Scenario {
        Scenario {
            name: "should do things".to_string(),
            group: "Group (positive)".to_string(),
            description: String::new(),
            tags: vec![],
            mode: Mode::Run,
            requires_login: false,
            setup: vec![],
            steps,
            cleanup: vec![],
        }
    }

    fn builder() -> ScriptBuilder {
        ScriptBuilder::new("http://localhost:4100/", PlaywrightConfig::default())
    }

    #[test]
    fn test_script_header_and_steps() {
        let script = builder().build_script(&scenario(vec![
            TestStep::Navigate {
                url: "/#/login".to_string(),
                wait_for_selector: None,
            },
            TestStep::Click {
                selector: ".sidebar".to_string(),
                position: Some(Position { x: 60, y: 45 }),
                timeout_ms: None,
            },
        ]));

        assert!(script.contains("const baseUrl = \"http://localhost:4100\";"));
        assert!(script.contains("chromium.launch({ headless: true })"));
        assert!(script.contains("await step(0, \"navigate:/#/login\""));
        assert!(script.contains("await page.goto(baseUrl + \"/#/login\");"));
        assert!(script.contains("position: { x: 60, y: 45 }"));
        assert!(!script.contains("__"));
    }

    #[test]
    fn test_values_are_escaped() {
        let script = builder().build_script(&scenario(vec![TestStep::Fill {
            selector: r#"[placeholder="What's this article about?"]"#.to_string(),
            value: "it's a \"quote\"\nnext line".to_string(),
        }]));

        assert!(script.contains(
            r#"page.locator("[placeholder=\"What's this article about?\"]").first().fill("it's a \"quote\"\nnext line");"#
        ));
    }

    #[test]
    fn test_assert_count_uses_text_filter() {
        let script = builder().build_script(&scenario(vec![TestStep::Assert {
            selector: ".card .card-text".to_string(),
            has_text: Some("Nice (1)".to_string()),
            visible: None,
            text: None,
            text_contains: None,
            value: None,
            class: None,
            attribute: None,
            count: Some(0),
        }]));

        assert!(script.contains(r#".filter({ hasText: new RegExp("Nice \\(1\\)") })"#));
        assert!(script.contains("expect(loc).toHaveCount(0, { timeout: TIMEOUT })"));
    }

    #[test]
    fn test_class_assertion_matches_whole_class() {
        let script = builder().build_script(&scenario(vec![TestStep::Assert {
            selector: ".btn".to_string(),
            has_text: None,
            visible: None,
            text: None,
            text_contains: None,
            value: None,
            class: Some("btn-primary".to_string()),
            attribute: None,
            count: None,
        }]));

        assert!(script.contains(r#"toHaveClass(new RegExp("(^|\\s)btn\\-primary(\\s|$)")"#));
    }

    #[test]
    fn test_url_hold() {
        let script = builder().build_script(&scenario(vec![TestStep::AssertUrl {
            contains: "/#/register".to_string(),
            negate: false,
            stable_for_ms: Some(1500),
        }]));

        assert!(script.contains(r#"await holdUrl("/#/register", false, 1500);"#));
    }

    #[test]
    fn test_failure_screenshot_toggle() {
        let with = builder().build_script(&scenario(vec![]));
        assert!(with.contains("group-positive-should-do-things--failed.png"));

        let config = PlaywrightConfig {
            screenshot_on_failure: false,
            ..Default::default()
        };
        let without = ScriptBuilder::new("http://localhost:4100", config).build_script(&scenario(vec![]));
        assert!(!without.contains("page.screenshot"));
    }

    #[test]
    fn test_parse_step_results() {
        let s = scenario(vec![
            TestStep::Screenshot {
                name: "Home Page".to_string(),
                selector: None,
                full_page: true,
            },
            TestStep::Clear {
                selector: "input".to_string(),
            },
        ]);
        let stdout = concat!(
            "noise\n",
            "@@step {\"index\":0,\"name\":\"screenshot:Home Page\",\"success\":true,\"duration_ms\":12}\n",
            "[scenario] hello\n",
            "@@step {\"index\":1,\"name\":\"clear:input\",\"success\":false,\"duration_ms\":5,",
            "\"error\":\"expected input to have value \\\"\\\"; found \\\"abc\\\"\"}\n",
        );

        let results = parse_step_results(stdout, &s, &builder()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert_eq!(
            results[0].screenshot_path.as_deref(),
            Some(Path::new("test-results/screenshots/home-page.png"))
        );
        assert!(!results[1].success);
        assert_eq!(
            results[1].error.as_deref(),
            Some(r#"Assertion failed: expected input to have value ""; found "abc""#)
        );
    }

    #[test]
    fn test_plain_failures_pass_through() {
        assert_eq!(describe_failure("Timeout 10000ms exceeded."), "Timeout 10000ms exceeded.");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Login (negative) > should fail!"), "login-negative-should-fail");
    }
}
