//! Main test runner that orchestrates provisioning, Playwright, and teardown

use std::path::PathBuf;
use std::time::Instant;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::browser::{PlaywrightHandle, StepResult};
use crate::config::RunnerConfig;
use crate::error::{E2eError, E2eResult};
use crate::lifecycle::{FixtureLifecycle, TeardownReport};
use crate::scenario::{Mode, Scenario};
use crate::suite;
use crate::target;

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub group: String,
    pub success: bool,
    pub skipped: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
    pub failure_screenshot: Option<PathBuf>,
    pub teardown: Option<TeardownReport>,
}

impl TestResult {
    fn skipped(scenario: &Scenario) -> Self {
        Self {
            name: scenario.name.clone(),
            group: scenario.group.clone(),
            success: true,
            skipped: true,
            duration_ms: 0,
            steps: vec![],
            error: None,
            failure_screenshot: None,
            teardown: None,
        }
    }

    fn failed(scenario: &Scenario, error: String, duration_ms: u64) -> Self {
        Self {
            name: scenario.name.clone(),
            group: scenario.group.clone(),
            success: false,
            skipped: false,
            duration_ms,
            steps: vec![],
            error: Some(error),
            failure_screenshot: None,
            teardown: None,
        }
    }
}

/// Result of running all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

/// Which scenarios of a selection actually run
#[derive(Debug)]
pub struct RunPlan<'a> {
    pub run: Vec<&'a Scenario>,
    pub skip: Vec<&'a Scenario>,
}

/// Apply skip/focus modes. Focused scenarios run alone only when
/// `allow_focus` is set; otherwise their presence is an error.
pub fn plan(scenarios: &[Scenario], allow_focus: bool) -> E2eResult<RunPlan<'_>> {
    let focused: Vec<&Scenario> = scenarios.iter().filter(|s| s.mode == Mode::Focus).collect();

    if !focused.is_empty() && !allow_focus {
        return Err(E2eError::FocusedScenarios(
            focused.iter().map(|s| s.full_name()).collect(),
        ));
    }

    let (run, skip): (Vec<&Scenario>, Vec<&Scenario>) = scenarios.iter().partition(|s| {
        if focused.is_empty() {
            s.mode != Mode::Skip
        } else {
            s.mode == Mode::Focus
        }
    });

    Ok(RunPlan { run, skip })
}

/// Main E2E test runner
pub struct TestRunner {
    config: RunnerConfig,

    /// Whether the target answered once already
    target_checked: bool,
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            config,
            target_checked: false,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Built-in scenarios followed by any YAML scenarios on disk
    pub fn scenarios(&self) -> E2eResult<Vec<Scenario>> {
        let seed = self.config.suite.seed;
        let mut scenarios = suite::build_all(seed)?;

        let dir = &self.config.suite.scenarios_dir;
        if dir.is_dir() {
            let extra = Scenario::load_all(dir)?;
            debug!("Loaded {} YAML scenario(s) from {}", extra.len(), dir.display());
            scenarios.extend(extra.into_iter().map(|s| suite::with_login(s, seed)));
        }

        Ok(scenarios)
    }

    /// Make sure the application and its API respond
    pub async fn check_target(&mut self) -> E2eResult<()> {
        if self.target_checked {
            return Ok(()); // Already verified
        }

        let api = self.config.target.api()?;
        target::wait_until_reachable(&self.config.target, &api).await?;

        self.target_checked = true;
        Ok(())
    }

    /// Run every scenario
    pub async fn run_all(&mut self) -> E2eResult<TestSuiteResult> {
        let scenarios = self.scenarios()?;
        self.run_scenarios(&scenarios).await
    }

    /// Run scenarios matching a tag
    pub async fn run_tagged(&mut self, tag: &str) -> E2eResult<TestSuiteResult> {
        let filtered: Vec<Scenario> = self
            .scenarios()?
            .into_iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .collect();

        if filtered.is_empty() {
            return Err(E2eError::ScenarioNotFound(format!("tag '{}'", tag)));
        }
        self.run_scenarios(&filtered).await
    }

    /// Run the scenarios of one group
    pub async fn run_group(&mut self, group: &str) -> E2eResult<TestSuiteResult> {
        let filtered: Vec<Scenario> = self
            .scenarios()?
            .into_iter()
            .filter(|s| s.group == group)
            .collect();

        if filtered.is_empty() {
            return Err(E2eError::ScenarioNotFound(format!("group '{}'", group)));
        }
        self.run_scenarios(&filtered).await
    }

    /// Run a specific scenario by name (or `group > name`)
    pub async fn run_test(&mut self, name: &str) -> E2eResult<TestResult> {
        let scenario = self
            .scenarios()?
            .into_iter()
            .find(|s| s.name == name || s.full_name() == name)
            .ok_or_else(|| E2eError::ScenarioNotFound(name.to_string()))?;

        self.check_target().await?;
        let playwright = self.playwright()?;
        Ok(self.run_scenario(&playwright, &scenario).await)
    }

    /// Run a list of scenarios sequentially
    pub async fn run_scenarios(&mut self, scenarios: &[Scenario]) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();
        let plan = plan(scenarios, self.config.suite.allow_focus)?;

        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        // Ensure the target answers before spending a browser on it
        self.check_target().await?;
        let playwright = self.playwright()?;

        info!("Running {} scenario(s), skipping {}...", plan.run.len(), plan.skip.len());

        for scenario in &plan.run {
            let result = self.run_scenario(&playwright, scenario).await;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", scenario.full_name(), result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    scenario.full_name(),
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        for scenario in &plan.skip {
            info!("- {} (skipped)", scenario.full_name());
            results.push(TestResult::skipped(scenario));
        }

        let skipped = plan.skip.len();
        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!("Test Results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms);

        Ok(TestSuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            results,
        })
    }

    /// Provision, drive the browser, tear down. Failures land in the result.
    pub async fn run_scenario(&self, playwright: &PlaywrightHandle, scenario: &Scenario) -> TestResult {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario.full_name());

        let lifecycle = match self.config.target.api() {
            Ok(api) => FixtureLifecycle::new(api),
            Err(e) => return TestResult::failed(scenario, e.to_string(), 0),
        };

        if let Err(e) = lifecycle.setup(&scenario.setup).await {
            let elapsed = start.elapsed().as_millis() as u64;
            let teardown = self.teardown(&lifecycle, scenario).await;
            return TestResult {
                teardown,
                ..TestResult::failed(scenario, format!("Setup failed: {}", e), elapsed)
            };
        }

        let outcome = playwright.run_scenario(scenario).await;
        let teardown = self.teardown(&lifecycle, scenario).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(outcome) => TestResult {
                name: scenario.name.clone(),
                group: scenario.group.clone(),
                success: outcome.error.is_none(),
                skipped: false,
                duration_ms,
                steps: outcome.steps,
                error: outcome.error,
                failure_screenshot: outcome.failure_screenshot,
                teardown,
            },
            Err(e) => TestResult {
                teardown,
                ..TestResult::failed(scenario, e.to_string(), duration_ms)
            },
        }
    }

    async fn teardown(&self, lifecycle: &FixtureLifecycle, scenario: &Scenario) -> Option<TeardownReport> {
        if !self.config.suite.teardown || scenario.cleanup.is_empty() {
            return None;
        }

        let report = lifecycle.teardown(&scenario.cleanup).await;
        if !report.errors.is_empty() {
            warn!("Teardown of '{}' left data behind", scenario.full_name());
        }
        Some(report)
    }

    fn playwright(&self) -> E2eResult<PlaywrightHandle> {
        PlaywrightHandle::new(self.config.target.app_url(), self.config.browser.clone())
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        let output_dir = self.config.output_dir();
        std::fs::create_dir_all(&output_dir)?;

        let path = output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(name: &str, mode: Mode) -> Scenario {
        Scenario {
            name: name.to_string(),
            group: "g".to_string(),
            description: String::new(),
            tags: vec![],
            mode,
            requires_login: false,
            setup: vec![],
            steps: vec![],
            cleanup: vec![],
        }
    }

    fn names(list: &[&Scenario]) -> Vec<String> {
        list.iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_plan_runs_everything_but_skipped() {
        let scenarios = vec![
            scenario("a", Mode::Run),
            scenario("b", Mode::Skip),
            scenario("c", Mode::Run),
        ];
        let plan = plan(&scenarios, false).unwrap();
        assert_eq!(names(&plan.run), vec!["a", "c"]);
        assert_eq!(names(&plan.skip), vec!["b"]);
    }

    #[test]
    fn test_plan_rejects_focus_by_default() {
        let scenarios = vec![scenario("a", Mode::Run), scenario("b", Mode::Focus)];
        let err = plan(&scenarios, false).unwrap_err();
        match err {
            E2eError::FocusedScenarios(names) => assert_eq!(names, vec!["g > b"]),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_plan_focus_runs_alone_when_allowed() {
        let scenarios = vec![
            scenario("a", Mode::Run),
            scenario("b", Mode::Focus),
            scenario("c", Mode::Skip),
        ];
        let plan = plan(&scenarios, true).unwrap();
        assert_eq!(names(&plan.run), vec!["b"]);
        assert_eq!(names(&plan.skip), vec!["a", "c"]);
    }

    fn offline_runner() -> TestRunner {
        let mut config = RunnerConfig::default();
        config.suite.scenarios_dir = PathBuf::from("/nonexistent/scenarios");
        config.target.base_url = "http://127.0.0.1:9".to_string();
        config.target.api_url = "http://127.0.0.1:9/api".to_string();
        TestRunner::with_config(config)
    }

    #[tokio::test]
    async fn test_unknown_tag_is_not_found() {
        let err = offline_runner().run_tagged("no-such-tag").await.unwrap_err();
        assert!(matches!(err, E2eError::ScenarioNotFound(ref what) if what == "tag 'no-such-tag'"));
    }

    #[tokio::test]
    async fn test_unknown_group_is_not_found() {
        let err = offline_runner().run_group("No such group").await.unwrap_err();
        assert!(matches!(err, E2eError::ScenarioNotFound(_)));
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig {
            output_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let runner = TestRunner::with_config(config);

        let results = TestSuiteResult {
            total: 1,
            passed: 0,
            failed: 0,
            skipped: 1,
            duration_ms: 0,
            results: vec![TestResult::skipped(&scenario("a", Mode::Skip))],
        };
        let path = runner.write_results(&results).unwrap();

        let written: TestSuiteResult =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.skipped, 1);
        assert!(written.results[0].skipped);
    }
}
