//! Runner configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::browser::PlaywrightConfig;
use crate::error::E2eResult;
use crate::target::TargetConfig;

/// Runner configuration, usually read from `conduit-e2e.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Application under test
    pub target: TargetConfig,

    /// Browser settings
    pub browser: PlaywrightConfig,

    /// Scenario selection and lifecycle
    pub suite: SuiteConfig,

    /// Output directory for results
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Directory of extra YAML scenarios (skipped if missing)
    pub scenarios_dir: PathBuf,

    /// Seed for fixture generation; random when unset
    pub seed: Option<u64>,

    /// Delete the articles of every account a scenario created
    pub teardown: bool,

    /// Let focused scenarios run alone instead of failing the run
    pub allow_focus: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            scenarios_dir: PathBuf::from("scenarios"),
            seed: None,
            teardown: true,
            allow_focus: false,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("test-results"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Browser;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = RunnerConfig::load(Path::new("/nonexistent/conduit-e2e.toml")).unwrap();
        assert!(config.suite.teardown);
        assert!(!config.suite.allow_focus);
        assert_eq!(config.browser.command_timeout_ms, 10_000);
        assert_eq!(config.output_dir(), PathBuf::from("test-results"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conduit-e2e.toml");
        std::fs::write(
            &path,
            r#"
output_dir = "out"

[target]
base_url = "http://localhost:4100"
api_url = "http://localhost:3000/api"

[browser]
browser = "firefox"
headless = false

[suite]
seed = 42
"#,
        )
        .unwrap();

        let config = RunnerConfig::load(&path).unwrap();
        assert_eq!(config.target.base_url, "http://localhost:4100");
        assert_eq!(config.target.startup_timeout_ms, 30_000);
        assert_eq!(config.browser.browser, Browser::Firefox);
        assert!(!config.browser.headless);
        assert_eq!(config.browser.viewport_width, 1280);
        assert_eq!(config.suite.seed, Some(42));
        assert!(config.suite.teardown);
        assert_eq!(config.output_dir(), PathBuf::from("out"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[browser]\nheadless = \"maybe\"\n").unwrap();

        assert!(RunnerConfig::load(&path).is_err());
    }
}
