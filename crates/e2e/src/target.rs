//! Target application - reachability checks before any scenario runs

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::api::ConduitApi;
use crate::error::{E2eError, E2eResult};

/// Where the application under test lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Front-end base URL; routes are appended to it
    pub base_url: String,

    /// Conduit API base URL used for provisioning and teardown
    pub api_url: String,

    /// How long to wait for both to respond
    pub startup_timeout_ms: u64,

    /// Per-request timeout for API calls
    pub request_timeout_ms: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://react-redux.realworld.io".to_string(),
            api_url: "https://api.realworld.io/api".to_string(),
            startup_timeout_ms: 30_000,
            request_timeout_ms: 10_000,
        }
    }
}

impl TargetConfig {
    /// Base URL without a trailing slash, ready to have routes appended
    pub fn app_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn api(&self) -> E2eResult<ConduitApi> {
        ConduitApi::new(&self.api_url, Duration::from_millis(self.request_timeout_ms))
    }
}

/// Poll the front end and the API until both answer or the timeout elapses
pub async fn wait_until_reachable(config: &TargetConfig, api: &ConduitApi) -> E2eResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let timeout = Duration::from_millis(config.startup_timeout_ms);
    let start = Instant::now();
    let mut attempts = 0;

    while start.elapsed() < timeout {
        attempts += 1;

        let app_ok = match client.get(config.app_url()).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("Front end returned {}", resp.status());
                false
            }
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for {} to respond...", config.app_url());
                }
                if !e.is_connect() {
                    warn!("Front end check error: {}", e);
                }
                false
            }
        };

        if app_ok {
            match api.ping().await {
                Ok(()) => {
                    info!("Target is reachable at {}", config.app_url());
                    return Ok(());
                }
                Err(e) => warn!("API check failed: {}", e),
            }
        }

        sleep(Duration::from_millis(500)).await;
    }

    Err(E2eError::TargetUnreachable {
        url: config.app_url().to_string(),
        attempts,
    })
}
