//! Conduit E2E runner entry point
//!
//! Exit codes: 0 when every scenario passed, 1 when any failed,
//! 2 when the run could not start (bad config, unreachable target, focus).

use std::path::PathBuf;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use conduit_e2e::browser::Browser;
use conduit_e2e::runner::TestSuiteResult;
use conduit_e2e::{E2eResult, RunnerConfig, TestRunner};

#[derive(Parser, Debug)]
#[command(name = "conduit-e2e")]
#[command(about = "Browser end-to-end suite for Conduit")]
struct Args {
    /// Runner configuration file
    #[arg(short, long, env = "CONDUIT_E2E_CONFIG", default_value = "conduit-e2e.toml")]
    config: PathBuf,

    /// Front-end base URL
    #[arg(long, env = "CONDUIT_BASE_URL")]
    base_url: Option<String>,

    /// Conduit API base URL
    #[arg(long, env = "CONDUIT_API_URL")]
    api_url: Option<String>,

    /// Run only scenarios with this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only scenarios of this group
    #[arg(short, long)]
    group: Option<String>,

    /// Run a single scenario by name or `group > name`
    #[arg(short, long)]
    name: Option<String>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long, env = "CONDUIT_BROWSER")]
    browser: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Per-command timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Seed for fixture generation
    #[arg(long, env = "CONDUIT_SEED")]
    seed: Option<u64>,

    /// Keep the articles created by scenarios
    #[arg(long)]
    no_teardown: bool,

    /// Run focused scenarios alone instead of refusing to start
    #[arg(long)]
    allow_focus: bool,

    /// Directory of extra YAML scenarios
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List scenarios and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn into_config(self) -> E2eResult<(RunnerConfig, Selection, bool)> {
        let mut config = RunnerConfig::load(&self.config)?;

        if let Some(url) = self.base_url {
            config.target.base_url = url;
        }
        if let Some(url) = self.api_url {
            config.target.api_url = url;
        }
        if let Some(browser) = self.browser {
            config.browser.browser = Browser::parse(&browser);
        }
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(timeout) = self.timeout_ms {
            config.browser.command_timeout_ms = timeout;
        }
        if self.seed.is_some() {
            config.suite.seed = self.seed;
        }
        if self.no_teardown {
            config.suite.teardown = false;
        }
        if self.allow_focus {
            config.suite.allow_focus = true;
        }
        if let Some(dir) = self.scenarios {
            config.suite.scenarios_dir = dir;
        }
        if self.output.is_some() {
            config.output_dir = self.output;
        }

        let selection = match (self.name, self.group, self.tag) {
            (Some(name), _, _) => Selection::Name(name),
            (None, Some(group), _) => Selection::Group(group),
            (None, None, Some(tag)) => Selection::Tag(tag),
            (None, None, None) => Selection::All,
        };

        Ok((config, selection, self.list))
    }
}

enum Selection {
    All,
    Name(String),
    Group(String),
    Tag(String),
}

fn main() {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    match rt.block_on(async_main(args)) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> E2eResult<bool> {
    let (config, selection, list) = args.into_config()?;
    let mut runner = TestRunner::with_config(config);

    if list {
        for scenario in runner.scenarios()? {
            println!("{}  [{}]", scenario.full_name(), scenario.tags.join(", "));
        }
        return Ok(true);
    }

    let results = match selection {
        Selection::Name(name) => {
            let result = runner.run_test(&name).await?;
            TestSuiteResult {
                total: 1,
                passed: if result.success { 1 } else { 0 },
                failed: if result.success { 0 } else { 1 },
                skipped: 0,
                duration_ms: result.duration_ms,
                results: vec![result],
            }
        }
        Selection::Group(group) => runner.run_group(&group).await?,
        Selection::Tag(tag) => runner.run_tagged(&tag).await?,
        Selection::All => runner.run_all().await?,
    };

    runner.write_results(&results)?;

    Ok(results.failed == 0)
}
