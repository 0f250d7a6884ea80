//! Conduit E2E Test Framework
//!
//! This crate drives end-to-end scenarios against a deployed Conduit
//! (RealWorld) application:
//! - Generates unique users, articles and comments per scenario
//! - Provisions and cleans up fixture data through the Conduit REST API
//! - Compiles each scenario into one Playwright script so the browser
//!   session persists across steps
//! - Loads extra declarative scenarios from YAML
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Conduit E2E Runner (Rust)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── check_target() -> wait_until_reachable               │
//! │    ├── FixtureLifecycle::setup(provisions)  (REST API)      │
//! │    ├── PlaywrightHandle::run_scenario() -> ScriptOutcome    │
//! │    └── FixtureLifecycle::teardown(accounts) -> Report       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario (suite builders or YAML)                          │
//! │    ├── group, name, tags, mode (run | skip | focus)         │
//! │    ├── setup: [user | article]                              │
//! │    ├── steps: [Step]                                        │
//! │    │     ├── navigate { url }                               │
//! │    │     ├── click / fill / clear / press                   │
//! │    │     ├── wait { selector, state }                       │
//! │    │     ├── assert { selector, text?, class?, count? }     │
//! │    │     └── assert_url { contains, negate?, stable_for? }  │
//! │    └── cleanup: [User]                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod lifecycle;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod suite;
pub mod target;

pub use config::RunnerConfig;
pub use error::{E2eError, E2eResult};
pub use fixtures::{ArticleData, CommentData, FixtureGenerator, User};
pub use runner::{TestResult, TestRunner, TestSuiteResult};
pub use scenario::{Mode, Scenario, TestStep};
pub use session::ScenarioContext;
