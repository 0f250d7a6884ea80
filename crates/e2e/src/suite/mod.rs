//! Built-in scenario catalog
//!
//! Scenarios are grouped the way the flows are exercised: each [`Group`]
//! carries an optional `before_each` that runs ahead of every scenario in it.
//! Building a scenario is pure: it only records steps, provisions and
//! accounts in a [`ScenarioContext`].

mod article;
mod login;
mod main_page;
mod profile;
mod registration;
mod settings;

use crate::error::E2eResult;
use crate::fixtures::{self, FixtureGenerator};
use crate::scenario::Scenario;
use crate::session::ScenarioContext;

pub type Build = fn(&mut ScenarioContext) -> E2eResult<()>;

pub struct ScenarioDef {
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub build: Build,
}

pub struct Group {
    pub name: &'static str,
    pub before_each: Option<Build>,
    pub scenarios: Vec<ScenarioDef>,
}

impl Group {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            before_each: None,
            scenarios: Vec::new(),
        }
    }

    pub fn before_each(mut self, build: Build) -> Self {
        self.before_each = Some(build);
        self
    }

    pub fn scenario(mut self, name: &'static str, tags: &'static [&'static str], build: Build) -> Self {
        self.scenarios.push(ScenarioDef { name, tags, build });
        self
    }
}

/// Every built-in group, in execution order
pub fn groups() -> Vec<Group> {
    vec![
        registration::positive(),
        registration::negative(),
        login::positive(),
        login::negative(),
        main_page::positive(),
        article::positive(),
        article::negative(),
        settings::positive(),
        settings::negative(),
        profile::positive(),
    ]
}

/// Build every built-in scenario. A seed fixes word choices and passwords;
/// account names still differ from run to run.
pub fn build_all(seed: Option<u64>) -> E2eResult<Vec<Scenario>> {
    match seed {
        Some(seed) => build_for_run(seed, fixtures::run_nonce()),
        None => build_with(|_| FixtureGenerator::from_entropy()),
    }
}

/// Build every built-in scenario from `seed` under an explicit run nonce
pub fn build_for_run(seed: u64, run: u64) -> E2eResult<Vec<Scenario>> {
    build_with(|index| FixtureGenerator::seeded_for_run(seed.wrapping_add(index as u64), run))
}

fn build_with(fixtures_for: impl Fn(usize) -> FixtureGenerator) -> E2eResult<Vec<Scenario>> {
    let mut scenarios = Vec::new();

    for group in groups() {
        for def in &group.scenarios {
            let mut ctx = ScenarioContext::new(fixtures_for(scenarios.len()));

            if let Some(before_each) = group.before_each {
                before_each(&mut ctx)?;
            }
            (def.build)(&mut ctx)?;

            scenarios.push(ctx.into_scenario(group.name, def.name, def.tags));
        }
    }

    Ok(scenarios)
}

/// Prepend a fresh sign-in to a declarative scenario that asks for one
pub fn with_login(scenario: Scenario, seed: Option<u64>) -> Scenario {
    if !scenario.requires_login {
        return scenario;
    }

    let fixtures = match seed {
        Some(seed) => FixtureGenerator::seeded(seed),
        None => FixtureGenerator::from_entropy(),
    };
    let mut ctx = ScenarioContext::new(fixtures);
    crate::session::login_user(&mut ctx);

    let prefix = ctx.into_scenario(&scenario.group, &scenario.name, &[]);

    let mut steps = prefix.steps;
    steps.extend(scenario.steps);
    let mut setup = prefix.setup;
    setup.extend(scenario.setup);
    let mut cleanup = prefix.cleanup;
    cleanup.extend(scenario.cleanup);

    Scenario {
        requires_login: false,
        steps,
        setup,
        cleanup,
        ..scenario
    }
}

/// Shared `before_each` bodies
pub(crate) mod hooks {
    use crate::app::routes;
    use crate::error::E2eResult;
    use crate::session::{login_user, ScenarioContext};

    pub fn login_and_open_home(ctx: &mut ScenarioContext) -> E2eResult<()> {
        login_user(ctx);
        ctx.visit(routes::HOME);
        Ok(())
    }

    pub fn login_and_open_editor(ctx: &mut ScenarioContext) -> E2eResult<()> {
        login_user(ctx);
        ctx.visit(routes::EDITOR);
        Ok(())
    }

    pub fn login_and_open_settings(ctx: &mut ScenarioContext) -> E2eResult<()> {
        login_user(ctx);
        ctx.visit(routes::SETTINGS);
        Ok(())
    }
}
