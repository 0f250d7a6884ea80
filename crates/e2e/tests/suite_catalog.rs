//! Properties of the built-in scenario catalog, checked without a browser

use std::collections::HashSet;

use conduit_e2e::app::{messages, routes, selectors};
use conduit_e2e::scenario::Provision;
use conduit_e2e::{suite, Mode, Scenario, TestStep};
use test_case::test_case;

fn catalog() -> Vec<Scenario> {
    suite::build_all(Some(42)).expect("catalog builds")
}

fn find<'a>(scenarios: &'a [Scenario], group: &str, name: &str) -> &'a Scenario {
    scenarios
        .iter()
        .find(|s| s.group == group && s.name == name)
        .unwrap_or_else(|| panic!("missing scenario {} > {}", group, name))
}

fn asserts_contains(scenario: &Scenario, selector: &str, text: &str) -> bool {
    scenario.steps.iter().any(|step| match step {
        TestStep::Assert { selector: s, text_contains: Some(t), .. } => s == selector && t == text,
        _ => false,
    })
}

fn asserts_signed_out(scenario: &Scenario) -> bool {
    asserts_contains(scenario, selectors::NAV_LOGIN, "Sign in")
}

fn stays_on(scenario: &Scenario, route: &str) -> bool {
    scenario.steps.iter().any(|step| match step {
        TestStep::AssertUrl { contains, negate: false, stable_for_ms: Some(ms) } => {
            contains == route && *ms > 0
        }
        _ => false,
    })
}

#[test]
fn test_catalog_covers_every_group() {
    let scenarios = catalog();
    let groups: HashSet<&str> = scenarios.iter().map(|s| s.group.as_str()).collect();

    assert_eq!(groups.len(), 10);
    assert!(scenarios.len() >= 35);
}

#[test]
fn test_names_unique_within_groups() {
    let scenarios = catalog();
    let mut seen = HashSet::new();
    for scenario in &scenarios {
        assert!(seen.insert(scenario.full_name()), "duplicate {}", scenario.full_name());
    }
}

#[test]
fn test_nothing_focused_or_skipped() {
    for scenario in catalog() {
        assert_eq!(scenario.mode, Mode::Run, "{}", scenario.full_name());
        assert!(!scenario.steps.is_empty(), "{}", scenario.full_name());
    }
}

#[test]
fn test_every_created_account_is_cleaned_up() {
    for scenario in catalog() {
        for provision in &scenario.setup {
            if let Provision::User { user } = provision {
                assert!(
                    scenario.cleanup.contains(user),
                    "{} leaks {}",
                    scenario.full_name(),
                    user.email
                );
            }
        }
    }
}

#[test]
fn test_articles_are_provisioned_after_their_authors() {
    for scenario in catalog() {
        let mut registered = HashSet::new();
        for provision in &scenario.setup {
            match provision {
                Provision::User { user } => {
                    registered.insert(user.email.clone());
                }
                Provision::Article { author, .. } => {
                    assert!(registered.contains(&author.email), "{}", scenario.full_name());
                }
            }
        }
    }
}

#[test]
fn test_existing_username_shows_error_and_stays_signed_out() {
    let scenarios = catalog();
    let scenario = find(
        &scenarios,
        "Registration (negative)",
        "should not allow to register with an existing username",
    );

    assert!(asserts_contains(scenario, selectors::ERROR_MESSAGE, messages::USERNAME_TAKEN));
    assert!(asserts_signed_out(scenario));
    assert!(matches!(scenario.setup.first(), Some(Provision::User { .. })));
}

#[test]
fn test_invalid_email_registration_stays_on_register() {
    let scenarios = catalog();
    let scenario = find(
        &scenarios,
        "Registration (negative)",
        "should not allow to register when email has invalid format",
    );

    assert!(stays_on(scenario, routes::REGISTER));
    assert!(asserts_signed_out(scenario));
}

#[test]
fn test_wrong_password_is_rejected() {
    let scenarios = catalog();
    let scenario = find(
        &scenarios,
        "Login (negative)",
        "should not allow to login with not registered password",
    );

    assert!(asserts_contains(scenario, selectors::ERROR_MESSAGE, messages::INVALID_CREDENTIALS));
    assert!(asserts_signed_out(scenario));
}

#[test]
fn test_deleted_comment_is_gone() {
    let scenarios = catalog();
    let scenario = find(
        &scenarios,
        "Article (positive)",
        "should allow to delete created comment",
    );

    let counts: Vec<usize> = scenario
        .steps
        .iter()
        .filter_map(|step| match step {
            TestStep::Assert { selector, count: Some(count), has_text: Some(_), .. }
                if selector == selectors::COMMENT_TEXT => Some(*count),
            _ => None,
        })
        .collect();
    assert_eq!(counts, vec![1, 0]);
}

#[test]
fn test_blank_title_keeps_editor_open() {
    let scenarios = catalog();
    let scenario = find(
        &scenarios,
        "Article (negative)",
        "should not allow to create a new article when Article Title is blank",
    );

    assert!(asserts_contains(scenario, selectors::ERROR_MESSAGES, messages::TITLE_BLANK));
    assert!(stays_on(scenario, routes::EDITOR));
    assert!(!scenario.steps.iter().any(|step| matches!(
        step,
        TestStep::Fill { selector, .. } if selector == selectors::ARTICLE_TITLE_INPUT
    )));
}

#[test_case("Main page (positive)", routes::LOGIN ; "main page")]
#[test_case("Article (negative)", routes::EDITOR ; "editor")]
#[test_case("Settings (negative)", routes::SETTINGS ; "settings")]
fn test_before_each_runs_ahead_of_every_scenario(group: &str, route: &str) {
    let scenarios = catalog();
    let in_group: Vec<&Scenario> = scenarios.iter().filter(|s| s.group == group).collect();
    assert!(!in_group.is_empty());

    for scenario in in_group {
        let visits: Vec<&str> = scenario
            .steps
            .iter()
            .filter_map(|step| match step {
                TestStep::Navigate { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect();
        assert!(visits.contains(&route), "{} never visits {}", scenario.full_name(), route);
    }
}

#[test]
fn test_same_seed_gives_same_shapes() {
    let a = suite::build_all(Some(7)).unwrap();
    let b = suite::build_all(Some(7)).unwrap();

    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.full_name(), y.full_name());
        assert_eq!(x.steps.len(), y.steps.len());
        assert_eq!(x.setup.len(), y.setup.len());
    }
}

#[test]
fn test_fixture_values_differ_between_builds() {
    // The process-wide sequence keeps tokens unique even for equal seeds
    let a = suite::build_all(Some(7)).unwrap();
    let b = suite::build_all(Some(7)).unwrap();

    let emails = |scenarios: &[Scenario]| -> HashSet<String> {
        scenarios.iter().flat_map(|s| s.cleanup.iter().map(|u| u.email.clone())).collect()
    };
    assert!(emails(&a).is_disjoint(&emails(&b)));
}

#[test]
fn test_yaml_scenario_gets_login_prefix() {
    let yaml = r#"
name: global feed loads
group: YAML
requires_login: true
steps:
  - action: click
    selector: '.feed-toggle .nav-link:has-text("Global Feed")'
"#;
    let scenario = suite::with_login(Scenario::from_yaml(yaml).unwrap(), Some(1));

    assert!(!scenario.requires_login);
    assert_eq!(scenario.cleanup.len(), 1);
    assert!(matches!(
        scenario.steps.first(),
        Some(TestStep::Navigate { url, .. }) if url == routes::LOGIN
    ));
    assert!(matches!(scenario.steps.last(), Some(TestStep::Click { .. })));
}

#[test]
fn test_bundled_yaml_scenarios_load() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    let scenarios = Scenario::load_all(&dir).unwrap();

    assert_eq!(scenarios.len(), 2);
    assert!(scenarios.iter().all(|s| s.mode == Mode::Run));
    assert!(scenarios.iter().any(|s| s.requires_login));
}

#[test]
fn test_reruns_with_same_seed_register_new_accounts() {
    let first = suite::build_for_run(42, 1_700_000_000_000).unwrap();
    let second = suite::build_for_run(42, 1_700_000_360_000).unwrap();

    let emails = |scenarios: &[Scenario]| -> HashSet<String> {
        scenarios.iter().flat_map(|s| s.cleanup.iter().map(|u| u.email.clone())).collect()
    };
    let (a, b) = (emails(&first), emails(&second));
    assert!(!a.is_empty());
    assert!(a.is_disjoint(&b));
}

#[test]
fn test_registration_opens_form_from_home() {
    let scenarios = catalog();
    let scenario = find(&scenarios, "Registration (positive)", "should allow to register a new user");

    assert!(matches!(
        scenario.steps.first(),
        Some(TestStep::Navigate { url, .. }) if url == routes::HOME
    ));
    assert!(scenario.steps.iter().any(|step| matches!(
        step,
        TestStep::Click { selector, .. } if selector == selectors::NAV_REGISTER
    )));

    let user = &scenario.cleanup[0];
    assert_eq!(scenario.cleanup.len(), 1);
    assert!(scenario.setup.is_empty());
    assert!(asserts_contains(scenario, selectors::NAV_LINK, &user.username));
}
