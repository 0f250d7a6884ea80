use crate::app::{messages, routes, selectors};
use crate::error::{E2eError, E2eResult};
use crate::session::ScenarioContext;

use super::{hooks, Group};

const STAYS_ON_ROUTE_MS: u64 = 1_500;

pub fn positive() -> Group {
    Group::new("Settings (positive)")
        .before_each(hooks::login_and_open_home)
        .scenario("should allow to update current settings", &["settings"], update_settings)
        .scenario("should allow to logout", &["settings", "smoke"], logout)
}

pub fn negative() -> Group {
    Group::new("Settings (negative)")
        .before_each(hooks::login_and_open_settings)
        .scenario(
            "should not allow to update settings when username field is empty",
            &["settings"],
            empty_username,
        )
        .scenario(
            "should not allow to update settings when email field is empty",
            &["settings"],
            empty_email,
        )
        .scenario(
            "should not allow to update settings with invalid format email",
            &["settings"],
            invalid_email,
        )
}

fn update_settings(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let renamed = ctx.user_values();
    let bio = ctx.article().what_about;

    ctx.click(selectors::NAV_SETTINGS)
        .assert_url_contains(routes::SETTINGS);
    wait_for_profile_form(ctx)?;
    ctx.clear(selectors::USERNAME_INPUT)
        .fill(selectors::USERNAME_INPUT, &renamed.username)
        .fill(selectors::BIO_INPUT, &bio)
        .click(selectors::UPDATE_SETTINGS)
        .assert_contains(selectors::NAV_LINK, &renamed.username);
    Ok(())
}

fn logout(ctx: &mut ScenarioContext) -> E2eResult<()> {
    ctx.click(selectors::NAV_SETTINGS)
        .click(selectors::LOGOUT_BUTTON)
        .assert_signed_out();
    Ok(())
}

fn empty_username(ctx: &mut ScenarioContext) -> E2eResult<()> {
    wait_for_profile_form(ctx)?;
    ctx.clear(selectors::USERNAME_INPUT)
        .click(selectors::UPDATE_SETTINGS)
        .assert_contains(selectors::ERROR_MESSAGE, messages::USERNAME_BLANK);
    Ok(())
}

fn empty_email(ctx: &mut ScenarioContext) -> E2eResult<()> {
    wait_for_profile_form(ctx)?;
    ctx.clear(selectors::EMAIL_INPUT)
        .click(selectors::UPDATE_SETTINGS)
        .assert_contains(selectors::ERROR_MESSAGE, messages::EMAIL_BLANK);
    Ok(())
}

fn invalid_email(ctx: &mut ScenarioContext) -> E2eResult<()> {
    wait_for_profile_form(ctx)?;
    ctx.clear(selectors::EMAIL_INPUT)
        .fill(selectors::EMAIL_INPUT, "email")
        .click(selectors::UPDATE_SETTINGS)
        .assert_url_stays(routes::SETTINGS, STAYS_ON_ROUTE_MS);
    Ok(())
}

/// The settings form is populated from the current user after it renders;
/// edits made before that are overwritten.
fn wait_for_profile_form(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx
        .signed_in()
        .cloned()
        .ok_or_else(|| E2eError::Precondition("settings scenarios need a signed-in user".to_string()))?;

    ctx.assert_value(selectors::USERNAME_INPUT, &user.username)
        .assert_value(selectors::EMAIL_INPUT, &user.email);
    Ok(())
}
