use crate::app::{messages, routes, selectors};
use crate::error::E2eResult;
use crate::session::{register_new_user, ScenarioContext};

use super::Group;

/// How long the client must stay put after a rejected submit
const STAYS_ON_ROUTE_MS: u64 = 1_500;

pub fn positive() -> Group {
    Group::new("Registration (positive)").scenario(
        "should allow to register a new user",
        &["registration", "smoke"],
        register_from_home,
    )
}

pub fn negative() -> Group {
    Group::new("Registration (negative)")
        .before_each(open_register)
        .scenario(
            "should not allow to register with an existing username",
            &["registration"],
            existing_username,
        )
        .scenario(
            "should not allow to register with an existing email",
            &["registration"],
            existing_email,
        )
        .scenario(
            "should not allow to register with blank username field",
            &["registration"],
            blank_username,
        )
        .scenario(
            "should not allow to register with blank email field",
            &["registration"],
            blank_email,
        )
        .scenario(
            "should not allow to register with blank password field",
            &["registration"],
            blank_password,
        )
        .scenario(
            "should not allow to register when email has invalid format",
            &["registration"],
            invalid_email,
        )
}

fn open_register(ctx: &mut ScenarioContext) -> E2eResult<()> {
    ctx.visit(routes::REGISTER);
    Ok(())
}

fn register_from_home(ctx: &mut ScenarioContext) -> E2eResult<()> {
    ctx.visit(routes::HOME)
        .click(selectors::NAV_REGISTER)
        .assert_url_contains(routes::REGISTER);
    register_new_user(ctx);
    Ok(())
}

fn existing_username(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.provision_user();

    ctx.fill(selectors::USERNAME_INPUT, &user.username)
        .fill(selectors::EMAIL_INPUT, &format!("new_{}", user.email))
        .fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::ERROR_MESSAGE, messages::USERNAME_TAKEN)
        .assert_signed_out();
    Ok(())
}

fn existing_email(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.provision_user();

    ctx.fill(selectors::USERNAME_INPUT, &format!("{}_new", user.username))
        .fill(selectors::EMAIL_INPUT, &user.email)
        .fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::ERROR_MESSAGE, messages::EMAIL_TAKEN)
        .assert_signed_out();
    Ok(())
}

fn blank_username(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.user_values();

    ctx.fill(selectors::EMAIL_INPUT, &user.email)
        .fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::ERROR_MESSAGE, messages::USERNAME_BLANK);
    Ok(())
}

fn blank_email(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.user_values();

    ctx.fill(selectors::USERNAME_INPUT, &user.username)
        .fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::ERROR_MESSAGE, messages::EMAIL_BLANK);
    Ok(())
}

fn blank_password(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.user_values();

    ctx.fill(selectors::USERNAME_INPUT, &user.username)
        .fill(selectors::EMAIL_INPUT, &user.email)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::ERROR_MESSAGE, messages::PASSWORD_BLANK);
    Ok(())
}

fn invalid_email(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.user_values();

    ctx.fill(selectors::USERNAME_INPUT, &user.username)
        .fill(selectors::EMAIL_INPUT, "email")
        .fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_url_stays(routes::REGISTER, STAYS_ON_ROUTE_MS)
        .assert_signed_out();
    Ok(())
}
