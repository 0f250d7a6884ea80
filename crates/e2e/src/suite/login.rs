use crate::app::{messages, routes, selectors};
use crate::error::E2eResult;
use crate::session::ScenarioContext;

use super::Group;

pub fn positive() -> Group {
    Group::new("Login (positive)").scenario(
        "should allow to login registered user",
        &["login", "smoke"],
        login_registered,
    )
}

pub fn negative() -> Group {
    Group::new("Login (negative)")
        .before_each(open_login)
        .scenario("should not allow to login when email is blank", &["login"], blank_email)
        .scenario("should not allow to login when password is blank", &["login"], blank_password)
        .scenario(
            "should not allow to login with not registered email",
            &["login"],
            unknown_email,
        )
        .scenario(
            "should not allow to login with not registered password",
            &["login"],
            wrong_password,
        )
}

fn open_login(ctx: &mut ScenarioContext) -> E2eResult<()> {
    ctx.visit(routes::LOGIN);
    Ok(())
}

fn login_registered(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.provision_user();

    ctx.visit(routes::HOME)
        .click(selectors::NAV_LOGIN)
        .fill(selectors::EMAIL_INPUT, &user.email)
        .fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::NAV_LINK, &user.username);
    Ok(())
}

fn blank_email(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.provision_user();

    ctx.fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::ERROR_MESSAGE, messages::EMAIL_BLANK);
    Ok(())
}

fn blank_password(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.provision_user();

    ctx.fill(selectors::EMAIL_INPUT, &user.email)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::ERROR_MESSAGE, messages::PASSWORD_BLANK);
    Ok(())
}

fn unknown_email(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.provision_user();

    ctx.fill(selectors::EMAIL_INPUT, &format!("new_{}", user.email))
        .fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::ERROR_MESSAGE, messages::INVALID_CREDENTIALS);
    Ok(())
}

fn wrong_password(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let user = ctx.provision_user();

    ctx.fill(selectors::EMAIL_INPUT, &user.email)
        .fill(selectors::PASSWORD_INPUT, &format!("new{}", user.password))
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::ERROR_MESSAGE, messages::INVALID_CREDENTIALS)
        .assert_signed_out();
    Ok(())
}
