use crate::app::{routes, selectors};
use crate::error::E2eResult;
use crate::session::{liked_own_article, unliked_own_article, ScenarioContext};

use super::{hooks, Group};

pub fn positive() -> Group {
    Group::new("Profile screen (positive)")
        .before_each(hooks::login_and_open_home)
        .scenario("should allow to like own article", &["profile", "favorite"], like_own)
        .scenario("should allow to unlike own article", &["profile", "favorite"], unlike_own)
        .scenario(
            "should allow to Favorited Articles screen",
            &["profile"],
            favorited_articles,
        )
}

fn like_own(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let article = unliked_own_article(ctx)?;
    let button = selectors::favorite_button(&article.article_title);

    ctx.click(&button)
        .assert_class(&button, selectors::FAVORITED_CLASS);
    Ok(())
}

fn unlike_own(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let article = liked_own_article(ctx)?;
    let button = selectors::favorite_button(&article.article_title);

    ctx.click(&button)
        .assert_class(&button, selectors::UNFAVORITED_CLASS);
    Ok(())
}

fn favorited_articles(ctx: &mut ScenarioContext) -> E2eResult<()> {
    ctx.click(selectors::NAV_USER_PIC)
        .click(selectors::FAVORITED_TAB)
        .assert_url_contains(routes::FAVORITES_FRAGMENT);
    Ok(())
}
