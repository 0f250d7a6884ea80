use crate::app::{routes, selectors};
use crate::error::E2eResult;
use crate::session::{
    followed_to_user_profile, liked_author_article, redirected_to_user_article,
    unfollowed_to_user_profile, unliked_author_article, ScenarioContext,
};

use super::{hooks, Group};

pub fn positive() -> Group {
    Group::new("Main page (positive)")
        .before_each(hooks::login_and_open_home)
        .scenario("should allow to Global Feed screen", &["feed"], global_feed)
        .scenario("should allow to Popular tag implementations", &["feed"], popular_tag)
        .scenario(
            "should allow access to other author profiles",
            &["profile"],
            other_author_profile,
        )
        .scenario("should allow to follow the user", &["follow"], follow)
        .scenario("should allow to unfollow the user", &["follow"], unfollow)
        .scenario(
            "should allow to like articles of other users",
            &["favorite"],
            like_other_article,
        )
        .scenario(
            "should allow to unlike other user articles",
            &["favorite"],
            unlike_other_article,
        )
        .scenario(
            "should allow to read articles of other users",
            &["article"],
            read_other_article,
        )
        .scenario(
            "should allow to post comment for other user articles",
            &["comment"],
            comment_other_article,
        )
        .scenario(
            "should allow to delete the posted comment",
            &["comment"],
            delete_posted_comment,
        )
}

fn global_feed(ctx: &mut ScenarioContext) -> E2eResult<()> {
    ctx.click(selectors::GLOBAL_FEED_TAB)
        .assert_contains(selectors::ACTIVE_FEED_TAB, "Global Feed");
    Ok(())
}

fn popular_tag(ctx: &mut ScenarioContext) -> E2eResult<()> {
    ctx.click(selectors::POPULAR_TAG)
        .assert_visible(selectors::ACTIVE_TAG_TAB);
    Ok(())
}

fn other_author_profile(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let author = ctx.provision_user();
    let article = ctx.provision_article(&author);

    ctx.click(selectors::GLOBAL_FEED_TAB)
        .click(&selectors::preview_author(&article.article_title))
        .assert_visible(selectors::USER_IMAGE)
        .assert_contains(selectors::PROFILE_NAME, &author.username);
    Ok(())
}

fn follow(ctx: &mut ScenarioContext) -> E2eResult<()> {
    unfollowed_to_user_profile(ctx);

    ctx.click(selectors::FOLLOW_BUTTON)
        .assert_contains(selectors::UNFOLLOW_BUTTON, "Unfollow");
    Ok(())
}

fn unfollow(ctx: &mut ScenarioContext) -> E2eResult<()> {
    followed_to_user_profile(ctx);

    ctx.click(selectors::UNFOLLOW_BUTTON)
        .assert_contains(selectors::FOLLOW_BUTTON, "Follow");
    Ok(())
}

fn like_other_article(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let (_, article) = unliked_author_article(ctx);
    let button = selectors::favorite_button(&article.article_title);

    ctx.click(&button)
        .assert_class(&button, selectors::FAVORITED_CLASS);
    Ok(())
}

fn unlike_other_article(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let (_, article) = liked_author_article(ctx);
    let button = selectors::favorite_button(&article.article_title);

    ctx.click(&button)
        .assert_class(&button, selectors::UNFAVORITED_CLASS);
    Ok(())
}

fn read_other_article(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let (_, article) = unliked_author_article(ctx);

    ctx.click(&selectors::preview_link(&article.article_title))
        .assert_url_contains(routes::ARTICLE_FRAGMENT)
        .assert_contains(selectors::ARTICLE_HEADING, &article.article_title);
    Ok(())
}

fn comment_other_article(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let comment = ctx.comment().comment;
    redirected_to_user_article(ctx);

    ctx.fill(selectors::COMMENT_INPUT, &comment)
        .click(selectors::POST_COMMENT)
        .assert_text(selectors::COMMENT_TEXT, &comment);
    Ok(())
}

fn delete_posted_comment(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let comment = ctx.comment().comment;
    redirected_to_user_article(ctx);

    ctx.fill(selectors::COMMENT_INPUT, &comment)
        .click(selectors::POST_COMMENT)
        .assert_count_with_text(selectors::COMMENT_TEXT, &comment, 1)
        .click(&selectors::comment_delete_button(&comment))
        .assert_count_with_text(selectors::COMMENT_TEXT, &comment, 0);
    Ok(())
}
