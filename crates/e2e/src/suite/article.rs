use crate::app::{messages, routes, selectors};
use crate::error::E2eResult;
use crate::session::{create_article, login_user, publish_article, ScenarioContext};

use super::{hooks, Group};

const STAYS_ON_ROUTE_MS: u64 = 1_500;

pub fn positive() -> Group {
    Group::new("Article (positive)")
        .scenario(
            "should allow to create a new article filing in required fields",
            &["article", "smoke"],
            create_with_required_fields,
        )
        .scenario("should allow to edit created article", &["article"], edit_article)
        .scenario("should allow to post a comment to article", &["comment"], post_comment)
        .scenario("should allow to delete created comment", &["comment"], delete_comment)
        .scenario("should allow to delete created article", &["article"], delete_article)
}

pub fn negative() -> Group {
    Group::new("Article (negative)")
        .before_each(hooks::login_and_open_editor)
        .scenario(
            "should not allow to create a new article when Article Title is blank",
            &["article"],
            blank_title,
        )
        .scenario(
            "should not allow to create a new article when description is blank",
            &["article"],
            blank_description,
        )
        .scenario(
            "should not allow to create a new article when body is blank",
            &["article"],
            blank_body,
        )
}

fn create_with_required_fields(ctx: &mut ScenarioContext) -> E2eResult<()> {
    login_user(ctx);
    let article = ctx.article();
    publish_article(ctx, &article);
    ctx.assert_url_contains(routes::ARTICLE_FRAGMENT);
    Ok(())
}

fn edit_article(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let original = create_article(ctx);
    let edited = ctx.article();

    ctx.click(selectors::EDIT_ARTICLE)
        // The editor loads the article asynchronously; clear only once it has
        .assert_value(selectors::ARTICLE_TITLE_INPUT, &original.article_title)
        .clear(selectors::ARTICLE_TITLE_INPUT)
        .fill(selectors::ARTICLE_TITLE_INPUT, &edited.article_title)
        .fill(selectors::ARTICLE_TAGS_INPUT, &edited.enter_tag)
        .press(selectors::ARTICLE_TAGS_INPUT, "Enter")
        .click(selectors::PUBLISH_BUTTON)
        .assert_contains(selectors::ARTICLE_HEADING, &edited.article_title);
    Ok(())
}

fn post_comment(ctx: &mut ScenarioContext) -> E2eResult<()> {
    create_article(ctx);
    let comment = ctx.comment().comment;

    ctx.fill(selectors::COMMENT_INPUT, &comment)
        .click(selectors::POST_COMMENT)
        .assert_contains(selectors::COMMENT_TEXT, &comment);
    Ok(())
}

fn delete_comment(ctx: &mut ScenarioContext) -> E2eResult<()> {
    create_article(ctx);
    let comment = ctx.comment().comment;

    ctx.fill(selectors::COMMENT_INPUT, &comment)
        .click(selectors::POST_COMMENT)
        .assert_count_with_text(selectors::COMMENT_TEXT, &comment, 1)
        .click(&selectors::comment_delete_button(&comment))
        .assert_count_with_text(selectors::COMMENT_TEXT, &comment, 0);
    Ok(())
}

fn delete_article(ctx: &mut ScenarioContext) -> E2eResult<()> {
    create_article(ctx);

    ctx.click(selectors::DELETE_ARTICLE)
        .assert_url_excludes(routes::ARTICLE_FRAGMENT)
        .assert_url_contains("/#/");
    Ok(())
}

fn fill_editor(ctx: &mut ScenarioContext, title: Option<&str>, about: Option<&str>, body: Option<&str>, tag: &str) {
    if let Some(title) = title {
        ctx.fill(selectors::ARTICLE_TITLE_INPUT, title);
    }
    if let Some(about) = about {
        ctx.fill(selectors::ARTICLE_ABOUT_INPUT, about);
    }
    if let Some(body) = body {
        ctx.fill(selectors::ARTICLE_BODY_INPUT, body);
    }
    ctx.fill(selectors::ARTICLE_TAGS_INPUT, tag)
        .press(selectors::ARTICLE_TAGS_INPUT, "Enter")
        .click(selectors::PUBLISH_BUTTON);
}

fn blank_title(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let article = ctx.article();

    fill_editor(ctx, None, Some(&article.what_about), Some(&article.write_article), &article.enter_tag);
    ctx.assert_contains(selectors::ERROR_MESSAGES, messages::TITLE_BLANK)
        .assert_url_stays(routes::EDITOR, STAYS_ON_ROUTE_MS);
    Ok(())
}

fn blank_description(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let article = ctx.article();

    fill_editor(ctx, Some(&article.article_title), None, Some(&article.write_article), &article.enter_tag);
    ctx.assert_contains(selectors::ERROR_MESSAGES, messages::DESCRIPTION_BLANK);
    Ok(())
}

fn blank_body(ctx: &mut ScenarioContext) -> E2eResult<()> {
    let article = ctx.article();

    fill_editor(ctx, Some(&article.article_title), Some(&article.what_about), None, &article.enter_tag);
    ctx.assert_contains(selectors::ERROR_MESSAGES, messages::BODY_BLANK);
    Ok(())
}
