//! Session commands: reusable composite actions that bring the browser to a
//! known precondition state.
//!
//! Commands append steps (and API provisions where the precondition is data)
//! to a [`ScenarioContext`] and hand back the fixtures they used so the
//! calling scenario can assert against the same values. Every command ends on
//! a condition that proves the state has settled.

use crate::app::{routes, selectors};
use crate::error::{E2eError, E2eResult};
use crate::fixtures::{ArticleData, CommentData, FixtureGenerator, User};
use crate::scenario::{Mode, Provision, Scenario, TestStep};

/// Accumulates the steps, provisions and accounts of one scenario
pub struct ScenarioContext {
    fixtures: FixtureGenerator,
    steps: Vec<TestStep>,
    setup: Vec<Provision>,
    cleanup: Vec<User>,
    signed_in: Option<User>,
}

impl ScenarioContext {
    pub fn new(fixtures: FixtureGenerator) -> Self {
        Self {
            fixtures,
            steps: Vec::new(),
            setup: Vec::new(),
            cleanup: Vec::new(),
            signed_in: None,
        }
    }

    /// Fresh user that will be registered during this scenario
    pub fn new_user(&mut self) -> User {
        let user = self.fixtures.user();
        self.cleanup.push(user.clone());
        user
    }

    /// Fresh user values that are only typed into forms, never registered
    pub fn user_values(&mut self) -> User {
        self.fixtures.user()
    }

    pub fn article(&mut self) -> ArticleData {
        self.fixtures.article()
    }

    pub fn comment(&mut self) -> CommentData {
        self.fixtures.comment()
    }

    /// User currently signed in through a session command
    pub fn signed_in(&self) -> Option<&User> {
        self.signed_in.as_ref()
    }

    pub fn set_signed_in(&mut self, user: User) {
        self.signed_in = Some(user);
    }

    /// Register a fresh account through the API before the browser starts
    pub fn provision_user(&mut self) -> User {
        let user = self.new_user();
        self.setup.push(Provision::User { user: user.clone() });
        user
    }

    /// Publish a fresh article as `author` through the API
    pub fn provision_article(&mut self, author: &User) -> ArticleData {
        let article = self.article();
        self.setup.push(Provision::Article {
            author: author.clone(),
            article: article.clone(),
        });
        article
    }

    pub fn step(&mut self, step: TestStep) -> &mut Self {
        self.steps.push(step);
        self
    }

    pub fn visit(&mut self, route: &str) -> &mut Self {
        self.step(TestStep::Navigate {
            url: route.to_string(),
            wait_for_selector: None,
        })
    }

    pub fn click(&mut self, selector: &str) -> &mut Self {
        self.step(TestStep::Click {
            selector: selector.to_string(),
            position: None,
            timeout_ms: None,
        })
    }

    pub fn fill(&mut self, selector: &str, value: &str) -> &mut Self {
        self.step(TestStep::Fill {
            selector: selector.to_string(),
            value: value.to_string(),
        })
    }

    pub fn clear(&mut self, selector: &str) -> &mut Self {
        self.step(TestStep::Clear {
            selector: selector.to_string(),
        })
    }

    pub fn press(&mut self, selector: &str, key: &str) -> &mut Self {
        self.step(TestStep::Press {
            selector: Some(selector.to_string()),
            key: key.to_string(),
        })
    }

    /// Some element matching `selector` contains `text`
    pub fn assert_contains(&mut self, selector: &str, text: &str) -> &mut Self {
        self.step(TestStep::Assert {
            selector: selector.to_string(),
            has_text: None,
            visible: None,
            text: None,
            text_contains: Some(text.to_string()),
            value: None,
            class: None,
            attribute: None,
            count: None,
        })
    }

    /// First element matching `selector` has exactly `text`
    pub fn assert_text(&mut self, selector: &str, text: &str) -> &mut Self {
        self.step(TestStep::Assert {
            selector: selector.to_string(),
            has_text: None,
            visible: None,
            text: Some(text.to_string()),
            text_contains: None,
            value: None,
            class: None,
            attribute: None,
            count: None,
        })
    }

    pub fn assert_visible(&mut self, selector: &str) -> &mut Self {
        self.step(TestStep::Assert {
            selector: selector.to_string(),
            has_text: None,
            visible: Some(true),
            text: None,
            text_contains: None,
            value: None,
            class: None,
            attribute: None,
            count: None,
        })
    }

    pub fn assert_value(&mut self, selector: &str, value: &str) -> &mut Self {
        self.step(TestStep::Assert {
            selector: selector.to_string(),
            has_text: None,
            visible: None,
            text: None,
            text_contains: None,
            value: Some(value.to_string()),
            class: None,
            attribute: None,
            count: None,
        })
    }

    pub fn assert_class(&mut self, selector: &str, class: &str) -> &mut Self {
        self.step(TestStep::Assert {
            selector: selector.to_string(),
            has_text: None,
            visible: None,
            text: None,
            text_contains: None,
            value: None,
            class: Some(class.to_string()),
            attribute: None,
            count: None,
        })
    }

    /// Exactly `count` elements match `selector` and contain `text`
    pub fn assert_count_with_text(&mut self, selector: &str, text: &str, count: usize) -> &mut Self {
        self.step(TestStep::Assert {
            selector: selector.to_string(),
            has_text: Some(text.to_string()),
            visible: None,
            text: None,
            text_contains: None,
            value: None,
            class: None,
            attribute: None,
            count: Some(count),
        })
    }

    pub fn assert_url_contains(&mut self, fragment: &str) -> &mut Self {
        self.step(TestStep::AssertUrl {
            contains: fragment.to_string(),
            negate: false,
            stable_for_ms: None,
        })
    }

    pub fn assert_url_excludes(&mut self, fragment: &str) -> &mut Self {
        self.step(TestStep::AssertUrl {
            contains: fragment.to_string(),
            negate: true,
            stable_for_ms: None,
        })
    }

    /// URL keeps containing `fragment` for `stable_for_ms`
    pub fn assert_url_stays(&mut self, fragment: &str, stable_for_ms: u64) -> &mut Self {
        self.step(TestStep::AssertUrl {
            contains: fragment.to_string(),
            negate: false,
            stable_for_ms: Some(stable_for_ms),
        })
    }

    /// The header still offers "Sign in", i.e. nobody is authenticated
    pub fn assert_signed_out(&mut self) -> &mut Self {
        self.assert_contains(selectors::NAV_LOGIN, "Sign in")
    }

    pub fn into_scenario(self, group: &str, name: &str, tags: &[&str]) -> Scenario {
        Scenario {
            name: name.to_string(),
            group: group.to_string(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            mode: Mode::Run,
            requires_login: false,
            setup: self.setup,
            steps: self.steps,
            cleanup: self.cleanup,
        }
    }
}

/// Register a fresh user through the sign-up form
pub fn register_new_user(ctx: &mut ScenarioContext) -> User {
    let user = ctx.new_user();

    ctx.visit(routes::REGISTER)
        .fill(selectors::USERNAME_INPUT, &user.username)
        .fill(selectors::EMAIL_INPUT, &user.email)
        .fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::NAV_LINK, &user.username);

    ctx.set_signed_in(user.clone());
    user
}

/// Register a fresh user and sign in with it through the login form
pub fn login_user(ctx: &mut ScenarioContext) -> User {
    let user = ctx.provision_user();

    ctx.visit(routes::LOGIN)
        .fill(selectors::EMAIL_INPUT, &user.email)
        .fill(selectors::PASSWORD_INPUT, &user.password)
        .click(selectors::SIGN_IN_BUTTON)
        .assert_contains(selectors::NAV_LINK, &user.username);

    ctx.set_signed_in(user.clone());
    user
}

/// Fill and publish the editor form from the home page header
pub fn publish_article(ctx: &mut ScenarioContext, article: &ArticleData) {
    ctx.click(selectors::NAV_COMPOSE)
        .fill(selectors::ARTICLE_TITLE_INPUT, &article.article_title)
        .fill(selectors::ARTICLE_ABOUT_INPUT, &article.what_about)
        .fill(selectors::ARTICLE_BODY_INPUT, &article.write_article)
        .fill(selectors::ARTICLE_TAGS_INPUT, &article.enter_tag)
        .press(selectors::ARTICLE_TAGS_INPUT, "Enter")
        .click(selectors::PUBLISH_BUTTON)
        .assert_contains(selectors::ARTICLE_HEADING, &article.article_title);
}

/// Sign in a fresh user and publish a fresh article; ends on the article page
pub fn create_article(ctx: &mut ScenarioContext) -> ArticleData {
    login_user(ctx);
    let article = ctx.article();
    publish_article(ctx, &article);
    article
}

/// Another author with one article, ready to be linked to
fn provision_author(ctx: &mut ScenarioContext) -> (User, ArticleData) {
    let author = ctx.provision_user();
    let article = ctx.provision_article(&author);
    (author, article)
}

/// Open another author's profile while not following them
pub fn unfollowed_to_user_profile(ctx: &mut ScenarioContext) -> User {
    let (author, _) = provision_author(ctx);

    ctx.visit(&routes::profile(&author.username))
        .assert_contains(selectors::PROFILE_NAME, &author.username)
        .assert_contains(selectors::FOLLOW_BUTTON, "Follow");

    author
}

/// Open another author's profile and follow them
pub fn followed_to_user_profile(ctx: &mut ScenarioContext) -> User {
    let author = unfollowed_to_user_profile(ctx);

    ctx.click(selectors::FOLLOW_BUTTON)
        .assert_contains(selectors::UNFOLLOW_BUTTON, "Unfollow");

    author
}

/// Open another author's profile with their article not favorited
pub fn unliked_author_article(ctx: &mut ScenarioContext) -> (User, ArticleData) {
    let (author, article) = provision_author(ctx);

    ctx.visit(&routes::profile(&author.username)).assert_class(
        &selectors::favorite_button(&article.article_title),
        selectors::UNFAVORITED_CLASS,
    );

    (author, article)
}

/// Open another author's profile with their article favorited
pub fn liked_author_article(ctx: &mut ScenarioContext) -> (User, ArticleData) {
    let (author, article) = unliked_author_article(ctx);
    favorite(ctx, &article);
    (author, article)
}

/// Open the signed-in user's profile with one of their articles not favorited
pub fn unliked_own_article(ctx: &mut ScenarioContext) -> E2eResult<ArticleData> {
    let owner = ctx.signed_in().cloned().ok_or_else(|| {
        E2eError::Precondition("own-article helpers need a signed-in user".to_string())
    })?;
    let article = ctx.provision_article(&owner);

    ctx.visit(&routes::profile(&owner.username)).assert_class(
        &selectors::favorite_button(&article.article_title),
        selectors::UNFAVORITED_CLASS,
    );

    Ok(article)
}

/// Open the signed-in user's profile with one of their articles favorited
pub fn liked_own_article(ctx: &mut ScenarioContext) -> E2eResult<ArticleData> {
    let article = unliked_own_article(ctx)?;
    favorite(ctx, &article);
    Ok(article)
}

/// Open another author's article page
pub fn redirected_to_user_article(ctx: &mut ScenarioContext) -> (User, ArticleData) {
    let (author, article) = provision_author(ctx);

    ctx.visit(&routes::profile(&author.username))
        .click(&selectors::preview_link(&article.article_title))
        .assert_url_contains(routes::ARTICLE_FRAGMENT)
        .assert_contains(selectors::ARTICLE_HEADING, &article.article_title);

    (author, article)
}

fn favorite(ctx: &mut ScenarioContext, article: &ArticleData) {
    let button = selectors::favorite_button(&article.article_title);
    ctx.click(&button)
        .assert_class(&button, selectors::FAVORITED_CLASS);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ScenarioContext {
        ScenarioContext::new(FixtureGenerator::seeded(1))
    }

    #[test]
    fn test_register_new_user_steps() {
        let mut ctx = ctx();
        let user = register_new_user(&mut ctx);
        let scenario = ctx.into_scenario("g", "n", &[]);

        assert!(scenario.setup.is_empty());
        assert_eq!(scenario.cleanup, vec![user.clone()]);
        assert!(matches!(
            &scenario.steps[0],
            TestStep::Navigate { url, .. } if url == routes::REGISTER
        ));
        assert!(matches!(
            scenario.steps.last(),
            Some(TestStep::Assert { text_contains: Some(t), .. }) if *t == user.username
        ));
    }

    #[test]
    fn test_login_user_provisions_account() {
        let mut ctx = ctx();
        let user = login_user(&mut ctx);

        assert_eq!(ctx.signed_in(), Some(&user));
        let scenario = ctx.into_scenario("g", "n", &[]);
        assert!(matches!(
            &scenario.setup[..],
            [Provision::User { user: u }] if *u == user
        ));
    }

    #[test]
    fn test_own_article_requires_sign_in() {
        let mut ctx = ctx();
        let err = unliked_own_article(&mut ctx).unwrap_err();
        assert!(matches!(err, E2eError::Precondition(_)));
    }

    #[test]
    fn test_liked_own_article_uses_signed_in_author() {
        let mut ctx = ctx();
        let owner = login_user(&mut ctx);
        let article = liked_own_article(&mut ctx).unwrap();
        let scenario = ctx.into_scenario("g", "n", &[]);

        assert!(scenario.setup.iter().any(|p| matches!(
            p,
            Provision::Article { author, article: a } if *author == owner && *a == article
        )));
        assert!(matches!(
            scenario.steps.last(),
            Some(TestStep::Assert { class: Some(c), .. }) if c == selectors::FAVORITED_CLASS
        ));
    }

    #[test]
    fn test_followed_profile_ends_on_unfollow() {
        let mut ctx = ctx();
        let author = followed_to_user_profile(&mut ctx);
        let scenario = ctx.into_scenario("g", "n", &[]);

        assert!(scenario.cleanup.contains(&author));
        assert!(matches!(
            scenario.steps.last(),
            Some(TestStep::Assert { selector, text_contains: Some(t), .. })
                if selector == selectors::UNFOLLOW_BUTTON && t == "Unfollow"
        ));
    }
}
