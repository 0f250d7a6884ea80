//! Routes, selectors and messages of the Conduit front end

/// Hash routes relative to the application base URL
pub mod routes {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/#/login";
    pub const REGISTER: &str = "/#/register";
    pub const EDITOR: &str = "/#/editor";
    pub const SETTINGS: &str = "/#/settings";

    /// URL fragment present on any article page
    pub const ARTICLE_FRAGMENT: &str = "#/article/";

    /// URL fragment of a profile's favorited-articles tab
    pub const FAVORITES_FRAGMENT: &str = "/favorites";

    pub fn profile(username: &str) -> String {
        format!("/#/@{username}")
    }
}

pub mod selectors {
    // Header navigation
    pub const NAV_LINK: &str = ".nav-link";
    pub const NAV_REGISTER: &str = r##"[href="#register"]"##;
    pub const NAV_LOGIN: &str = r##"[href="#login"]"##;
    pub const NAV_COMPOSE: &str = ".ion-compose";
    pub const NAV_SETTINGS: &str = ".ion-gear-a";
    pub const NAV_USER_PIC: &str = ".user-pic";

    // Auth forms
    pub const USERNAME_INPUT: &str = r#"[placeholder="Username"]"#;
    pub const EMAIL_INPUT: &str = r#"[placeholder="Email"]"#;
    pub const PASSWORD_INPUT: &str = r#"[placeholder="Password"]"#;
    pub const SIGN_IN_BUTTON: &str = r#"button.btn:has-text("Sign in")"#;

    pub const ERROR_MESSAGE: &str = ".error-messages > li";
    pub const ERROR_MESSAGES: &str = ".error-messages";

    // Editor
    pub const ARTICLE_TITLE_INPUT: &str = r#"[placeholder="Article Title"]"#;
    pub const ARTICLE_ABOUT_INPUT: &str = r#"[placeholder="What's this article about?"]"#;
    pub const ARTICLE_BODY_INPUT: &str = r#"[placeholder="Write your article (in markdown)"]"#;
    pub const ARTICLE_TAGS_INPUT: &str = r#"[placeholder="Enter tags"]"#;
    pub const PUBLISH_BUTTON: &str = "button.btn-lg.btn-primary.pull-xs-right";

    // Article page
    pub const ARTICLE_HEADING: &str = "h1";
    pub const EDIT_ARTICLE: &str = ".banner .ion-edit";
    pub const DELETE_ARTICLE: &str = ".banner .ion-trash-a";
    pub const COMMENT_INPUT: &str = r#"[placeholder="Write a comment..."]"#;
    pub const POST_COMMENT: &str = ".comment-form button.btn-primary";
    pub const COMMENT_TEXT: &str = ".card .card-text";

    // Profile page
    pub const USER_IMAGE: &str = ".user-img";
    pub const PROFILE_NAME: &str = ".user-info h4";
    pub const FOLLOW_BUTTON: &str = ".action-btn.btn-outline-secondary";
    pub const UNFOLLOW_BUTTON: &str = ".action-btn.btn-secondary";
    pub const FAVORITED_TAB: &str = r#".articles-toggle a:has-text("Favorited Articles")"#;

    // Home page
    pub const GLOBAL_FEED_TAB: &str = r#".feed-toggle .nav-link:has-text("Global Feed")"#;
    pub const ACTIVE_FEED_TAB: &str = ".feed-toggle .nav-link.active";
    pub const ACTIVE_TAG_TAB: &str = ".feed-toggle .nav-link.active .ion-pound";
    pub const POPULAR_TAG: &str = ".sidebar .tag-list .tag-default";
    pub const ARTICLE_PREVIEW: &str = ".article-preview";

    // Settings
    pub const BIO_INPUT: &str = r#"[placeholder="Short bio about you"]"#;
    pub const UPDATE_SETTINGS: &str = r#"button:has-text("Update Settings")"#;
    pub const LOGOUT_BUTTON: &str = ".btn-outline-danger";

    // Favorite button state classes
    pub const FAVORITED_CLASS: &str = "btn-primary";
    pub const UNFAVORITED_CLASS: &str = "btn-outline-primary";

    /// Preview card of the article with this title
    pub fn article_preview(title: &str) -> String {
        has_text(ARTICLE_PREVIEW, title)
    }

    /// Favorite button inside the preview of the article with this title
    pub fn favorite_button(title: &str) -> String {
        format!("{} .pull-xs-right .btn", article_preview(title))
    }

    pub fn preview_link(title: &str) -> String {
        format!("{} .preview-link", article_preview(title))
    }

    pub fn preview_author(title: &str) -> String {
        format!("{} .author", article_preview(title))
    }

    /// Delete icon of the comment card showing this text
    pub fn comment_delete_button(text: &str) -> String {
        format!("{} .mod-options .ion-trash-a", has_text(".card", text))
    }

    /// Narrow `selector` to elements whose text contains `text`
    pub fn has_text(selector: &str, text: &str) -> String {
        let quoted = text.replace('\\', "\\\\").replace('"', "\\\"");
        format!("{selector}:has-text(\"{quoted}\")")
    }
}

/// Validation messages rendered in the error list
pub mod messages {
    pub const USERNAME_TAKEN: &str = "username has already been taken";
    pub const EMAIL_TAKEN: &str = "email has already been taken";
    pub const USERNAME_BLANK: &str = "username can't be blank";
    pub const EMAIL_BLANK: &str = "email can't be blank";
    pub const PASSWORD_BLANK: &str = "password can't be blank";
    pub const INVALID_CREDENTIALS: &str = "email or password is invalid";
    pub const TITLE_BLANK: &str = "title can't be blank";
    pub const DESCRIPTION_BLANK: &str = "description can't be blank";
    pub const BODY_BLANK: &str = "body can't be blank";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_route() {
        assert_eq!(routes::profile("qa1"), "/#/@qa1");
    }

    #[test]
    fn test_header_links_match_hash_routes() {
        assert_eq!(selectors::NAV_REGISTER, "[href=\"#register\"]");
        assert_eq!(selectors::NAV_LOGIN, "[href=\"#login\"]");
    }

    #[test]
    fn test_has_text_quotes() {
        assert_eq!(
            selectors::has_text(".card", r#"say "hi""#),
            r#".card:has-text("say \"hi\"")"#
        );
    }

    #[test]
    fn test_favorite_button_scoped_to_title() {
        let sel = selectors::favorite_button("The quiet garden 1");
        assert!(sel.starts_with(r#".article-preview:has-text("The quiet garden 1")"#));
        assert!(sel.ends_with(".pull-xs-right .btn"));
    }
}
