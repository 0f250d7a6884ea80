//! Conduit REST API client
//!
//! Used to provision precondition data before a scenario and to remove it
//! afterwards. The browser never sees these calls; they only shape the state
//! the scenario starts from.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::fixtures::{ArticleData, User};

/// JWT returned by registration and login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(pub String);

/// Account as reported by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSummary {
    pub slug: String,
    pub title: String,
}

#[derive(Serialize, Deserialize)]
struct UserEnvelope<T> {
    user: T,
}

#[derive(Serialize)]
struct NewUser<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize, Deserialize)]
struct ArticleEnvelope<T> {
    article: T,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewArticle<'a> {
    title: &'a str,
    description: &'a str,
    body: &'a str,
    tag_list: Vec<&'a str>,
}

#[derive(Deserialize)]
struct ArticleList {
    articles: Vec<ArticleSummary>,
}

/// Thin client over the Conduit API base URL (e.g. `https://host/api`)
#[derive(Debug, Clone)]
pub struct ConduitApi {
    client: reqwest::Client,
    base_url: String,
}

impl ConduitApi {
    pub fn new(base_url: &str, timeout: Duration) -> E2eResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register an account
    pub async fn register(&self, user: &User) -> E2eResult<AuthToken> {
        let body = UserEnvelope {
            user: NewUser {
                username: &user.username,
                email: &user.email,
                password: &user.password,
            },
        };

        let account: UserEnvelope<Account> = self
            .send(self.request(Method::POST, "/users", None).json(&body), "POST", "/users")
            .await?;
        token_of(account.user, "/users")
    }

    /// Sign in with email and password
    pub async fn login(&self, email: &str, password: &str) -> E2eResult<AuthToken> {
        let body = UserEnvelope {
            user: Credentials { email, password },
        };

        let account: UserEnvelope<Account> = self
            .send(
                self.request(Method::POST, "/users/login", None).json(&body),
                "POST",
                "/users/login",
            )
            .await?;
        token_of(account.user, "/users/login")
    }

    /// Account behind a token; reflects username changes made in the UI
    pub async fn current_user(&self, token: &AuthToken) -> E2eResult<Account> {
        let account: UserEnvelope<Account> = self
            .send(self.request(Method::GET, "/user", Some(token)), "GET", "/user")
            .await?;
        Ok(account.user)
    }

    /// Publish an article, returning its slug
    pub async fn create_article(&self, token: &AuthToken, article: &ArticleData) -> E2eResult<String> {
        let body = ArticleEnvelope {
            article: NewArticle {
                title: &article.article_title,
                description: &article.what_about,
                body: &article.write_article,
                tag_list: vec![article.enter_tag.as_str()],
            },
        };

        let created: ArticleEnvelope<ArticleSummary> = self
            .send(
                self.request(Method::POST, "/articles", Some(token)).json(&body),
                "POST",
                "/articles",
            )
            .await?;
        Ok(created.article.slug)
    }

    /// Articles written by `username` (first page of up to 100)
    pub async fn articles_by_author(&self, username: &str) -> E2eResult<Vec<ArticleSummary>> {
        let request = self
            .request(Method::GET, "/articles", None)
            .query(&[("author", username), ("limit", "100")]);

        let list: ArticleList = self.send(request, "GET", "/articles").await?;
        Ok(list.articles)
    }

    pub async fn delete_article(&self, token: &AuthToken, slug: &str) -> E2eResult<()> {
        let path = format!("/articles/{}", slug);
        let response = self
            .request(Method::DELETE, &path, Some(token))
            .send()
            .await?;
        check_status(response, "DELETE", &path).await?;
        Ok(())
    }

    /// Cheap request proving the API answers
    pub async fn ping(&self) -> E2eResult<()> {
        let response = self.request(Method::GET, "/tags", None).send().await?;
        check_status(response, "GET", "/tags").await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str, token: Option<&AuthToken>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.header("Authorization", format!("Token {}", token.0)),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> E2eResult<T> {
        let response = check_status(request.send().await?, method, path).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response, method: &'static str, path: &str) -> E2eResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(E2eError::Api {
        method,
        path: path.to_string(),
        status,
        body,
    })
}

fn token_of(account: Account, path: &str) -> E2eResult<AuthToken> {
    account.token.map(AuthToken).ok_or_else(|| E2eError::Api {
        method: "POST",
        path: path.to_string(),
        status: 200,
        body: "response carried no token".to_string(),
    })
}
