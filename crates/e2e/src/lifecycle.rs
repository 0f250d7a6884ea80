//! Per-scenario fixture lifecycle: provision before, tear down after

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::{AuthToken, ConduitApi};
use crate::error::E2eResult;
use crate::fixtures::User;
use crate::scenario::Provision;

/// What teardown removed and what it had to leave behind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeardownReport {
    pub articles_deleted: usize,
    /// Accounts that could not be signed in (never registered, or the
    /// scenario changed their credentials)
    pub accounts_skipped: Vec<String>,
    pub errors: Vec<String>,
}

pub struct FixtureLifecycle {
    api: ConduitApi,
}

impl FixtureLifecycle {
    pub fn new(api: ConduitApi) -> Self {
        Self { api }
    }

    /// Create every provision in order. Fails on the first error since the
    /// scenario cannot start from the state it expects.
    pub async fn setup(&self, provisions: &[Provision]) -> E2eResult<()> {
        // Tokens of accounts registered in this setup, keyed by email
        let mut tokens: HashMap<String, AuthToken> = HashMap::new();

        for provision in provisions {
            match provision {
                Provision::User { user } => {
                    debug!("Provisioning user {}", user.username);
                    let token = self.api.register(user).await?;
                    tokens.insert(user.email.clone(), token);
                }
                Provision::Article { author, article } => {
                    let token = match tokens.get(&author.email) {
                        Some(token) => token.clone(),
                        None => {
                            let token = self.api.login(&author.email, &author.password).await?;
                            tokens.insert(author.email.clone(), token.clone());
                            token
                        }
                    };
                    let slug = self.api.create_article(&token, article).await?;
                    debug!("Provisioned article {} for {}", slug, author.username);
                }
            }
        }

        Ok(())
    }

    /// Delete the articles of every listed account. Never fails: problems are
    /// logged and collected in the report.
    pub async fn teardown(&self, accounts: &[User]) -> TeardownReport {
        let mut report = TeardownReport::default();

        for user in accounts {
            let token = match self.api.login(&user.email, &user.password).await {
                Ok(token) => token,
                Err(e) => {
                    debug!("Skipping teardown for {}: {}", user.email, e);
                    report.accounts_skipped.push(user.email.clone());
                    continue;
                }
            };

            if let Err(e) = self.delete_articles(&token, &mut report).await {
                warn!("Teardown for {} incomplete: {}", user.email, e);
                report.errors.push(format!("{}: {}", user.email, e));
            }
        }

        if report.articles_deleted > 0 {
            info!("Teardown removed {} article(s)", report.articles_deleted);
        }
        report
    }

    async fn delete_articles(&self, token: &AuthToken, report: &mut TeardownReport) -> E2eResult<()> {
        // Username may have changed during the scenario; ask the API
        let account = self.api.current_user(token).await?;

        for article in self.api.articles_by_author(&account.username).await? {
            self.api.delete_article(token, &article.slug).await?;
            report.articles_deleted += 1;
        }

        Ok(())
    }
}
