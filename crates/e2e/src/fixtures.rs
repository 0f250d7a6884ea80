//! Randomized input data for users, articles and comments
//!
//! Every generated value embeds a token built from a process-wide counter, so
//! two calls in the same process never produce the same username, email,
//! title or comment. Tokens also start with the current time (entropy
//! generators) or the run nonce (seeded generators) so that separate runs
//! against a long-lived application do not collide with accounts registered
//! earlier, even when they share a seed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);
static RUN_NONCE: OnceLock<u64> = OnceLock::new();

const USERNAME_PREFIX: &str = "qa";
const EMAIL_DOMAIN: &str = "conduit-e2e.test";

const ADJECTIVES: &[&str] = &[
    "quiet", "rapid", "curious", "patient", "bold", "gentle", "lucid", "steady",
];
const NOUNS: &[&str] = &[
    "compiler", "garden", "protocol", "harbor", "lattice", "journal", "circuit", "orchard",
];
const TAGS: &[&str] = &["testing", "rust", "automation", "writing", "design", "notes"];
const REMARKS: &[&str] = &[
    "Great read",
    "Thanks for sharing",
    "I like this article",
    "Interesting take",
    "Well written",
];

/// Account credentials used to register and sign in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Values for the article editor form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleData {
    pub article_title: String,
    pub what_about: String,
    pub write_article: String,
    pub enter_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentData {
    pub comment: String,
}

/// Source of fixture data for one scenario
pub struct FixtureGenerator {
    rng: StdRng,
    /// Fixed token prefix; the current time is used when unset
    run: Option<u64>,
}

impl FixtureGenerator {
    /// Generator backed by OS entropy; tokens include the current time
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            run: None,
        }
    }

    /// Seeded generator for this process's run. Word choices and passwords
    /// follow the seed; tokens carry the run nonce and the sequence number,
    /// so a rerun with the same seed registers different accounts.
    pub fn seeded(seed: u64) -> Self {
        Self::seeded_for_run(seed, run_nonce())
    }

    /// Seeded generator with an explicit run nonce
    pub fn seeded_for_run(seed: u64, run: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            run: Some(run),
        }
    }

    pub fn user(&mut self) -> User {
        let token = self.token();
        let username = format!("{USERNAME_PREFIX}{token}");
        let email = format!("{username}@{EMAIL_DOMAIN}");
        let password = format!("Pw{}!", hex::encode(self.rng.gen::<[u8; 6]>()));

        User {
            username,
            email,
            password,
        }
    }

    pub fn article(&mut self) -> ArticleData {
        let token = self.token();
        let adjective = self.pick(ADJECTIVES);
        let noun = self.pick(NOUNS);
        let other = self.pick(NOUNS);

        ArticleData {
            article_title: format!("The {adjective} {noun} {token}"),
            what_about: format!("Notes on {noun} and {other}"),
            write_article: format!(
                "## Why {noun}\n\nA {adjective} look at the {noun}.\n\n- first point\n- second point"
            ),
            enter_tag: self.pick(TAGS).to_string(),
        }
    }

    pub fn comment(&mut self) -> CommentData {
        let token = self.token();
        let remark = self.pick(REMARKS);

        CommentData {
            comment: format!("{remark} {token}"),
        }
    }

    fn pick(&mut self, words: &[&'static str]) -> &'static str {
        words.choose(&mut self.rng).copied().unwrap_or("conduit")
    }

    /// Lowercase alphanumeric token: run or time + sequence + random suffix
    fn token(&mut self) -> String {
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let suffix = hex::encode(self.rng.gen::<[u8; 2]>());
        let prefix = self.run.unwrap_or_else(now_millis);

        format!("{}{}{}", base36(prefix), base36(sequence), suffix)
    }
}

impl Default for FixtureGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Fresh user with an entropy-seeded generator
pub fn generate_user() -> User {
    FixtureGenerator::from_entropy().user()
}

pub fn generate_article_data() -> ArticleData {
    FixtureGenerator::from_entropy().article()
}

pub fn generate_comment_data() -> CommentData {
    FixtureGenerator::from_entropy().comment()
}

/// Start time of this process's run, fixed on first use
pub fn run_nonce() -> u64 {
    *RUN_NONCE.get_or_init(now_millis)
}

fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().unsigned_abs()
}

fn base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
