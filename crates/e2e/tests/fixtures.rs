//! Uniqueness of generated fixture data

use std::collections::HashSet;
use std::thread;

use conduit_e2e::fixtures::{generate_comment_data, generate_user, FixtureGenerator};

#[test]
fn test_users_never_collide_within_a_run() {
    let mut usernames = HashSet::new();
    let mut emails = HashSet::new();

    for _ in 0..5_000 {
        let user = generate_user();
        assert!(usernames.insert(user.username.clone()), "duplicate {}", user.username);
        assert!(emails.insert(user.email));
    }
}

#[test]
fn test_equal_seeds_still_give_distinct_values() {
    let mut titles = HashSet::new();

    for _ in 0..200 {
        let mut gen = FixtureGenerator::seeded(99);
        assert!(titles.insert(gen.article().article_title));
    }
}

#[test]
fn test_parallel_generators_do_not_collide() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let mut gen = FixtureGenerator::seeded(i);
                (0..500).map(|_| gen.user().email).collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for email in handle.join().unwrap() {
            assert!(seen.insert(email.clone()), "duplicate {}", email);
        }
    }
    assert_eq!(seen.len(), 8 * 500);
}

#[test]
fn test_comments_are_unique() {
    let comments: HashSet<String> = (0..1_000).map(|_| generate_comment_data().comment).collect();
    assert_eq!(comments.len(), 1_000);
}
