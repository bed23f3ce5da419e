//! End-to-end scenarios across aggregation, classification and the store.

use regard_core::aggregate::fold_notifications;
use regard_core::classify::classify;
use regard_core::model::{ActionKind, Category, RawNotification, Timestamp, UserEngagement};
use regard_core::store::Store;

fn ts(s: &str) -> Timestamp {
    s.parse().expect("timestamp")
}

fn notification(
    user_id: &str,
    kind: ActionKind,
    timestamp: &str,
    is_following: bool,
) -> RawNotification {
    RawNotification {
        user_id: user_id.to_string(),
        display_name: format!("{user_id}-name"),
        action_kind: Some(kind),
        action_timestamp: ts(timestamp),
        is_following,
        avatar_url: format!("https://cdn.example/{user_id}.jpg"),
    }
}

fn record(user_id: &str, timestamp: &str) -> UserEngagement {
    UserEngagement::seeded(user_id, user_id, false, ts(timestamp))
}

#[test]
fn two_likes_then_follow_becomes_follow_and_like() {
    let notifications = vec![
        notification("u1", ActionKind::Liked, "2024-01-01 10:00:00", false),
        notification("u1", ActionKind::Liked, "2024-01-01 11:00:00", false),
        notification("u1", ActionKind::Followed, "2024-01-01 12:00:00", true),
    ];

    let mut users = fold_notifications(&notifications);
    assert_eq!(users.len(), 1);
    let user = &mut users[0];
    user.category = classify(user);

    assert_eq!(user.like_count, 2);
    assert_eq!(user.follow_count, 1);
    assert!(user.is_following);
    assert_eq!(
        user.latest_action_timestamp,
        ts("2024-01-01 12:00:00")
    );
    assert_eq!(user.category, Category::FollowAndLike);
}

#[test]
fn heavy_liker_outranks_the_plain_unfollowed_rule() {
    let mut user = record("u1", "2024-01-01 10:00:00");
    user.like_count = 5;
    assert_eq!(classify(&user), Category::MultiLike);
}

#[test]
fn merge_updates_retains_and_sorts_through_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("engagement.json");

    let mut prior = Store::default();
    prior.merge(
        vec![
            record("u1", "2024-01-01 09:00:00"),
            record("u2", "2024-01-02 09:00:00"),
        ],
        ts("2024-01-02 09:30:00"),
        24,
    );
    prior.save(&path).expect("save prior");

    let mut store = Store::load(&path).expect("reload");
    store.merge(
        vec![record("u1", "2024-01-02 23:00:00")],
        ts("2024-01-03 08:00:00"),
        24,
    );
    store.save(&path).expect("save merged");

    let merged = Store::load(&path).expect("final load");
    let ids: Vec<&str> = merged
        .records()
        .iter()
        .map(|r| r.user_id.as_str())
        .collect();
    assert_eq!(ids, ["u1", "u2"]);
    assert_eq!(
        merged.get("u1").map(|r| r.latest_action_timestamp),
        Some(ts("2024-01-02 23:00:00"))
    );
}

#[test]
fn retention_boundary_is_inclusive() {
    let mut store = Store::default();
    store.merge(
        vec![
            record("boundary", "2024-01-01 10:00:00"),
            record("older", "2024-01-01 09:59:59"),
        ],
        ts("2024-01-02 10:00:00"),
        24,
    );
    assert!(store.get("boundary").is_some());
    assert!(store.get("older").is_none());
}

#[test]
fn empty_batch_merge_only_applies_retention() {
    let mut store = Store::default();
    store.merge(
        vec![
            record("keep", "2024-01-02 08:00:00"),
            record("drop", "2024-01-01 09:30:00"),
        ],
        ts("2024-01-02 09:00:00"),
        24,
    );

    store.merge(Vec::new(), ts("2024-01-02 10:00:00"), 24);
    let ids: Vec<&str> = store
        .records()
        .iter()
        .map(|r| r.user_id.as_str())
        .collect();
    assert_eq!(ids, ["keep"]);

    // A second empty merge at the same instant changes nothing.
    let before = store.clone();
    store.merge(Vec::new(), ts("2024-01-02 10:00:00"), 24);
    assert_eq!(store, before);
}
