//! Fold raw notifications into one engagement record per user.
//!
//! # Invariants
//!
//! - Exactly one output record per distinct `user_id`.
//! - Counter fields equal the number of matching notifications for that user.
//! - `latest_action_timestamp` is the maximum timestamp observed for the
//!   user, and `display_name`/`is_following` come from the notification
//!   bearing that timestamp. On an exact tie the first-folded notification
//!   keeps those fields (strict `>` comparison, never iteration order).
//! - Output order is first-seen user order; the ranker's tie-break depends
//!   on it.

use crate::model::{ActionKind, RawNotification, UserEngagement};
use std::collections::HashMap;
use tracing::debug;

/// Fold notifications in arrival order into per-user engagement summaries.
///
/// Assumes collector-filtered input (placeholder avatars already dropped);
/// malformed records never reach this stage, so the fold cannot fail.
#[must_use]
pub fn fold_notifications(notifications: &[RawNotification]) -> Vec<UserEngagement> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut users: Vec<UserEngagement> = Vec::new();

    for notification in notifications {
        let slot = *index.entry(&notification.user_id).or_insert_with(|| {
            users.push(UserEngagement::seeded(
                &notification.user_id,
                &notification.display_name,
                notification.is_following,
                notification.action_timestamp,
            ));
            users.len() - 1
        });
        let user = &mut users[slot];

        match notification.action_kind {
            Some(ActionKind::Liked) => user.like_count += 1,
            Some(ActionKind::Collected) => user.collect_count += 1,
            Some(ActionKind::Followed) => user.follow_count += 1,
            Some(ActionKind::Commented) => user.comment_count += 1,
            None => {}
        }

        if notification.action_timestamp > user.latest_action_timestamp {
            user.display_name.clone_from(&notification.display_name);
            user.is_following = notification.is_following;
            user.latest_action_timestamp = notification.action_timestamp;
        }
    }

    debug!(
        notifications = notifications.len(),
        users = users.len(),
        "folded notifications into engagement records"
    );
    users
}
