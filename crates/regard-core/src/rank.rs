//! Priority ordering and truncation of classified users.

use crate::model::UserEngagement;

/// Composite sort key, ascending. Lower tuples rank earlier.
///
/// 1. negative like count (more likes first)
/// 2. new-follow-and-like users first
/// 3. pure new-follow users next
/// 4. not-yet-following before already-following
/// 5. savers-with-likes preferred
///
/// Ties after all five keys keep input (fold) order, so the sort below must
/// stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityKey {
    neg_likes: i64,
    follow_and_like: u8,
    pure_follow: u8,
    already_following: u8,
    no_collect: u8,
}

impl PriorityKey {
    #[must_use]
    pub fn of(user: &UserEngagement) -> Self {
        Self {
            neg_likes: -i64::from(user.like_count),
            follow_and_like: u8::from(!(user.follow_count > 0 && user.like_count > 0)),
            pure_follow: u8::from(!(user.follow_count > 0 && user.like_count == 0)),
            already_following: u8::from(user.is_following),
            no_collect: u8::from(user.collect_count == 0),
        }
    }
}

/// Order records by [`PriorityKey`] and keep the first `target_count`.
///
/// Input should already exclude uncategorized users; this function orders
/// whatever it is given.
#[must_use]
pub fn rank_and_truncate(
    mut users: Vec<UserEngagement>,
    target_count: usize,
) -> Vec<UserEngagement> {
    users.sort_by_key(PriorityKey::of);
    users.truncate(target_count);
    users
}
