//! First-match category classification.
//!
//! The rule list is an explicit ordered table rather than cascading
//! conditionals so the priority order is auditable and each rule is testable
//! on its own. Rule order is load-bearing: a user matching several rules is
//! classified by the earliest one.

use crate::model::{Category, UserEngagement};

type Predicate = fn(&UserEngagement) -> bool;

/// The classification table, evaluated top to bottom.
pub const RULES: &[(Predicate, Category)] = &[
    (multi_like, Category::MultiLike),
    (follow_and_like, Category::FollowAndLike),
    (unfollowed_liker, Category::UnfollowedLiker),
    (like_and_save, Category::LikeAndSave),
    (new_follow, Category::NewFollow),
    (any_like, Category::Like),
];

fn multi_like(u: &UserEngagement) -> bool {
    u.like_count >= 3
}

fn follow_and_like(u: &UserEngagement) -> bool {
    u.follow_count > 0 && u.like_count > 0
}

fn unfollowed_liker(u: &UserEngagement) -> bool {
    u.like_count > 0 && !u.is_following
}

fn like_and_save(u: &UserEngagement) -> bool {
    u.like_count > 0 && u.collect_count > 0
}

fn new_follow(u: &UserEngagement) -> bool {
    u.follow_count > 0 && u.like_count == 0
}

fn any_like(u: &UserEngagement) -> bool {
    u.like_count > 0
}

/// Assign the first matching category; total over all inputs.
#[must_use]
pub fn classify(user: &UserEngagement) -> Category {
    RULES
        .iter()
        .find(|(predicate, _)| predicate(user))
        .map_or(Category::Uncategorized, |&(_, category)| category)
}

/// Classify every record in place.
pub fn classify_all(users: &mut [UserEngagement]) {
    for user in users {
        user.category = classify(user);
    }
}
