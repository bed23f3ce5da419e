//! Aggregated per-user engagement records.

use crate::model::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Sentinel stored when profile resolution failed for a user.
pub const UNREACHABLE_PROFILE: &str = "unreachable";

/// Outreach-priority buckets, mutually exclusive.
///
/// The serialized labels are the category names the rest of the system
/// (template file, store consumers) keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "multi-like thanks")]
    MultiLike,
    #[serde(rename = "new-follow-and-like thanks")]
    FollowAndLike,
    #[serde(rename = "unfollowed-liker thanks")]
    UnfollowedLiker,
    #[serde(rename = "like-and-save thanks")]
    LikeAndSave,
    #[serde(rename = "new-follow only")]
    NewFollow,
    #[serde(rename = "like thanks")]
    Like,
    #[serde(rename = "uncategorized")]
    Uncategorized,
}

impl Category {
    pub const ALL: [Self; 7] = [
        Self::MultiLike,
        Self::FollowAndLike,
        Self::UnfollowedLiker,
        Self::LikeAndSave,
        Self::NewFollow,
        Self::Like,
        Self::Uncategorized,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MultiLike => "multi-like thanks",
            Self::FollowAndLike => "new-follow-and-like thanks",
            Self::UnfollowedLiker => "unfollowed-liker thanks",
            Self::LikeAndSave => "like-and-save thanks",
            Self::NewFollow => "new-follow only",
            Self::Like => "like thanks",
            Self::Uncategorized => "uncategorized",
        }
    }

    /// Uncategorized users are excluded from ranking and posting.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        !matches!(self, Self::Uncategorized)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Uncategorized
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| ParseEnumError {
                expected: "category",
                got: s.to_string(),
            })
    }
}

/// Posting lifecycle for a store record.
///
/// `Dispatched` means the outreach attempt was handed to the executor, not
/// that delivery was confirmed; `Confirmed` is reserved for an explicit
/// confirmation signal so the two are never conflated in one flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Unposted,
    Dispatched,
    Confirmed,
}

impl PostStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unposted => "unposted",
            Self::Dispatched => "dispatched",
            Self::Confirmed => "confirmed",
        }
    }

    /// Validate a status transition.
    ///
    /// Valid transitions:
    /// - `unposted -> dispatched`
    /// - `dispatched -> confirmed`
    pub fn can_transition_to(self, target: Self) -> Result<(), InvalidStatusTransition> {
        let allowed = matches!(
            (self, target),
            (Self::Unposted, Self::Dispatched) | (Self::Dispatched, Self::Confirmed)
        );
        if allowed {
            Ok(())
        } else {
            Err(InvalidStatusTransition {
                from: self,
                to: target,
            })
        }
    }
}

impl Default for PostStatus {
    fn default() -> Self {
        Self::Unposted
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unposted" => Ok(Self::Unposted),
            "dispatched" => Ok(Self::Dispatched),
            "confirmed" => Ok(Self::Confirmed),
            _ => Err(ParseEnumError {
                expected: "post status",
                got: s.to_string(),
            }),
        }
    }
}

/// Error returned when a post-status transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStatusTransition {
    pub from: PostStatus,
    pub to: PostStatus,
}

impl fmt::Display for InvalidStatusTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid status transition {} -> {}", self.from, self.to)
    }
}

impl std::error::Error for InvalidStatusTransition {}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

/// One aggregated user: counters, last-seen state, category, posting status.
///
/// Exactly one record exists per `user_id` within a scrape pass and within
/// the persisted store. Counter fields are sums over the user's matched
/// notifications; `display_name`, `is_following`, and
/// `latest_action_timestamp` reflect the newest notification seen (first
/// writer wins on exact timestamp ties).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEngagement {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub collect_count: u32,
    #[serde(default)]
    pub follow_count: u32,
    #[serde(default)]
    pub comment_count: u32,
    pub is_following: bool,
    pub latest_action_timestamp: Timestamp,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,
    #[serde(default)]
    pub post_status: PostStatus,
}

impl UserEngagement {
    /// Zero-valued record seeded from the first notification seen for a user.
    #[must_use]
    pub fn seeded(
        user_id: &str,
        display_name: &str,
        is_following: bool,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            like_count: 0,
            collect_count: 0,
            follow_count: 0,
            comment_count: 0,
            is_following,
            latest_action_timestamp: timestamp,
            category: Category::Uncategorized,
            profile_url: None,
            comment_text: None,
            post_status: PostStatus::Unposted,
        }
    }

    /// True when profile resolution failed or never ran.
    #[must_use]
    pub fn profile_reachable(&self) -> bool {
        matches!(&self.profile_url, Some(url) if url != UNREACHABLE_PROFILE)
    }
}
