//! Raw feed notifications as observed by the collector.

use crate::model::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// User id assigned when the avatar URL yields no usable path segment.
pub const UNKNOWN_USER_ID: &str = "unknown";

/// Avatar filename the platform serves for accounts without a profile image.
/// Notifications carrying it are dropped by the collector and must never
/// reach aggregation.
pub const NO_PROFILE_AVATAR: &str = "img_noprofile.gif";

/// The four recognizable notification actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Liked,
    Collected,
    Followed,
    Commented,
}

/// Action phrases the platform embeds in notification text, in match order.
///
/// Substring match: the feed wraps these in item titles and decorations, so
/// exact comparison would miss nearly everything.
const ACTION_PHRASES: &[(&str, ActionKind)] = &[
    ("いいねしました", ActionKind::Liked),
    ("コレ！しました", ActionKind::Collected),
    ("あなたをフォローしました", ActionKind::Followed),
    ("あなたの商品にコメントしました", ActionKind::Commented),
];

impl ActionKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::Collected => "collected",
            Self::Followed => "followed",
            Self::Commented => "commented",
        }
    }

    /// Detect the action a raw notification text describes.
    ///
    /// Returns `None` for unrecognized text; such notifications still count
    /// toward a user's presence but increment no counter.
    #[must_use]
    pub fn detect(action_text: &str) -> Option<Self> {
        ACTION_PHRASES
            .iter()
            .find(|(phrase, _)| action_text.contains(phrase))
            .map(|&(_, kind)| kind)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = crate::model::engagement::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "liked" => Ok(Self::Liked),
            "collected" => Ok(Self::Collected),
            "followed" => Ok(Self::Followed),
            "commented" => Ok(Self::Commented),
            _ => Err(crate::model::engagement::ParseEnumError {
                expected: "action kind",
                got: s.to_string(),
            }),
        }
    }
}

/// One observed feed event about a user's action.
///
/// Created per scrape pass, never mutated, discarded after folding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNotification {
    pub user_id: String,
    pub display_name: String,
    pub action_kind: Option<ActionKind>,
    pub action_timestamp: Timestamp,
    pub is_following: bool,
    pub avatar_url: String,
}

impl RawNotification {
    /// True if the avatar is the platform's no-profile placeholder.
    ///
    /// Collector-side filter; the aggregation engine assumes these are gone.
    #[must_use]
    pub fn has_placeholder_avatar(&self) -> bool {
        self.avatar_url.contains(NO_PROFILE_AVATAR)
    }
}

/// Derive a stable user id from an avatar URL.
///
/// The platform encodes the account id as the final path segment of the
/// avatar resource; file extension and query string are incidental. Returns
/// [`UNKNOWN_USER_ID`] when no segment can be extracted.
#[must_use]
pub fn user_id_from_avatar_url(avatar_url: &str) -> String {
    let path = avatar_url
        .split_once('?')
        .map_or(avatar_url, |(path, _)| path);
    let segment = path.rsplit('/').next().unwrap_or("");
    let stem = match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.chars().all(char::is_alphanumeric) => stem,
        _ => segment,
    };
    if stem.is_empty() {
        UNKNOWN_USER_ID.to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{user_id_from_avatar_url, ActionKind, RawNotification, UNKNOWN_USER_ID};
    use std::str::FromStr;

    #[test]
    fn detects_each_action_phrase() {
        assert_eq!(
            ActionKind::detect("スニーカーをいいねしました"),
            Some(ActionKind::Liked)
        );
        assert_eq!(
            ActionKind::detect("あなたの商品をコレ！しました"),
            Some(ActionKind::Collected)
        );
        assert_eq!(
            ActionKind::detect("あなたをフォローしました"),
            Some(ActionKind::Followed)
        );
        assert_eq!(
            ActionKind::detect("あなたの商品にコメントしました"),
            Some(ActionKind::Commented)
        );
    }

    #[test]
    fn unrecognized_text_yields_no_action() {
        assert_eq!(ActionKind::detect("キャンペーンのお知らせ"), None);
        assert_eq!(ActionKind::detect(""), None);
    }

    #[test]
    fn display_parse_roundtrips() {
        for value in [
            ActionKind::Liked,
            ActionKind::Collected,
            ActionKind::Followed,
            ActionKind::Commented,
        ] {
            let reparsed = ActionKind::from_str(&value.to_string()).expect("roundtrip");
            assert_eq!(value, reparsed);
        }
    }

    #[test]
    fn user_id_drops_extension_and_query() {
        assert_eq!(
            user_id_from_avatar_url("https://img.example.com/avatar/u12345.jpg?size=64"),
            "u12345"
        );
        assert_eq!(
            user_id_from_avatar_url("https://img.example.com/avatar/u12345"),
            "u12345"
        );
    }

    #[test]
    fn user_id_unknown_when_no_segment() {
        assert_eq!(user_id_from_avatar_url(""), UNKNOWN_USER_ID);
        assert_eq!(user_id_from_avatar_url("https://img.example.com/"), UNKNOWN_USER_ID);
    }

    #[test]
    fn placeholder_avatar_is_flagged() {
        let n = RawNotification {
            user_id: "u1".into(),
            display_name: "someone".into(),
            action_kind: Some(ActionKind::Liked),
            action_timestamp: "2024-01-01 10:00:00".parse().expect("ts"),
            is_following: false,
            avatar_url: "https://img.example.com/img_noprofile.gif".into(),
        };
        assert!(n.has_placeholder_avatar());
    }

    #[test]
    fn notification_json_roundtrip() {
        let n = RawNotification {
            user_id: "u1".into(),
            display_name: "花子".into(),
            action_kind: None,
            action_timestamp: "2024-01-01 10:00:00".parse().expect("ts"),
            is_following: true,
            avatar_url: "https://img.example.com/avatar/u1.png".into(),
        };
        let json = serde_json::to_string(&n).expect("serialize");
        let back: RawNotification = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(n, back);
    }
}
