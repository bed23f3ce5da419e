//! Data model: raw notifications, aggregated engagements, timestamps.

pub mod engagement;
pub mod notification;
pub mod timestamp;

pub use engagement::{
    Category, InvalidStatusTransition, ParseEnumError, PostStatus, UserEngagement,
    UNREACHABLE_PROFILE,
};
pub use notification::{
    user_id_from_avatar_url, ActionKind, RawNotification, NO_PROFILE_AVATAR, UNKNOWN_USER_ID,
};
pub use timestamp::Timestamp;
