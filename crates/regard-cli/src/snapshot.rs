//! Snapshot-backed notification source.
//!
//! `rgd analyze` reads a JSON array captured by an external scrape process.
//! Each entry carries the raw notification text; action detection and user id
//! derivation happen here, so the capture side stays a dumb recorder.

use anyhow::{Context, Result};
use regard_core::model::{user_id_from_avatar_url, ActionKind, RawNotification, Timestamp};
use regard_core::pipeline::NotificationSource;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// One captured feed entry, as the capture process writes it.
#[derive(Debug, Clone, Deserialize)]
struct SnapshotEntry {
    display_name: String,
    action_text: String,
    timestamp: String,
    #[serde(default)]
    is_following: bool,
    avatar_url: String,
    #[serde(default)]
    profile_url: Option<String>,
}

/// Reads one snapshot file and serves it as a notification source.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    notifications: Vec<RawNotification>,
    profiles: HashMap<String, String>,
}

impl SnapshotSource {
    /// Parse a snapshot file. Individually broken entries (bad timestamp,
    /// placeholder avatar) are skipped with a warning; a file that is not a
    /// JSON array at all is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let entries: Vec<SnapshotEntry> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

        let mut source = Self::default();
        for entry in entries {
            let timestamp: Timestamp = match entry.timestamp.parse() {
                Ok(ts) => ts,
                Err(err) => {
                    warn!(raw = %entry.timestamp, error = %err, "skipping entry with bad timestamp");
                    continue;
                }
            };
            let user_id = user_id_from_avatar_url(&entry.avatar_url);
            let notification = RawNotification {
                user_id: user_id.clone(),
                display_name: entry.display_name,
                action_kind: ActionKind::detect(&entry.action_text),
                action_timestamp: timestamp,
                is_following: entry.is_following,
                avatar_url: entry.avatar_url,
            };
            if notification.has_placeholder_avatar() {
                debug!(%user_id, "skipping placeholder-avatar entry");
                continue;
            }
            if let Some(url) = entry.profile_url {
                source.profiles.insert(user_id, url);
            }
            source.notifications.push(notification);
        }
        Ok(source)
    }
}

impl NotificationSource for SnapshotSource {
    fn collect(&mut self) -> Result<Vec<RawNotification>> {
        Ok(self.notifications.clone())
    }

    fn resolve_profile_url(&mut self, user_id: &str) -> Result<Option<String>> {
        Ok(self.profiles.get(user_id).cloned())
    }
}
