//! JSON-backed engagement store.
//!
//! The store is a flat JSON array of [`UserEngagement`] records kept newest
//! first. All mutation goes through load/merge/save on a single process at a
//! time; callers serialize access with [`crate::lock::StoreLock`].

use crate::error::ErrorCode;
use crate::model::{InvalidStatusTransition, PostStatus, Timestamp, UserEngagement};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write store {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no record for user {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Transition(#[from] InvalidStatusTransition),
}

impl StoreError {
    /// Machine-readable code associated with this store error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::StoreParseError,
            Self::Write { .. } => ErrorCode::StoreWriteFailed,
            Self::UnknownUser(_) => ErrorCode::UserNotFound,
            Self::Transition(_) => ErrorCode::InvalidStatusTransition,
        }
    }
}

/// In-memory view of the store file, newest record first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    records: Vec<UserEngagement>,
}

impl Store {
    /// Load the store, treating a missing or unparseable file as an empty
    /// cold start. Only read and write failures are surfaced; the next save
    /// rewrites the full file either way.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "store file missing, starting empty");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        match serde_json::from_str(&content) {
            Ok(records) => Ok(Self { records }),
            Err(err) => {
                warn!(
                    code = %ErrorCode::StoreParseError.code(),
                    path = %path.display(),
                    error = %err,
                    "store file unreadable, starting empty"
                );
                Ok(Self::default())
            }
        }
    }

    /// Write the store atomically: serialize to a sibling temp file, then
    /// rename over the target so readers never observe a half-written file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let write_err = |source: std::io::Error| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(&self.records).map_err(|source| {
            StoreError::Write {
                path: path.to_path_buf(),
                source: source.into(),
            }
        })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(write_err)?;
        std::fs::rename(&tmp, path).map_err(write_err)?;
        debug!(path = %path.display(), records = self.records.len(), "store saved");
        Ok(())
    }

    #[must_use]
    pub fn records(&self) -> &[UserEngagement] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<&UserEngagement> {
        self.records.iter().find(|r| r.user_id == user_id)
    }

    /// Timestamp of the most recent record, if any. Used by collection to
    /// skip notifications the store already reflects.
    #[must_use]
    pub fn newest_timestamp(&self) -> Option<Timestamp> {
        self.records
            .iter()
            .map(|r| r.latest_action_timestamp)
            .max()
    }

    /// Merge a freshly analyzed batch into the store.
    ///
    /// Incoming records replace any existing record for the same user, then
    /// everything older than the retention window (relative to `now`) is
    /// dropped and the remainder re-sorted newest first. Records exactly at
    /// the retention boundary are kept.
    pub fn merge(&mut self, batch: Vec<UserEngagement>, now: Timestamp, retention_hours: i64) {
        let incoming = batch.len();
        for record in batch {
            match self
                .records
                .iter_mut()
                .find(|r| r.user_id == record.user_id)
            {
                Some(existing) => *existing = record,
                None => self.records.push(record),
            }
        }

        let cutoff = now.hours_before(retention_hours);
        let before = self.records.len();
        self.records
            .retain(|r| r.latest_action_timestamp >= cutoff);
        let expired = before - self.records.len();

        self.records
            .sort_by(|a, b| b.latest_action_timestamp.cmp(&a.latest_action_timestamp));
        info!(incoming, expired, total = self.records.len(), "store merged");
    }

    /// Advance a user's post status through the allowed lifecycle.
    pub fn update_status(
        &mut self,
        user_id: &str,
        next: PostStatus,
    ) -> Result<(), StoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.user_id == user_id)
            .ok_or_else(|| StoreError::UnknownUser(user_id.to_string()))?;
        record.post_status.can_transition_to(next)?;
        record.post_status = next;
        Ok(())
    }
}
