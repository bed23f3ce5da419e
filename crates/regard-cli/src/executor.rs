//! External outreach command execution.
//!
//! Posting the comment on the actual platform stays outside this binary.
//! The configured argv is spawned per user with `{url}` and `{comment}`
//! substituted; a non-zero exit maps to an error the caller logs.

use anyhow::{bail, Context, Result};
use regard_core::pipeline::OutreachExecutor;
use std::process::Command;
use tracing::{debug, info};

/// Placeholder substituted with the target profile URL.
pub const URL_PLACEHOLDER: &str = "{url}";
/// Placeholder substituted with the bound comment text.
pub const COMMENT_PLACEHOLDER: &str = "{comment}";

/// Spawns the configured outreach command once per post.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    argv: Vec<String>,
}

impl CommandExecutor {
    /// Build from the configured argv. Empty argv is rejected up front so
    /// `rgd post` fails before flipping any status.
    pub fn new(argv: Vec<String>) -> Result<Self> {
        if argv.is_empty() {
            bail!("no outreach command configured; set [outreach].command in .regard/config.toml");
        }
        Ok(Self { argv })
    }

    fn substituted(&self, profile_url: &str, comment: &str) -> Vec<String> {
        self.argv
            .iter()
            .map(|arg| {
                arg.replace(URL_PLACEHOLDER, profile_url)
                    .replace(COMMENT_PLACEHOLDER, comment)
            })
            .collect()
    }
}

impl OutreachExecutor for CommandExecutor {
    fn post(&mut self, profile_url: &str, comment: &str) -> Result<()> {
        let argv = self.substituted(profile_url, comment);
        debug!(command = %argv.join(" "), "spawning outreach command");
        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .status()
            .with_context(|| format!("Failed to spawn outreach command {}", argv[0]))?;
        if !status.success() {
            bail!(
                "outreach command exited with status {}",
                status.code().map_or_else(|| "signal".to_string(), |c| c.to_string())
            );
        }
        info!(%profile_url, "outreach command succeeded");
        Ok(())
    }
}
