//! `rgd post` — dispatch bound comments through the outreach command.

use crate::executor::CommandExecutor;
use crate::output::{render_success, OutputMode};
use anyhow::Result;
use clap::Args;
use regard_core::config::load_project_config;
use regard_core::error::ErrorCode;
use regard_core::model::PostStatus;
use regard_core::pipeline::OutreachExecutor;
use std::path::Path;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct PostArgs {
    /// Users to post to, by store user id.
    #[arg(required = true)]
    pub user_ids: Vec<String>,
}

pub fn run_post(args: &PostArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;
    let mut executor = CommandExecutor::new(config.outreach.command.clone())?;
    let mut handle = super::StoreHandle::open(&config, project_root)?;

    let mut dispatched = 0usize;
    let mut failures = 0usize;
    for user_id in &args.user_ids {
        let Some(record) = handle.store.get(user_id).cloned() else {
            warn!(code = %ErrorCode::UserNotFound, user_id = %user_id, "unknown user, skipping");
            failures += 1;
            continue;
        };

        if !record.profile_reachable() {
            warn!(user_id = %user_id, "profile unreachable, skipping");
            failures += 1;
            continue;
        }
        let Some(comment) = record.comment_text.as_deref() else {
            warn!(user_id = %user_id, "no bound comment, skipping");
            failures += 1;
            continue;
        };
        let Some(profile_url) = record.profile_url.as_deref() else {
            warn!(user_id = %user_id, "no profile url, skipping");
            failures += 1;
            continue;
        };

        // Flip and persist before invoking the command so a crash mid-post
        // never leaves a sent comment looking unposted. A record already past
        // unposted is skipped, not a reason to abandon the rest of the batch.
        if let Err(err) = handle.store.update_status(user_id, PostStatus::Dispatched) {
            warn!(code = %err.code(), user_id = %user_id, error = %err, "not dispatchable, skipping");
            failures += 1;
            continue;
        }
        handle.save()?;

        match executor.post(profile_url, comment) {
            Ok(()) => {
                info!(user_id = %user_id, "outreach dispatched");
                dispatched += 1;
            }
            Err(err) => {
                warn!(code = %ErrorCode::ExecutorFailed, user_id = %user_id, error = %err, "outreach command failed");
                failures += 1;
            }
        }
    }

    render_success(
        output,
        &format!("Dispatched {dispatched} comment(s), {failures} skipped or failed"),
    )
}
