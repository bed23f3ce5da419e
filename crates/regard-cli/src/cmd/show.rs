//! `rgd show` — full detail for one store record.

use crate::output::{pretty_kv, pretty_rule, render_mode, OutputMode};
use anyhow::{anyhow, Result};
use clap::Args;
use regard_core::config::load_project_config;
use regard_core::error::ErrorCode;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// User id of the record to show.
    pub user_id: String,
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;
    let store = super::load_store(&config, project_root)?;

    let record = store.get(&args.user_id).ok_or_else(|| {
        anyhow!(
            "{}: {} '{}'. {}",
            ErrorCode::UserNotFound,
            ErrorCode::UserNotFound.message(),
            args.user_id,
            ErrorCode::UserNotFound.hint().unwrap_or_default()
        )
    })?;

    render_mode(
        output,
        record,
        |r, w| {
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                r.user_id,
                r.display_name,
                r.like_count,
                r.collect_count,
                r.follow_count,
                r.comment_count,
                r.category,
                r.post_status,
                r.latest_action_timestamp
            )
        },
        |r, w| {
            writeln!(w, "{} ({})", r.display_name, r.user_id)?;
            pretty_rule(w)?;
            pretty_kv(w, "likes", r.like_count.to_string())?;
            pretty_kv(w, "collects", r.collect_count.to_string())?;
            pretty_kv(w, "follows", r.follow_count.to_string())?;
            pretty_kv(w, "comments", r.comment_count.to_string())?;
            pretty_kv(w, "following", if r.is_following { "yes" } else { "no" })?;
            pretty_kv(w, "latest", r.latest_action_timestamp.to_string())?;
            pretty_kv(w, "category", r.category.to_string())?;
            pretty_kv(w, "status", r.post_status.to_string())?;
            pretty_kv(w, "profile", r.profile_url.as_deref().unwrap_or("-"))?;
            pretty_kv(w, "comment", r.comment_text.as_deref().unwrap_or("-"))
        },
    )
}
