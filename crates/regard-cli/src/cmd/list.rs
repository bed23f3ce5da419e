//! `rgd list` — store records with filtering.

use crate::output::{pretty_rule, render_mode, OutputMode};
use anyhow::Result;
use clap::Args;
use regard_core::config::load_project_config;
use regard_core::model::{Category, PostStatus, UserEngagement};
use std::path::Path;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by category label (e.g. "multi-like thanks").
    #[arg(short, long)]
    pub category: Option<Category>,

    /// Filter by post status: unposted, dispatched, confirmed.
    #[arg(short, long)]
    pub status: Option<PostStatus>,

    /// Maximum records to show.
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;
    let store = super::load_store(&config, project_root)?;

    let rows: Vec<&UserEngagement> = store
        .records()
        .iter()
        .filter(|r| args.category.map_or(true, |c| r.category == c))
        .filter(|r| args.status.map_or(true, |s| r.post_status == s))
        .take(args.limit)
        .collect();

    render_mode(
        output,
        &rows,
        |rows, w| {
            for r in &*rows {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    r.user_id,
                    r.display_name,
                    r.like_count,
                    r.category,
                    r.post_status,
                    r.latest_action_timestamp
                )?;
            }
            Ok(())
        },
        |rows, w| {
            writeln!(
                w,
                "{:<14} {:<18} {:>5} {:>5} {:>5} {:>5}  {:<26} {:<10}  {}",
                "USER", "NAME", "LIKE", "COLL", "FOLW", "COMM", "CATEGORY", "STATUS", "LATEST"
            )?;
            pretty_rule(w)?;
            for r in &*rows {
                writeln!(
                    w,
                    "{:<14} {:<18} {:>5} {:>5} {:>5} {:>5}  {:<26} {:<10}  {}",
                    r.user_id,
                    truncate(&r.display_name, 18),
                    r.like_count,
                    r.collect_count,
                    r.follow_count,
                    r.comment_count,
                    r.category.to_string(),
                    r.post_status.to_string(),
                    r.latest_action_timestamp
                )?;
            }
            writeln!(w, "{} record(s)", rows.len())
        },
    )
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let kept: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
