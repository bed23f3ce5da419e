//! `rgd confirm` — mark dispatched outreach as confirmed.

use crate::output::{render_success, OutputMode};
use anyhow::{anyhow, Result};
use clap::Args;
use regard_core::config::load_project_config;
use regard_core::error::ErrorCode;
use regard_core::model::PostStatus;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug)]
pub struct ConfirmArgs {
    /// Users whose dispatched posts were verified on the platform.
    #[arg(required = true)]
    pub user_ids: Vec<String>,
}

pub fn run_confirm(args: &ConfirmArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_project_config(project_root)?;
    let mut handle = super::StoreHandle::open(&config, project_root)?;

    for user_id in &args.user_ids {
        if handle.store.get(user_id).is_none() {
            return Err(anyhow!(
                "{}: {} '{}'. {}",
                ErrorCode::UserNotFound,
                ErrorCode::UserNotFound.message(),
                user_id,
                ErrorCode::UserNotFound.hint().unwrap_or_default()
            ));
        }
        handle.store.update_status(user_id, PostStatus::Confirmed)?;
        info!(user_id = %user_id, "post confirmed");
    }
    handle.save()?;

    render_success(
        output,
        &format!("Confirmed {} post(s)", args.user_ids.len()),
    )
}
