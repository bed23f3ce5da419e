//! `rgd analyze` — run the pipeline over a captured snapshot.

use crate::output::{pretty_rule, render_mode, OutputMode};
use crate::snapshot::SnapshotSource;
use anyhow::Result;
use clap::Args;
use regard_core::comment::{TemplateError, TemplateSet};
use regard_core::config::load_project_config;
use regard_core::error::ErrorCode;
use regard_core::model::Timestamp;
use regard_core::pipeline::{self, RunSummary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Snapshot file: JSON array of captured feed entries.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Override the configured target count for this run.
    #[arg(long)]
    pub target: Option<usize>,
}

#[derive(Debug, Serialize)]
struct AnalyzeReport {
    summary_collected: usize,
    summary_aggregated: usize,
    summary_selected: usize,
    comments_bound: usize,
    store_total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    collector_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_error: Option<String>,
    batch: Vec<regard_core::model::UserEngagement>,
}

pub fn run_analyze(args: &AnalyzeArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let mut config = load_project_config(project_root)?;
    if let Some(target) = args.target {
        config.pipeline.target_count = target;
    }

    let mut source = SnapshotSource::from_file(&args.input)?;
    let templates = TemplateSet::load(&config.templates_path(project_root));
    let templates_ref = match &templates {
        Ok(set) => Ok(set),
        Err(err) => {
            let code = match err {
                TemplateError::Missing(_) => ErrorCode::TemplateFileMissing,
                _ => ErrorCode::TemplateParseError,
            };
            warn!(code = %code, error = %err, "template load failed");
            Err(err.to_string())
        }
    };

    let mut handle = super::StoreHandle::open(&config, project_root)?;
    let summary = pipeline::run(
        &mut source,
        &mut handle.store,
        templates_ref,
        &config.pipeline,
        &config.comment,
        Timestamp::now(),
        &mut rand::thread_rng(),
    );
    handle.save()?;

    let batch = summary
        .selected_ids
        .iter()
        .filter_map(|id| handle.store.get(id).cloned())
        .collect();
    let report = build_report(&summary, batch);

    render_mode(
        output,
        &report,
        |r, w| {
            writeln!(
                w,
                "collected={} aggregated={} selected={} bound={} total={}",
                r.summary_collected,
                r.summary_aggregated,
                r.summary_selected,
                r.comments_bound,
                r.store_total
            )?;
            for u in &r.batch {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}",
                    u.user_id,
                    u.category,
                    u.comment_text.as_deref().unwrap_or("-"),
                    u.latest_action_timestamp
                )?;
            }
            Ok(())
        },
        |r, w| {
            writeln!(
                w,
                "Analyzed {} notification(s): {} user(s), {} selected, store holds {}",
                r.summary_collected, r.summary_aggregated, r.summary_selected, r.store_total
            )?;
            if let Some(err) = &r.collector_error {
                writeln!(w, "collector error: {err}")?;
            }
            if let Some(err) = &r.template_error {
                writeln!(w, "template error: {err}")?;
            }
            if !r.batch.is_empty() {
                pretty_rule(w)?;
                for (i, u) in r.batch.iter().enumerate() {
                    writeln!(
                        w,
                        "{:>2}. {:<14} {:<26} {}",
                        i + 1,
                        u.user_id,
                        u.category.to_string(),
                        u.comment_text.as_deref().unwrap_or("-")
                    )?;
                }
            }
            Ok(())
        },
    )
}

fn build_report(
    summary: &RunSummary,
    batch: Vec<regard_core::model::UserEngagement>,
) -> AnalyzeReport {
    AnalyzeReport {
        summary_collected: summary.collected,
        summary_aggregated: summary.aggregated,
        summary_selected: summary.selected,
        comments_bound: summary.comments_bound,
        store_total: summary.store_total,
        collector_error: summary.collector_error.clone(),
        template_error: summary.template_error.clone(),
        batch,
    }
}
