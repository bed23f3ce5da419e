//! End-to-end analysis run: collect, aggregate, classify, rank, bind
//! comments, resolve profiles, merge into the store.

use crate::aggregate::fold_notifications;
use crate::classify::classify_all;
use crate::comment::{bind_comment, TemplateSet};
use crate::config::{CommentConfig, PipelineConfig};
use crate::model::{RawNotification, Timestamp, UNREACHABLE_PROFILE};
use crate::rank::rank_and_truncate;
use crate::store::Store;
use rand::Rng;
use tracing::{debug, info, warn};

/// Where notifications come from. Implementations own scraping or snapshot
/// reading; they hand back records already stripped of placeholder-avatar
/// noise.
pub trait NotificationSource {
    fn collect(&mut self) -> anyhow::Result<Vec<RawNotification>>;

    /// Resolve a user's profile URL. `Ok(None)` means the profile exists but
    /// could not be reached right now.
    fn resolve_profile_url(&mut self, user_id: &str) -> anyhow::Result<Option<String>>;
}

/// Posts a bound comment to a user's profile. The CLI maps this onto an
/// external command; tests plug in recorders.
pub trait OutreachExecutor {
    fn post(&mut self, profile_url: &str, comment: &str) -> anyhow::Result<()>;
}

/// What one analysis run did, for logs and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub collected: usize,
    pub aggregated: usize,
    pub selected: usize,
    /// User ids selected this run, in priority order.
    pub selected_ids: Vec<String>,
    pub comments_bound: usize,
    pub store_total: usize,
    /// Set when collection failed and the run proceeded empty.
    pub collector_error: Option<String>,
    /// Set when the template file could not be used this run.
    pub template_error: Option<String>,
}

/// Run the pipeline once against `store`, which the caller has already locked
/// and loaded. `templates` is `Err` when the template file failed to load;
/// the run continues and selected records keep `comment_text = None`.
pub fn run<S, R>(
    source: &mut S,
    store: &mut Store,
    templates: Result<&TemplateSet, String>,
    pipeline: &PipelineConfig,
    comment: &CommentConfig,
    now: Timestamp,
    rng: &mut R,
) -> RunSummary
where
    S: NotificationSource,
    R: Rng + ?Sized,
{
    let mut summary = RunSummary::default();

    let notifications = match source.collect() {
        Ok(batch) => batch,
        Err(err) => {
            warn!(error = %err, "collection failed, running empty");
            summary.collector_error = Some(err.to_string());
            Vec::new()
        }
    };
    summary.collected = notifications.len();
    info!(collected = summary.collected, "notifications collected");

    let mut users = fold_notifications(&notifications);
    summary.aggregated = users.len();
    classify_all(&mut users);

    // Only actionable activity the store has not already absorbed enters
    // ranking. Uncategorized users never reach the store or the executor.
    let lookback_cutoff = now.hours_before(pipeline.lookback_hours);
    let newest_known = store.newest_timestamp();
    users.retain(|u| {
        u.category.is_actionable()
            && u.latest_action_timestamp >= lookback_cutoff
            && newest_known.map_or(true, |newest| u.latest_action_timestamp > newest)
    });
    debug!(
        aggregated = summary.aggregated,
        eligible = users.len(),
        "pre-filter applied"
    );

    let mut selected = rank_and_truncate(users, pipeline.target_count);
    summary.selected = selected.len();
    summary.selected_ids = selected.iter().map(|u| u.user_id.clone()).collect();

    match &templates {
        Ok(set) => {
            for user in &mut selected {
                user.comment_text =
                    Some(bind_comment(user, set, comment.max_name_chars, rng));
            }
            summary.comments_bound = selected.len();
        }
        Err(err) => {
            warn!(error = %err, "template phase failed, comments left unbound");
            summary.template_error = Some(err.clone());
        }
    }

    for user in &mut selected {
        user.profile_url = match source.resolve_profile_url(&user.user_id) {
            Ok(Some(url)) => Some(url),
            Ok(None) => Some(UNREACHABLE_PROFILE.to_string()),
            Err(err) => {
                warn!(user_id = %user.user_id, error = %err, "profile resolution failed");
                Some(UNREACHABLE_PROFILE.to_string())
            }
        };
    }

    store.merge(selected, now, pipeline.retention_hours);
    summary.store_total = store.len();
    info!(
        selected = summary.selected,
        store_total = summary.store_total,
        "run merged into store"
    );
    summary
}
