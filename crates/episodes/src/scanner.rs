use chrono::{DateTime, Utc};
use uuid::Uuid;

use sa_domain::config::EpisodePipelineConfig;

use crate::consolidation::find_consolidation_groups;
use crate::store::EpisodeStore;

/// Scan every session for REGULAR episodes eligible for consolidation
/// (READY, old enough, not already folded) and enqueue PENDING
/// consolidated episodes for each full window found. Returns the ids of
/// the episodes it created — the worker loop picks them up on its next
/// pass exactly like any other PENDING episode.
pub fn scan_and_enqueue_consolidations(
    store: &EpisodeStore,
    config: &EpisodePipelineConfig,
    now: DateTime<Utc>,
) -> Vec<Uuid> {
    let groups_by_session =
        store.regular_ready_grouped_by_session_older_than(config.min_age_days_for_consolidation, now);

    let mut created = Vec::new();
    for (session_id, episodes) in groups_by_session {
        let Some(user_id) = episodes.first().map(|e| e.user_id.clone()) else {
            continue;
        };
        for group in find_consolidation_groups(&episodes, config.consolidation_window) {
            let id = store.create_consolidated_pending(&user_id, &session_id, group);
            created.push(id);
        }
    }
    created
}
