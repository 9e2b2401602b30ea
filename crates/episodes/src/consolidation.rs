use uuid::Uuid;

use crate::types::Episode;

/// Split a session's eligible REGULAR episodes (already sorted by
/// `start_turn`, already filtered to READY + old enough + not yet folded
/// into a consolidated episode) into non-overlapping groups of exactly
/// `window` consecutive episodes. A trailing partial group is left for a
/// later run once enough episodes accumulate.
pub fn find_consolidation_groups(episodes: &[Episode], window: u32) -> Vec<Vec<Uuid>> {
    let window = window.max(1) as usize;
    let mut groups = Vec::new();
    let mut i = 0;
    while i + window <= episodes.len() {
        groups.push(episodes[i..i + window].iter().map(|e| e.episode_id).collect());
        i += window;
    }
    groups
}

/// Build the consolidated summary text from the source episodes' own
/// summaries, in turn order. The summarizer model is not re-invoked here —
/// a consolidation job folds existing summaries together rather than
/// re-reading the original transcript.
pub fn concat_source_summaries(episodes: &[Episode]) -> String {
    episodes
        .iter()
        .filter_map(|e| e.summary.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EpisodeKind, EpisodeStatus, VectorStatus};
    use chrono::Utc;

    fn episode(start_turn: u32, summary: &str) -> Episode {
        let now = Utc::now();
        Episode {
            episode_id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
            kind: EpisodeKind::Regular,
            status: EpisodeStatus::Ready,
            vector_status: VectorStatus::Ready,
            start_turn,
            end_turn: start_turn + 19,
            summary: Some(summary.to_string()),
            source_episode_ids: Vec::new(),
            error: None,
            vector_error: None,
            attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn groups_exact_multiples_of_window() {
        let episodes: Vec<Episode> = (0..10).map(|i| episode(i * 20, "s")).collect();
        let groups = find_consolidation_groups(&episodes, 5);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 5);
        assert_eq!(groups[1].len(), 5);
    }

    #[test]
    fn leaves_trailing_partial_group_unconsolidated() {
        let episodes: Vec<Episode> = (0..7).map(|i| episode(i * 20, "s")).collect();
        let groups = find_consolidation_groups(&episodes, 5);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 5);
    }

    #[test]
    fn fewer_than_window_produces_no_groups() {
        let episodes: Vec<Episode> = (0..3).map(|i| episode(i * 20, "s")).collect();
        assert!(find_consolidation_groups(&episodes, 5).is_empty());
    }

    #[test]
    fn concat_joins_summaries_in_order() {
        let episodes = vec![episode(0, "first"), episode(20, "second")];
        assert_eq!(concat_source_summaries(&episodes), "first\nsecond");
    }

    #[test]
    fn concat_skips_episodes_without_summary() {
        let mut e = episode(0, "first");
        e.summary = None;
        let episodes = vec![e, episode(20, "second")];
        assert_eq!(concat_source_summaries(&episodes), "second");
    }
}
