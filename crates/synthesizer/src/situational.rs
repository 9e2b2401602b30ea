use chrono::{DateTime, Duration, Utc};

use crate::types::MoodSignal;

const FATIGUE_MARKERS: &[&str] = &["tired", "exhausted", "so drained", "can't sleep", "no energy"];
const ELATION_MARKERS: &[&str] = &["so happy", "amazing news", "thrilled", "can't believe it", "best day"];
const CONTINUITY_WINDOW_DAYS: i64 = 3;

/// Situational instructions appended to the synthesizer prompt based on
/// signals outside the raw task results: mirroring, conflict handling,
/// topic transitions, and emotional continuity.
pub fn situational_instructions(
    user_message: &str,
    conflict_present: bool,
    topic_changed: bool,
    topic: &str,
    prior_mood: Option<&MoodSignal>,
    session_turn_count: u32,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut instructions = Vec::new();
    let lowered = user_message.to_lowercase();

    if let Some(mirror) = mirroring_instruction(&lowered) {
        instructions.push(mirror);
    }
    if conflict_present {
        instructions.push(
            "The user's stored memory has conflicting information on this topic. Gently ask \
             which version is correct rather than asserting either as fact."
                .to_string(),
        );
    }
    if topic_changed {
        instructions.push(format!(
            "The conversation has just shifted to a new topic (\"{topic}\"). Acknowledge the \
             shift naturally rather than responding as if it were a continuation."
        ));
    }
    if let Some(mood) = prior_mood {
        if session_turn_count == 0 && now - mood.recorded_at <= Duration::days(CONTINUITY_WINDOW_DAYS) {
            instructions.push(format!(
                "The last time you spoke, the user seemed {}. If it feels natural, check in on \
                 how they're doing now before moving on.",
                mood.label
            ));
        }
    }

    instructions
}

fn mirroring_instruction(lowered_message: &str) -> Option<String> {
    if FATIGUE_MARKERS.iter().any(|m| lowered_message.contains(m)) {
        return Some(
            "The user sounds tired or worn out. Keep your tone gentle and your reply brief."
                .to_string(),
        );
    }
    if ELATION_MARKERS.iter().any(|m| lowered_message.contains(m)) {
        return Some(
            "The user sounds excited or happy. Match that energy in your reply.".to_string(),
        );
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 26, 12, 0, 0).unwrap()
    }

    #[test]
    fn fatigue_marker_triggers_mirroring() {
        let instructions = situational_instructions(
            "I'm so exhausted today", false, false, "general", None, 1, now(),
        );
        assert!(instructions.iter().any(|i| i.contains("tired")));
    }

    #[test]
    fn elation_marker_triggers_mirroring() {
        let instructions = situational_instructions(
            "I'm thrilled about the news!", false, false, "general", None, 1, now(),
        );
        assert!(instructions.iter().any(|i| i.contains("excited")));
    }

    #[test]
    fn conflict_present_adds_instruction() {
        let instructions = situational_instructions("hi", true, false, "general", None, 1, now());
        assert!(instructions.iter().any(|i| i.contains("conflicting")));
    }

    #[test]
    fn topic_change_adds_instruction() {
        let instructions =
            situational_instructions("hi", false, true, "cooking", None, 1, now());
        assert!(instructions.iter().any(|i| i.contains("cooking")));
    }

    #[test]
    fn emotional_continuity_fires_within_window_on_first_turn() {
        let mood = MoodSignal {
            label: "stressed".to_string(),
            recorded_at: now() - Duration::days(1),
        };
        let instructions =
            situational_instructions("hi", false, false, "general", Some(&mood), 0, now());
        assert!(instructions.iter().any(|i| i.contains("stressed")));
    }

    #[test]
    fn emotional_continuity_skipped_outside_window() {
        let mood = MoodSignal {
            label: "stressed".to_string(),
            recorded_at: now() - Duration::days(10),
        };
        let instructions =
            situational_instructions("hi", false, false, "general", Some(&mood), 0, now());
        assert!(!instructions.iter().any(|i| i.contains("stressed")));
    }

    #[test]
    fn emotional_continuity_skipped_when_not_first_turn() {
        let mood = MoodSignal {
            label: "stressed".to_string(),
            recorded_at: now() - Duration::days(1),
        };
        let instructions =
            situational_instructions("hi", false, false, "general", Some(&mood), 5, now());
        assert!(!instructions.iter().any(|i| i.contains("stressed")));
    }
}
