use std::collections::HashMap;

use crate::types::{ContextMode, Intent};

/// Self-reference words that force PERSONAL regardless of other keywords.
const SELF_REFERENCE_TRIGGERS: &[&str] = &[
    "i am", "i'm", "my name", "about me", "remember that i", "i like", "i live",
];

const TASK_KEYWORDS: &[&str] = &[
    "build", "fix", "implement", "debug", "write code", "deploy", "run", "create a",
];

const FOLLOWUP_KEYWORDS: &[&str] = &[
    "what about", "and then", "continue", "also", "what else", "keep going",
];

/// Classify a user message into an intent bucket by heuristic keyword rules.
/// Self-reference triggers take precedence over task/followup keywords.
pub fn classify_intent(user_message: &str) -> Intent {
    let lower = user_message.to_lowercase();

    if SELF_REFERENCE_TRIGGERS.iter().any(|t| lower.contains(t)) {
        return Intent::Personal;
    }

    let is_task = TASK_KEYWORDS.iter().any(|k| lower.contains(k));
    let is_followup = FOLLOWUP_KEYWORDS.iter().any(|k| lower.contains(k));

    match (is_task, is_followup) {
        (true, true) => Intent::Mixed,
        (true, false) => Intent::Task,
        (false, true) => Intent::Followup,
        (false, false) => Intent::General,
    }
}

fn intent_key(intent: Intent) -> &'static str {
    match intent {
        Intent::Personal => "personal",
        Intent::Task => "task",
        Intent::Followup => "followup",
        Intent::General => "general",
        Intent::Mixed => "mixed",
    }
}

/// Default (transcript, episodic, semantic) weight triples, the fixed
/// layer-weight profile table per intent.
fn default_weights(intent: Intent) -> (f64, f64, f64) {
    match intent {
        Intent::General => (0.80, 0.20, 0.00),
        Intent::Personal => (0.30, 0.20, 0.50),
        Intent::Task => (0.35, 0.25, 0.40),
        Intent::Followup => (0.60, 0.25, 0.15),
        Intent::Mixed => (0.40, 0.30, 0.30),
    }
}

/// Resolve the (transcript, episodic, semantic) weight triple for an
/// intent, honoring config overrides (`intent_layer_weights`) where present
/// and falling back to the fixed table otherwise. When `mode` is
/// `Off`, the semantic weight is zeroed and the remainder is redistributed
/// proportionally across transcript and episodic.
pub fn layer_weights(
    intent: Intent,
    mode: ContextMode,
    overrides: &HashMap<String, HashMap<String, f64>>,
) -> (f64, f64, f64) {
    let (mut transcript, mut episodic, mut semantic) = default_weights(intent);

    if let Some(layer_overrides) = overrides.get(intent_key(intent)) {
        if let Some(&w) = layer_overrides.get("transcript") {
            transcript = w;
        }
        if let Some(&w) = layer_overrides.get("episodic") {
            episodic = w;
        }
        if let Some(&w) = layer_overrides.get("semantic") {
            semantic = w;
        }
    }

    if mode == ContextMode::Off && semantic > 0.0 {
        let remainder = transcript + episodic;
        if remainder > 0.0 {
            let scale = (transcript + episodic + semantic) / remainder;
            transcript *= scale;
            episodic *= scale;
        }
        semantic = 0.0;
    }

    (transcript, episodic, semantic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_reference_overrides_task_keywords() {
        let intent = classify_intent("I am trying to build a house, tell me about me");
        assert_eq!(intent, Intent::Personal);
    }

    #[test]
    fn task_keyword_classifies_task() {
        assert_eq!(classify_intent("please fix the bug in auth.rs"), Intent::Task);
    }

    #[test]
    fn followup_keyword_classifies_followup() {
        assert_eq!(classify_intent("what about the other file"), Intent::Followup);
    }

    #[test]
    fn no_keywords_is_general() {
        assert_eq!(classify_intent("nice weather today"), Intent::General);
    }

    #[test]
    fn task_and_followup_keywords_is_mixed() {
        assert_eq!(
            classify_intent("and then fix the deploy script"),
            Intent::Mixed
        );
    }

    #[test]
    fn default_weights_match_spec_table() {
        let overrides = HashMap::new();
        let (t, e, s) = layer_weights(Intent::General, ContextMode::Standard, &overrides);
        assert_eq!((t, e, s), (0.80, 0.20, 0.00));
    }

    #[test]
    fn off_mode_zeroes_semantic_and_redistributes() {
        let overrides = HashMap::new();
        let (t, e, s) = layer_weights(Intent::Personal, ContextMode::Off, &overrides);
        assert_eq!(s, 0.0);
        assert!((t + e - 1.0).abs() < 1e-9);
    }

    #[test]
    fn override_replaces_default_weight() {
        let mut overrides = HashMap::new();
        let mut task_overrides = HashMap::new();
        task_overrides.insert("semantic".to_string(), 0.9);
        overrides.insert("task".to_string(), task_overrides);
        let (_, _, s) = layer_weights(Intent::Task, ContextMode::Standard, &overrides);
        assert_eq!(s, 0.9);
    }
}
