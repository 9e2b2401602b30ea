use std::collections::HashSet;

use sa_domain::config::ContextBudgetConfig;
use sa_domain::runtime_flags::RuntimeFlags;
use sa_domain::trace::TraceEvent;

use crate::dedup;
use crate::injection;
use crate::intent::{self};
use crate::report::{ContextReport, LayerReport};
use crate::truncation::{self, Section};
use crate::types::{
    ContextInputs, ContextMode, EpisodeKindHint, Intent, CONSOLIDATED_BOOST,
};

const MAX_TRANSCRIPT_TURNS: usize = 12;
const MAX_EPISODIC: usize = 10;
const MAX_IDENTITY_LINES: usize = 10;
const MAX_HARD_LINES: usize = 20;
const MAX_SOFT_LINES: usize = 20;
const MAX_OPEN_QUESTION_LINES: usize = 10;

const PRONOUNS: &[&str] = &["he", "she", "it", "him", "her", "they", "them"];

/// Deterministic context builder: a pure function over pre-gathered layer
/// data (retrieval happens upstream in the orchestrator) that assembles a
/// bounded, deduplicated, intent-weighted context string plus a
/// machine-readable report.
pub struct ContextBuilder {
    config: ContextBudgetConfig,
}

impl ContextBuilder {
    pub fn new(config: ContextBudgetConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, inputs: ContextInputs<'_>, flags: &RuntimeFlags) -> (String, ContextReport) {
        let intent = intent::classify_intent(inputs.user_message);

        if inputs.mode == ContextMode::Off {
            return (
                injection::off_mode_stub().to_string(),
                ContextReport {
                    intent: format!("{intent:?}").to_uppercase(),
                    mode: "OFF".to_string(),
                    layers: vec![],
                    selected_episode_ids: vec![],
                    total_injected_chars: injection::off_mode_stub().len(),
                    conflict_note_included: false,
                    dst_reference: None,
                },
            );
        }

        if flags.bypass_memory_injection {
            return self.build_transcript_only(inputs, intent);
        }

        let (w_transcript, w_episodic, w_semantic) =
            intent::layer_weights(intent, inputs.mode, &self.config.intent_layer_weights);

        let total = self.config.layer_max_chars as f64;
        let budget_transcript = (total * w_transcript) as usize;
        let budget_episodic = (total * w_episodic) as usize;
        let budget_semantic = (total * w_semantic) as usize;

        let mut seen = HashSet::new();

        // ── Transcript layer ────────────────────────────────────────
        let transcript_lines: Vec<String> = inputs
            .transcript_turns
            .iter()
            .rev()
            .take(MAX_TRANSCRIPT_TURNS)
            .rev()
            .map(|t| format!("{}: {}", t.role, t.content))
            .collect();
        let transcript_lines = dedup::dedup_against(transcript_lines, &mut seen);
        let transcript_content = injection::format_recent_transcript(&transcript_lines);

        // ── Episodic layer ──────────────────────────────────────────
        let mut ranked: Vec<(&str, f32)> = inputs
            .episodic_candidates
            .iter()
            .map(|c| {
                let boosted = if c.kind == EpisodeKindHint::Consolidated {
                    c.similarity * CONSOLIDATED_BOOST
                } else {
                    c.similarity
                };
                (c.episode_id.as_str(), boosted)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(MAX_EPISODIC);
        let selected_episode_ids: Vec<String> = ranked.iter().map(|(id, _)| id.to_string()).collect();

        let episodic_lines: Vec<String> = ranked
            .iter()
            .filter_map(|(id, _)| {
                inputs
                    .episodic_candidates
                    .iter()
                    .find(|c| c.episode_id == *id)
                    .map(|c| c.summary.clone())
            })
            .collect();
        let episodic_lines = dedup::dedup_against(episodic_lines, &mut seen);
        let episodic_content = injection::format_episodic(&episodic_lines);

        // ── Semantic layer (identity / hard / soft / open questions) ──
        let identity_lines = truncate_lines(
            dedup::dedup_against(inputs.identity_facts, &mut seen),
            MAX_IDENTITY_LINES,
        );
        let hard_lines = truncate_lines(
            dedup::dedup_against(inputs.hard_facts, &mut seen),
            MAX_HARD_LINES,
        );
        let soft_lines = truncate_lines(
            dedup::dedup_against(inputs.soft_facts, &mut seen),
            MAX_SOFT_LINES,
        );
        let open_question_lines = truncate_lines(
            dedup::dedup_against(inputs.open_questions, &mut seen),
            MAX_OPEN_QUESTION_LINES,
        );

        let conflict_note_included = !open_question_lines.is_empty();

        let mut semantic_content = String::new();
        semantic_content.push_str(&injection::format_profile(&identity_lines));
        semantic_content.push_str(&injection::format_hard_facts(&hard_lines));
        semantic_content.push_str(&injection::format_soft_signals(&soft_lines));
        semantic_content.push_str(&injection::format_open_questions(&open_question_lines));

        // ── Per-layer caps + total cap ───────────────────────────────
        let mut sections = vec![
            make_section("transcript", transcript_content, budget_transcript),
            make_section("episodic", episodic_content, budget_episodic),
            make_section("semantic", semantic_content, budget_semantic),
        ];
        truncation::apply_total_cap(&mut sections, self.config.total_max_chars);

        // ── Pronoun / dangling-entity hint ───────────────────────────
        let dst_reference = if has_dangling_pronoun(inputs.user_message) {
            inputs.last_active_entity.clone()
        } else {
            None
        };

        // ── Assemble ─────────────────────────────────────────────────
        let mut assembled = String::new();
        if conflict_note_included {
            assembled.push_str(injection::format_conflict_note());
        }
        for section in &sections {
            if section.included && !section.content.is_empty() {
                assembled.push_str(&section.content);
            }
        }
        if let Some(entity) = &dst_reference {
            assembled.push_str(&injection::format_dst_reference(entity));
        }

        let layers: Vec<LayerReport> = sections
            .iter()
            .map(|s| {
                TraceEvent::ContextLayerBuilt {
                    layer: s.name.clone(),
                    intent: format!("{intent:?}").to_uppercase(),
                    raw_chars: s.raw_chars,
                    injected_chars: s.content.len(),
                    truncated: s.truncated_per_layer || s.truncated_total_cap,
                }
                .emit();

                LayerReport {
                    layer: s.name.clone(),
                    raw_chars: s.raw_chars,
                    injected_chars: s.content.len(),
                    truncated_per_layer: s.truncated_per_layer,
                    truncated_total_cap: s.truncated_total_cap,
                    included: s.included,
                }
            })
            .collect();

        let report = ContextReport {
            intent: format!("{intent:?}").to_uppercase(),
            mode: format!("{:?}", inputs.mode).to_uppercase(),
            layers,
            selected_episode_ids,
            total_injected_chars: assembled.len(),
            conflict_note_included,
            dst_reference,
        };

        (assembled, report)
    }

    fn build_transcript_only(&self, inputs: ContextInputs<'_>, intent: Intent) -> (String, ContextReport) {
        let lines: Vec<String> = inputs
            .transcript_turns
            .iter()
            .rev()
            .take(MAX_TRANSCRIPT_TURNS)
            .rev()
            .map(|t| format!("{}: {}", t.role, t.content))
            .collect();
        let content = injection::format_recent_transcript(&lines);

        let report = ContextReport {
            intent: format!("{intent:?}").to_uppercase(),
            mode: format!("{:?}", inputs.mode).to_uppercase(),
            layers: vec![LayerReport {
                layer: "transcript".to_string(),
                raw_chars: content.len(),
                injected_chars: content.len(),
                truncated_per_layer: false,
                truncated_total_cap: false,
                included: true,
            }],
            selected_episode_ids: vec![],
            total_injected_chars: content.len(),
            conflict_note_included: false,
            dst_reference: None,
        };

        (content, report)
    }
}

fn make_section(name: &str, content: String, budget: usize) -> Section {
    let raw_chars = content.len();
    let (truncated_content, was_truncated) = truncation::truncate_per_layer(&content, budget);
    Section {
        name: name.to_string(),
        content: truncated_content,
        raw_chars,
        truncated_per_layer: was_truncated,
        truncated_total_cap: false,
        included: true,
        missing: false,
    }
}

fn truncate_lines(lines: Vec<String>, max_lines: usize) -> Vec<String> {
    lines.into_iter().take(max_lines).collect()
}

fn has_dangling_pronoun(user_message: &str) -> bool {
    let lower = user_message.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| PRONOUNS.contains(&word))
}
