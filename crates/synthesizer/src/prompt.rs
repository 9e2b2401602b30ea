use chrono::Utc;

use crate::presets::StyleCatalog;
use crate::preamble::memory_voice_preamble;
use crate::situational::situational_instructions;
use crate::types::SynthInput;

/// Assemble the single combined system prompt the synthesizer model sees:
/// memory voice preamble, persona/tone/length/emoji/detail directives, and
/// situational instructions, followed by the raw task results.
pub fn build_prompt(input: &SynthInput<'_>, catalog: &StyleCatalog) -> String {
    let mut sections = Vec::new();

    if let Some(preamble) = memory_voice_preamble(&input.identity_facts) {
        sections.push(preamble);
    }

    let preset = catalog.resolve(input.style_mode);
    sections.push(format!(
        "You are {persona}. Tone: {tone}. Length: {length}. Detail level: {detail}. {emoji}",
        persona = preset.persona,
        tone = preset.tone,
        length = preset.length,
        detail = preset.detail,
        emoji = if preset.emoji {
            "Light emoji use is welcome where it fits naturally."
        } else {
            "Do not use emoji."
        }
    ));

    let situational = situational_instructions(
        input.user_message,
        input.conflict_present,
        input.topic_changed,
        input.topic,
        input.prior_mood.as_ref(),
        input.session_turn_count,
        Utc::now(),
    );
    sections.extend(situational);

    if !input.results.is_empty() {
        sections.push("Task results to draw on when composing your reply:".to_string());
        for result in &input.results {
            match (&result.output, &result.error) {
                (_, Some(err)) => sections.push(format!("- {} failed: {err}", result.task_id)),
                (Some(output), None) => {
                    sections.push(format!("- {}: {}", result.task_id, output))
                }
                (None, None) => {}
            }
        }
    }

    sections.join("\n\n")
}
