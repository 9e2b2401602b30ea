use regex::Regex;
use std::sync::OnceLock;

fn thought_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[THOUGHT\].*?(\n\n|$)").unwrap())
}

fn graph_score_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\[[^\]]*score[^\]]*\]").unwrap())
}

fn debug_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^\s*\[?DEBUG\]?:?.*$").unwrap())
}

/// Is this character in a CJK (Han, Hiragana, Katakana, Hangul) block?
/// The synthesizer is never asked to respond in CJK scripts, so any
/// occurrence is leaked model scratch space rather than an intended reply.
fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF   // CJK Unified Ideographs
        | 0x3040..=0x309F // Hiragana
        | 0x30A0..=0x30FF // Katakana
        | 0xAC00..=0xD7A3 // Hangul syllables
    )
}

/// Strip CJK characters, `[THOUGHT]...` scratch blocks, graph-score tags,
/// and debug markers from a synthesized reply before it reaches the user.
pub fn sanitize_output(text: &str) -> String {
    let without_thoughts = thought_tag_re().replace_all(text, "");
    let without_scores = graph_score_re().replace_all(&without_thoughts, "");
    let without_debug = debug_marker_re().replace_all(&without_scores, "");
    let without_cjk: String = without_debug.chars().filter(|c| !is_cjk(*c)).collect();

    without_cjk
        .lines()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_cjk_characters() {
        let out = sanitize_output("Hello 你好 world");
        assert_eq!(out, "Hello  world");
    }

    #[test]
    fn strips_thought_block() {
        let out = sanitize_output("[THOUGHT] planning the reply\n\nHere is the answer.");
        assert_eq!(out, "Here is the answer.");
    }

    #[test]
    fn strips_graph_score_tag() {
        let out = sanitize_output("Berlin [score: 0.91] is lovely");
        assert_eq!(out, "Berlin  is lovely");
    }

    #[test]
    fn strips_debug_marker_lines() {
        let out = sanitize_output("Real reply\n[DEBUG]: cache miss on key xyz\nMore reply");
        assert!(!out.contains("DEBUG"));
        assert!(out.contains("Real reply"));
        assert!(out.contains("More reply"));
    }

    #[test]
    fn leaves_plain_text_untouched() {
        let out = sanitize_output("Just a normal reply.");
        assert_eq!(out, "Just a normal reply.");
    }
}
