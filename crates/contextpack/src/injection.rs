/// Section tags are emitted verbatim as named by the behavior this builder
/// implements — callers and downstream prompt templates match on them.
pub fn format_profile(lines: &[String]) -> String {
    format_section("### Kullanıcı Profili", lines)
}

pub fn format_hard_facts(lines: &[String]) -> String {
    format_section("### Sert Gerçekler", lines)
}

pub fn format_soft_signals(lines: &[String]) -> String {
    format_section("### Yumuşak Sinyaller", lines)
}

pub fn format_open_questions(lines: &[String]) -> String {
    format_section("### Açık Sorular", lines)
}

pub fn format_episodic(lines: &[String]) -> String {
    format_section("### İlgili Geçmiş Bölümler", lines)
}

pub fn format_recent_transcript(lines: &[String]) -> String {
    format_section("### Yakın Geçmiş", lines)
}

fn format_section(tag: &str, lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    format!("{tag}\n{}\n", lines.join("\n"))
}

/// Prepended when active conflicts exist anywhere in the assembled context.
pub fn format_conflict_note() -> &'static str {
    "[ÇÖZÜLMESİ GEREKEN DURUM]\n"
}

/// Appended when the user message contains an unresolved pronoun and a
/// recently active entity exists in this session to resolve it against.
pub fn format_dst_reference(entity: &str) -> String {
    format!("[DST_REFERENCE: {entity}]\n")
}

/// Returned verbatim when `ContextMode::Off` short-circuits retrieval.
pub fn off_mode_stub() -> &'static str {
    "[MEMORY_OFF]\n"
}
