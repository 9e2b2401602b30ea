/// Build the "memory voice" preamble: a natural-language paraphrase of the
/// user's identity facts, with a strict instruction never to reveal that
/// this knowledge comes from a stored profile.
pub fn memory_voice_preamble(identity_facts: &[String]) -> Option<String> {
    if identity_facts.is_empty() {
        return None;
    }
    let facts = identity_facts.join("; ");
    Some(format!(
        "You already know the following about the user from past conversation: {facts}. \
         Speak as if you simply remember this naturally. Never say or imply the words \
         \"profile\", \"records\", or \"database\" — you are not consulting a system, you \
         just remember."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_facts_yield_no_preamble() {
        assert!(memory_voice_preamble(&[]).is_none());
    }

    #[test]
    fn facts_are_joined_and_instruction_included() {
        let facts = vec!["lives in Berlin".to_string(), "likes coffee".to_string()];
        let preamble = memory_voice_preamble(&facts).unwrap();
        assert!(preamble.contains("lives in Berlin"));
        assert!(preamble.contains("likes coffee"));
        assert!(preamble.contains("profile"));
    }
}
