use crate::types::{RawTriple, RawTripleEnvelope};
use sa_domain::error::{Error, Result};

/// Parse a model's raw JSON output into candidate triples.
///
/// Tolerant of the two shapes models commonly emit: a bare JSON array, or
/// an object with a `"triples"` key. A completely unparseable response is
/// an [`Error::ExtractorParse`], but a parseable array with some malformed
/// elements keeps the valid ones.
pub fn parse_llm_output(text: &str) -> Result<Vec<RawTriple>> {
    let trimmed = strip_code_fence(text.trim());

    if let Ok(triples) = serde_json::from_str::<Vec<RawTriple>>(trimmed) {
        return Ok(triples);
    }
    if let Ok(envelope) = serde_json::from_str::<RawTripleEnvelope>(trimmed) {
        return Ok(envelope.triples);
    }

    // Fall back to a permissive element-by-element parse so one malformed
    // entry in an otherwise-valid array doesn't discard everything.
    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|e| Error::ExtractorParse(format!("not valid JSON: {e}")))?;

    let array = value
        .as_array()
        .cloned()
        .or_else(|| value.get("triples").and_then(|v| v.as_array()).cloned())
        .ok_or_else(|| Error::ExtractorParse("expected a JSON array of triples".to_string()))?;

    let mut triples = Vec::new();
    for (i, item) in array.into_iter().enumerate() {
        match serde_json::from_value::<RawTriple>(item) {
            Ok(t) => triples.push(t),
            Err(e) => tracing::warn!(index = i, error = %e, "skipping malformed triple"),
        }
    }
    Ok(triples)
}

/// Strip a leading/trailing ```json ... ``` fence if present.
fn strip_code_fence(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text)
        .trim();
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let json = r#"[{"subject":"I","predicate":"likes","object":"coffee","confidence":0.8}]"#;
        let triples = parse_llm_output(json).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].object, "coffee");
    }

    #[test]
    fn parses_enveloped_object() {
        let json = r#"{"triples":[{"subject":"I","predicate":"likes","object":"tea"}]}"#;
        let triples = parse_llm_output(json).unwrap();
        assert_eq!(triples.len(), 1);
    }

    #[test]
    fn strips_code_fence() {
        let json = "```json\n[{\"subject\":\"I\",\"predicate\":\"likes\",\"object\":\"tea\"}]\n```";
        let triples = parse_llm_output(json).unwrap();
        assert_eq!(triples.len(), 1);
    }

    #[test]
    fn skips_malformed_element_keeps_rest() {
        let json = r#"[{"subject":"I","predicate":"likes","object":"tea"},{"subject":"I"}]"#;
        let triples = parse_llm_output(json).unwrap();
        assert_eq!(triples.len(), 1);
    }

    #[test]
    fn totally_invalid_json_errors() {
        assert!(parse_llm_output("not json at all").is_err());
    }

    #[test]
    fn default_confidence_applied_when_missing() {
        let json = r#"[{"subject":"I","predicate":"likes","object":"tea"}]"#;
        let triples = parse_llm_output(json).unwrap();
        assert_eq!(triples[0].confidence, 0.5);
    }
}
