use std::collections::HashMap;

use crate::types::TaskResult;

/// Replace `{tX.output}` placeholders in a generation/context_clarification
/// prompt with the referenced task's stringified output. A dependency that
/// failed (or is simply absent from `results`, e.g. skipped by a cancelled
/// layer) yields the placeholder text verbatim rather than panicking.
pub fn substitute_placeholders(template: &str, results: &HashMap<String, TaskResult>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let Some(end_rel) = rest[start..].find('}') else {
            out.push_str(rest);
            return out;
        };
        let end = start + end_rel;
        let placeholder = &rest[start + 1..end];

        out.push_str(&rest[..start]);
        out.push_str(&resolve_placeholder(placeholder, results));
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}

fn resolve_placeholder(placeholder: &str, results: &HashMap<String, TaskResult>) -> String {
    let Some(task_id) = placeholder.strip_suffix(".output") else {
        return format!("{{{placeholder}}}");
    };
    match results.get(task_id) {
        Some(r) if r.error.is_none() => r
            .output
            .as_ref()
            .map(render_output)
            .unwrap_or_default(),
        _ => format!("[Hata: {task_id} verisi alınamadı]"),
    }
}

fn render_output(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Split a leading `<thought>...</thought>` block off a model response,
/// returning `(thought, remaining_text)`.
pub fn split_thought_prefix(text: &str) -> (Option<String>, String) {
    let trimmed = text.trim_start();
    let Some(after_open) = trimmed.strip_prefix("<thought>") else {
        return (None, text.to_string());
    };
    let Some(close_idx) = after_open.find("</thought>") else {
        return (None, text.to_string());
    };
    let thought = after_open[..close_idx].trim().to_string();
    let remainder = after_open[close_idx + "</thought>".len()..].trim_start().to_string();
    (Some(thought), remainder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskResult;
    use serde_json::json;

    fn results_with(id: &str, result: TaskResult) -> HashMap<String, TaskResult> {
        let mut m = HashMap::new();
        m.insert(id.to_string(), result);
        m
    }

    #[test]
    fn substitutes_successful_output() {
        let results = results_with("t1", TaskResult::ok("t1", "tool", json!("Berlin")));
        let out = substitute_placeholders("weather in {t1.output}?", &results);
        assert_eq!(out, "weather in Berlin?");
    }

    #[test]
    fn substitutes_failed_dep_with_error_placeholder() {
        let results = results_with("t1", TaskResult::err("t1", "tool", "boom"));
        let out = substitute_placeholders("data: {t1.output}", &results);
        assert_eq!(out, "data: [Hata: t1 verisi alınamadı]");
    }

    #[test]
    fn substitutes_missing_dep_with_error_placeholder() {
        let results = HashMap::new();
        let out = substitute_placeholders("data: {t1.output}", &results);
        assert_eq!(out, "data: [Hata: t1 verisi alınamadı]");
    }

    #[test]
    fn leaves_non_output_braces_untouched() {
        let results = HashMap::new();
        let out = substitute_placeholders("literal {foo} stays", &results);
        assert_eq!(out, "literal {foo} stays");
    }

    #[test]
    fn splits_thought_prefix() {
        let (thought, rest) = split_thought_prefix("<thought>planning ahead</thought>Here is the answer.");
        assert_eq!(thought, Some("planning ahead".to_string()));
        assert_eq!(rest, "Here is the answer.");
    }

    #[test]
    fn no_thought_prefix_returns_none() {
        let (thought, rest) = split_thought_prefix("Just an answer.");
        assert_eq!(thought, None);
        assert_eq!(rest, "Just an answer.");
    }
}
