use std::collections::HashSet;

const ROLE_PREFIXES: &[&str] = &["user:", "assistant:", "system:"];

/// Lowercase, collapse internal whitespace runs, and strip a leading role
/// or predicate-style prefix (e.g. `"User: I like coffee"` and
/// `"likes: coffee"` normalize close enough to collide with a duplicate
/// transcript line).
fn normalize(line: &str) -> String {
    let lower = line.to_lowercase();
    let mut stripped = lower.as_str();
    for prefix in ROLE_PREFIXES {
        if let Some(rest) = stripped.strip_prefix(prefix) {
            stripped = rest.trim_start();
            break;
        }
    }
    if let Some(colon) = stripped.find(':') {
        let (head, _) = stripped.split_at(colon);
        if head.split_whitespace().count() <= 3 {
            stripped = stripped[colon + 1..].trim_start();
        }
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove lines that normalize to something already seen (in `seen` or
/// earlier in `lines`), preserving order. `seen` accumulates across calls so
/// later layers can dedupe against earlier ones.
pub fn dedup_against(lines: Vec<String>, seen: &mut HashSet<String>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| {
            let key = normalize(line);
            if key.is_empty() || seen.contains(&key) {
                false
            } else {
                seen.insert(key);
                true
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize("  Likes   Coffee  "), "likes coffee");
    }

    #[test]
    fn strips_role_prefix() {
        assert_eq!(normalize("User: I like coffee"), "i like coffee");
    }

    #[test]
    fn strips_short_predicate_prefix() {
        assert_eq!(normalize("likes: coffee"), "coffee");
    }

    #[test]
    fn dedup_against_removes_repeat_across_calls() {
        let mut seen = HashSet::new();
        let first = dedup_against(vec!["User: I like coffee".into()], &mut seen);
        assert_eq!(first.len(), 1);
        let second = dedup_against(vec!["I   like  coffee".into()], &mut seen);
        assert!(second.is_empty(), "should dedupe against first layer's normalized form");
    }

    #[test]
    fn distinct_lines_both_survive() {
        let mut seen = HashSet::new();
        let lines = dedup_against(vec!["likes coffee".into(), "lives in berlin".into()], &mut seen);
        assert_eq!(lines.len(), 2);
    }
}
