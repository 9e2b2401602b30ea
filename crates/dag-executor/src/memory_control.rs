use sa_domain::error::{Error, Result};
use sa_graph::GraphStore;
use serde_json::json;

/// Execute a privileged `memory_control` task's params against the graph.
///
/// - `{"op": "forget_entity", "subject": "..."}` — soft-archive (supersede)
///   every active fact for the subject.
/// - `{"op": "forget_all", "subject": "...", "hard_delete": true|false}` —
///   detach the subject's subgraph; `hard_delete=true` removes the rows
///   entirely rather than superseding them.
pub fn execute(graph: &GraphStore, params: &serde_json::Value) -> Result<serde_json::Value> {
    let op = params
        .get("op")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::PermanentInput("memory_control task missing 'op'".to_string()))?;
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::PermanentInput("memory_control task missing 'subject'".to_string()))?;
    let hard_delete = params
        .get("hard_delete")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    match op {
        "forget_entity" => {
            let count = graph.supersede_subject(subject);
            Ok(json!({"op": op, "subject": subject, "affected": count}))
        }
        "forget_all" => {
            let count = if hard_delete {
                graph.purge_subject(subject)
            } else {
                graph.supersede_subject(subject)
            };
            Ok(json!({"op": op, "subject": subject, "hard_delete": hard_delete, "affected": count}))
        }
        other => Err(Error::PermanentInput(format!(
            "unknown memory_control op '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_graph::{FactCategory, NewFactInput};

    fn graph_with_fact(subject: &str) -> (GraphStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let graph = GraphStore::new(dir.path()).unwrap();
        graph.merge(NewFactInput {
            subject: subject.to_string(),
            predicate: "likes".to_string(),
            object: "coffee".to_string(),
            confidence: 0.9,
            category: FactCategory::General,
            source_turn_id: None,
        });
        (graph, dir)
    }

    #[test]
    fn forget_entity_supersedes_without_deleting() {
        let (graph, _dir) = graph_with_fact("__USER__::u1");
        let out = execute(
            &graph,
            &json!({"op": "forget_entity", "subject": "__USER__::u1"}),
        )
        .unwrap();
        assert_eq!(out["affected"], 1);
        assert!(graph.active_facts_for_subject("__USER__::u1").is_empty());
    }

    #[test]
    fn forget_all_hard_delete_removes_rows() {
        let (graph, _dir) = graph_with_fact("__USER__::u1");
        execute(
            &graph,
            &json!({"op": "forget_all", "subject": "__USER__::u1", "hard_delete": true}),
        )
        .unwrap();
        let facts = graph.active_facts_for_subject("__USER__::u1");
        assert!(facts.is_empty());
    }

    #[test]
    fn unknown_op_errors() {
        let (graph, _dir) = graph_with_fact("__USER__::u1");
        assert!(execute(&graph, &json!({"op": "nope", "subject": "x"})).is_err());
    }

    #[test]
    fn missing_subject_errors() {
        let (graph, _dir) = graph_with_fact("__USER__::u1");
        assert!(execute(&graph, &json!({"op": "forget_entity"})).is_err());
    }
}
