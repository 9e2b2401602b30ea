use sa_graph::GraphStore;

const HAS_TOPIC: &str = "HAS_TOPIC";

/// Subject key under which a session's active-topic edge is stored.
pub fn topic_subject(session_id: &str) -> String {
    format!("__SESSION__::{session_id}")
}

/// Query the persisted `HAS_TOPIC` edge for a session and restore its
/// active topic. Called once per process on a fresh session (topic
/// "Genel", not yet hydrated) before the first plan call.
pub fn hydrate_active_topic(graph: &GraphStore, session_id: &str) -> Option<String> {
    let mut facts = graph.active_facts_for(&topic_subject(session_id), HAS_TOPIC);
    facts.sort_by_key(|f| f.updated_at);
    facts.pop().map(|f| f.object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_graph::{FactCategory, NewFactInput};

    #[test]
    fn hydrate_returns_none_when_no_topic_edge_exists() {
        let dir = tempfile::tempdir().unwrap();
        let graph = GraphStore::new(dir.path()).unwrap();
        assert_eq!(hydrate_active_topic(&graph, "s1"), None);
    }

    #[test]
    fn hydrate_restores_most_recently_updated_topic() {
        let dir = tempfile::tempdir().unwrap();
        let graph = GraphStore::new(dir.path()).unwrap();
        graph.merge(NewFactInput {
            subject: topic_subject("s1"),
            predicate: HAS_TOPIC.to_string(),
            object: "fitness".to_string(),
            confidence: 1.0,
            category: FactCategory::General,
            source_turn_id: None,
        });
        assert_eq!(
            hydrate_active_topic(&graph, "s1"),
            Some("fitness".to_string())
        );
    }
}
