//! Turns raw model-extracted triples into facts worth writing to the graph.
//!
//! A chain of drop filters (malformed fields, disguised memory-management
//! commands, low confidence, unresolvable pronoun subjects, predicates the
//! catalog doesn't know or has disabled, durability too short-lived for the
//! graph) followed by two batch-wide passes: a self-reference heuristic that
//! remaps a named subject to the user's own anchor once the batch (or the
//! caller's known-names list) has taught us that name is the user, and a
//! confidence-gated demotion of personal facts to a `soft_signal` category.

use std::collections::HashSet;

use sa_catalog::PredicateCatalog;
use sa_identity::{IdentityResolver, Speaker};

use crate::types::{RawTriple, SanitizedTriple};

const MAX_FIELD_CHARS: usize = 500;
const MIN_CONFIDENCE: f64 = 0.4;
const SOFT_SIGNAL_CONFIDENCE: f64 = 0.7;

const INTENT_PREDICATE_MARKERS: &[&str] = &["want", "plan"];
const MEMORY_COMMAND_MARKERS: &[&str] = &[
    "forget", "delete", "erase", "wipe", "clear", "reset", "memory", "history",
];

const PLACEHOLDER_OBJECTS: &[&str] = &[
    "unknown",
    "no info",
    "not provided",
    "undefined",
    "not defined",
    "unclear",
    "none",
    "null",
    "no idea",
];

const FIRST_PERSON_SUBJECTS: &[&str] = &["i", "me", "my", "mine", "myself", "we", "us", "our", "ours"];

const NAME_PREDICATE_MARKERS: &[&str] = &["name"];

/// Strip non-printable/control characters a model occasionally emits in
/// malformed JSON string escapes.
fn strip_control_chars(s: &str) -> String {
    s.chars().filter(|c| !c.is_control() || *c == ' ').collect()
}

fn clean_field(raw: &str) -> String {
    let cleaned = strip_control_chars(raw.trim());
    if cleaned.len() > MAX_FIELD_CHARS {
        cleaned.chars().take(MAX_FIELD_CHARS).collect()
    } else {
        cleaned
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

/// A triple that's survived field cleaning and early drops, not yet resolved
/// against identity/catalog.
struct Cleaned {
    subject: String,
    predicate: String,
    object: String,
    confidence: f64,
}

fn clean_and_drop_early(raw: &RawTriple) -> Option<Cleaned> {
    let subject = clean_field(&raw.subject);
    let predicate = clean_field(&raw.predicate).to_lowercase().replace(' ', "_");
    let object = clean_field(&raw.object);

    if subject.is_empty() || predicate.is_empty() || object.is_empty() {
        return None;
    }
    if subject.eq_ignore_ascii_case(&object) {
        return None;
    }

    // Command-in-disguise: a stated intent whose object is really an
    // instruction to the memory system rather than a fact about the world.
    if contains_any(&predicate, INTENT_PREDICATE_MARKERS) && contains_any(&object, MEMORY_COMMAND_MARKERS) {
        return None;
    }

    if raw.confidence.clamp(0.0, 1.0) < MIN_CONFIDENCE {
        return None;
    }

    Some(Cleaned {
        subject,
        predicate,
        object,
        confidence: raw.confidence.clamp(0.0, 1.0),
    })
}

/// Discover names the batch itself reveals belong to the user: a
/// first-person subject paired with a name-like predicate teaches us its
/// object is the user's own name, so a later triple naming that same person
/// as its subject can be folded back onto the user's anchor.
fn discover_batch_user_names(cleaned: &[Cleaned]) -> HashSet<String> {
    let mut names = HashSet::new();
    for c in cleaned {
        let is_first_person = FIRST_PERSON_SUBJECTS.contains(&c.subject.to_lowercase().as_str());
        let is_name_predicate = contains_any(&c.predicate, NAME_PREDICATE_MARKERS);
        if is_first_person && is_name_predicate {
            names.insert(c.object.to_lowercase());
        }
    }
    names
}

fn matches_known_name(candidate: &str, known: &[String]) -> bool {
    let candidate = candidate.to_lowercase();
    known.iter().any(|name| {
        let name = name.to_lowercase();
        candidate == name || candidate.split_whitespace().next() == name.split_whitespace().next()
    })
}

/// Sanitizes and enriches a batch of candidate triples from one extraction
/// call: field cleanup, identity resolution, predicate canonicalization,
/// durability/placeholder filtering, and soft-signal demotion.
pub struct TripleSanitizer<'a> {
    pub catalog: &'a PredicateCatalog,
    pub identity: &'a IdentityResolver,
}

impl<'a> TripleSanitizer<'a> {
    /// `speaker` is who produced the turn the triples were extracted from.
    /// `known_names` are names already on file for this user (e.g. from a
    /// prior turn) that a bare proper-noun subject should fold onto the
    /// user's anchor even without this batch rediscovering them.
    pub fn sanitize_batch(
        &self,
        raw: &[RawTriple],
        speaker: Speaker,
        known_names: &[String],
    ) -> Vec<SanitizedTriple> {
        let cleaned: Vec<Cleaned> = raw.iter().filter_map(clean_and_drop_early).collect();
        let batch_user_names = discover_batch_user_names(&cleaned);

        cleaned
            .into_iter()
            .filter_map(|c| self.resolve(c, speaker, known_names, &batch_user_names))
            .collect()
    }

    fn resolve(
        &self,
        c: Cleaned,
        speaker: Speaker,
        known_names: &[String],
        batch_user_names: &HashSet<String>,
    ) -> Option<SanitizedTriple> {
        let mut subject = self.identity.resolve(&c.subject, speaker)?;

        if !subject.starts_with("__USER__") {
            let as_name = subject.strip_prefix("entity::").unwrap_or(&subject).replace('_', " ");
            let self_ref = matches_known_name(&as_name, known_names)
                || batch_user_names.contains(&as_name.to_lowercase());
            if self_ref {
                subject = self.identity.user_anchor().to_string();
            }
        }

        let entry = self.catalog.lookup(&c.predicate)?;
        if !entry.enabled {
            return None;
        }
        if matches!(
            entry.durability,
            sa_catalog::Durability::Ephemeral | sa_catalog::Durability::Session
        ) {
            return None;
        }

        let mut category = entry.graph_category().to_string();
        let is_personal_like = category == "personal" || category == "identity";
        if is_personal_like && contains_any(&c.object, PLACEHOLDER_OBJECTS) {
            return None;
        }
        if is_personal_like && c.confidence < SOFT_SIGNAL_CONFIDENCE {
            category = "soft_signal".to_string();
        }

        Some(SanitizedTriple {
            subject,
            predicate: entry.name,
            object: c.object,
            category,
            confidence: c.confidence,
            durability: entry.durability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(subject: &str, predicate: &str, object: &str, confidence: f64) -> RawTriple {
        RawTriple {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: object.to_string(),
            confidence,
        }
    }

    fn sanitizer<'a>(catalog: &'a PredicateCatalog, identity: &'a IdentityResolver) -> TripleSanitizer<'a> {
        TripleSanitizer { catalog, identity }
    }

    #[test]
    fn valid_triple_passes_through_normalized() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("I", "Lives In", "Berlin", 0.9)], Speaker::User, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].subject, "__USER__::u1");
        assert_eq!(out[0].predicate, "lives_in");
        assert_eq!(out[0].object, "Berlin");
        assert_eq!(out[0].category, "personal");
    }

    #[test]
    fn empty_fields_rejected() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        assert!(s.sanitize_batch(&[raw("", "lives_in", "Berlin", 0.9)], Speaker::User, &[]).is_empty());
        assert!(s.sanitize_batch(&[raw("I", "", "Berlin", 0.9)], Speaker::User, &[]).is_empty());
        assert!(s.sanitize_batch(&[raw("I", "lives_in", "", 0.9)], Speaker::User, &[]).is_empty());
    }

    #[test]
    fn subject_equal_to_object_rejected() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("Berlin", "likes", "Berlin", 0.9)], Speaker::User, &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn low_confidence_dropped() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("I", "likes", "coffee", 0.39)], Speaker::User, &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn command_in_disguise_dropped() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(
            &[raw("I", "wants", "to forget my memory history", 0.9)],
            Speaker::User,
            &[],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn second_person_subject_dropped() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("you", "likes", "coffee", 0.9)], Speaker::User, &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn other_pronoun_subject_dropped() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("they", "likes", "coffee", 0.9)], Speaker::User, &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_predicate_dropped() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(
            &[raw("I", "owns_a_spaceship", "millennium falcon", 0.9)],
            Speaker::User,
            &[],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn disabled_predicate_dropped() {
        let yaml = "- name: gossip\n  cardinality: additive\n  bridge_category: activity\n  enabled: false\n";
        let catalog = PredicateCatalog::from_yaml(yaml, false).unwrap();
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("I", "gossip", "the neighbors", 0.9)], Speaker::User, &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn short_durability_predicate_dropped() {
        let yaml = "- name: currently_doing\n  cardinality: additive\n  bridge_category: activity\n  durability: ephemeral\n";
        let catalog = PredicateCatalog::from_yaml(yaml, false).unwrap();
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("I", "currently_doing", "cooking", 0.9)], Speaker::User, &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn placeholder_object_dropped_for_personal_category() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("I", "lives_in", "unknown", 0.9)], Speaker::User, &[]);
        assert!(out.is_empty());
    }

    #[test]
    fn low_confidence_identity_fact_demoted_to_soft_signal() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("I", "has_birthday", "March 3", 0.5)], Speaker::User, &[]);
        assert_eq!(out[0].category, "soft_signal");
    }

    #[test]
    fn low_confidence_personal_fact_demoted_to_soft_signal() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("I", "likes", "jazz", 0.5)], Speaker::User, &[]);
        assert_eq!(out[0].category, "soft_signal");
    }

    #[test]
    fn known_name_subject_folds_onto_user_anchor() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let known = vec!["Alice".to_string()];
        let out = s.sanitize_batch(&[raw("Alice", "lives_in", "Berlin", 0.9)], Speaker::User, &known);
        assert_eq!(out[0].subject, "__USER__::u1");
    }

    #[test]
    fn batch_discovered_name_folds_onto_user_anchor() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let batch = vec![
            raw("I", "has_name", "Alice", 0.9),
            raw("Alice", "lives_in", "Berlin", 0.9),
        ];
        let out = s.sanitize_batch(&batch, Speaker::User, &[]);
        let berlin_fact = out.iter().find(|t| t.object == "Berlin").unwrap();
        assert_eq!(berlin_fact.subject, "__USER__::u1");
    }

    #[test]
    fn confidence_clamped() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("I", "likes", "coffee", 1.8)], Speaker::User, &[]);
        assert_eq!(out[0].confidence, 1.0);
    }

    #[test]
    fn control_characters_stripped_from_predicate() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let out = s.sanitize_batch(&[raw("I", "lives_in\u{0007}", "Berlin\n", 0.9)], Speaker::User, &[]);
        assert_eq!(out[0].predicate, "lives_in");
    }

    #[test]
    fn overlong_field_truncated() {
        let catalog = PredicateCatalog::default_catalog(false);
        let identity = IdentityResolver::new("u1");
        let s = sanitizer(&catalog, &identity);
        let long = "x".repeat(1000);
        let out = s.sanitize_batch(&[raw("I", "likes", &long, 0.9)], Speaker::User, &[]);
        assert_eq!(out[0].object.len(), MAX_FIELD_CHARS);
    }
}
