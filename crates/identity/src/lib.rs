//! Identity resolution: maps the grammatical subject of an extracted triple
//! to a stable anchor entity id. First-person subjects map to the speaker's
//! own anchor; second-person and other (third-person/plural) pronouns carry
//! no stable referent across turns and are dropped rather than guessed at.
//! Proper nouns pass through to a slugified (or previously-registered)
//! entity id.
//!
//! A resolver struct wrapping a config-seeded map, emitting a trace event
//! on every successful resolution.

use std::collections::HashMap;

use parking_lot::RwLock;
use sa_domain::trace::TraceEvent;

/// Who produced the turn a subject pronoun was extracted from. First-person
/// means the anchor for "I"/"me"/"my" is the speaker themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Person {
    First,
    /// Second-person and other (third-person singular/plural) pronouns:
    /// neither has a stable referent across turns, so both drop.
    NoStableReferent,
}

fn classify_person(token: &str) -> Option<Person> {
    let lower = token.trim().to_lowercase();
    const FIRST: &[&str] = &["i", "me", "my", "mine", "myself", "we", "us", "our", "ours"];
    const SECOND: &[&str] = &["you", "your", "yours", "yourself"];
    const OTHER: &[&str] = &[
        "he", "him", "his", "himself", "she", "her", "hers", "herself", "they", "them", "their",
        "theirs", "themself", "themselves", "it", "its",
    ];
    if FIRST.contains(&lower.as_str()) {
        Some(Person::First)
    } else if SECOND.contains(&lower.as_str()) || OTHER.contains(&lower.as_str()) {
        Some(Person::NoStableReferent)
    } else {
        None
    }
}

/// Slugify a proper noun into a stable entity key: lowercase, non-alnum
/// collapsed to a single underscore, trimmed of leading/trailing underscores.
fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_matches('_').to_string()
}

/// Resolves subject tokens to anchor entity ids scoped to one user's graph.
pub struct IdentityResolver {
    user_anchor: String,
    assistant_anchor: String,
    /// Proper nouns explicitly registered (e.g. "Sarah" -> "entity::sarah")
    /// so repeated mentions of the same third party collapse to one node.
    known_entities: RwLock<HashMap<String, String>>,
}

impl IdentityResolver {
    /// `user_id` seeds the anchor entity for first-person statements made
    /// by the user: `__USER__::<user_id>`.
    pub fn new(user_id: &str) -> Self {
        Self {
            user_anchor: format!("__USER__::{user_id}"),
            assistant_anchor: "__ASSISTANT__".to_string(),
            known_entities: RwLock::new(HashMap::new()),
        }
    }

    /// The user's anchor entity id.
    pub fn user_anchor(&self) -> &str {
        &self.user_anchor
    }

    /// Register an alias for a known third-party entity (e.g. a name found
    /// during extraction) so subsequent mentions resolve to the same id.
    pub fn register_entity(&self, name: &str, entity_id: &str) {
        self.known_entities
            .write()
            .insert(name.trim().to_lowercase(), entity_id.to_string());
    }

    /// Resolve a raw subject token (pronoun or proper noun) to an anchor
    /// entity id, given who spoke the turn it was extracted from. Returns
    /// `None` when the token is a second-person or other (third-person/
    /// plural) pronoun: neither carries a stable referent across turns, so
    /// the caller should drop the triple rather than guess one.
    pub fn resolve(&self, raw_subject: &str, speaker: Speaker) -> Option<String> {
        let resolved = match classify_person(raw_subject) {
            Some(Person::First) => Some(match speaker {
                Speaker::User => self.user_anchor.clone(),
                Speaker::Assistant => self.assistant_anchor.clone(),
            }),
            Some(Person::NoStableReferent) => None,
            None => {
                let key = raw_subject.trim().to_lowercase();
                Some(
                    self.known_entities
                        .read()
                        .get(&key)
                        .cloned()
                        .unwrap_or_else(|| format!("entity::{}", slugify(raw_subject))),
                )
            }
        };

        if let Some(resolved) = &resolved {
            TraceEvent::IdentityResolved {
                raw_peer_id: raw_subject.to_string(),
                canonical: resolved.clone(),
            }
            .emit();
        }

        resolved
    }
}
