//! Predicate catalog: normalizes raw predicate strings from the triple
//! extractor to a canonical predicate name, its cardinality rule (how many
//! ACTIVE facts may coexist per subject), and a bridge category used by the
//! context builder to weight retrieval by topic.
//!
//! A YAML-backed catalog with an alias index folding variant spellings
//! onto one canonical key.

use std::collections::HashMap;
use std::path::Path;

use sa_domain::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How many ACTIVE facts may exist for a given `(subject, predicate)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// At most one ACTIVE fact; a new one supersedes the old.
    Exclusive,
    /// Multiple ACTIVE facts may coexist, bounded by a configured cap.
    Additive,
    /// Multiple ACTIVE facts may coexist; near-duplicate occurrences within
    /// a coalescing window are treated as the same event.
    Temporal,
}

/// How long a fact extracted under this predicate is worth keeping, before
/// the write gate's utility/stability/confidence scoring ever runs.
/// `Ephemeral` and `Session` bypass scoring and are forced to those buckets
/// directly; only `LongTerm` candidates are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    Ephemeral,
    Session,
    Situational,
    LongTerm,
    Prospective,
    Static,
}

impl Default for Durability {
    fn default() -> Self {
        Durability::LongTerm
    }
}

fn default_enabled() -> bool {
    true
}

fn default_durability() -> Durability {
    Durability::LongTerm
}

/// Bridge categories that the graph treats as about the user themselves
/// (identity/relationships/preferences) rather than general world facts.
/// Everything else falls back to `"general"`.
const PERSONAL_CATEGORIES: &[&str] = &[
    "identity",
    "preference",
    "relationship",
    "ownership",
    "goals",
    "prospective",
    "procedural",
    "emotional",
    "location",
];

#[derive(Debug, Clone, Deserialize)]
struct RawEntry {
    name: String,
    cardinality: Cardinality,
    bridge_category: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default = "default_durability")]
    durability: Durability,
}

/// A single canonical predicate's catalog metadata.
#[derive(Debug, Clone)]
pub struct PredicateEntry {
    pub name: String,
    pub cardinality: Cardinality,
    pub bridge_category: String,
    /// Whether facts under this predicate are written at all; a disabled
    /// predicate is dropped by the sanitizer regardless of confidence.
    pub enabled: bool,
    pub durability: Durability,
}

impl PredicateEntry {
    /// The coarse identity/personal/general bucket the graph categorizes
    /// this predicate's facts under, derived from `bridge_category`.
    /// `"identity"` is kept distinct from the rest of the personal set
    /// since the graph store tracks it as its own fact category.
    pub fn graph_category(&self) -> &'static str {
        if self.bridge_category == "identity" {
            "identity"
        } else if PERSONAL_CATEGORIES.contains(&self.bridge_category.as_str()) {
            "personal"
        } else {
            "general"
        }
    }
}

/// The default catalog shipped with the crate, covering common personal-fact
/// predicates. Callers with a richer domain vocabulary load their own YAML
/// via [`PredicateCatalog::load`].
const DEFAULT_CATALOG_YAML: &str = include_str!("../predicates.yaml");

pub struct PredicateCatalog {
    entries: HashMap<String, PredicateEntry>,
    alias_index: HashMap<String, String>,
    strict: bool,
}

impl PredicateCatalog {
    /// Parse a catalog from a YAML string.
    pub fn from_yaml(yaml: &str, strict: bool) -> Result<Self> {
        let raw: Vec<RawEntry> = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("invalid predicate catalog: {e}")))?;

        let mut entries = HashMap::new();
        let mut alias_index = HashMap::new();
        for r in raw {
            let canonical = r.name.to_lowercase();
            for alias in &r.aliases {
                alias_index.insert(alias.to_lowercase(), canonical.clone());
            }
            alias_index.insert(canonical.clone(), canonical.clone());
            entries.insert(
                canonical.clone(),
                PredicateEntry {
                    name: canonical,
                    cardinality: r.cardinality,
                    bridge_category: r.bridge_category,
                    enabled: r.enabled,
                    durability: r.durability,
                },
            );
        }

        Ok(Self {
            entries,
            alias_index,
            strict,
        })
    }

    /// Load a catalog from a YAML file on disk.
    pub fn load(path: &Path, strict: bool) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text, strict)
    }

    /// The catalog bundled with this crate.
    pub fn default_catalog(strict: bool) -> Self {
        Self::from_yaml(DEFAULT_CATALOG_YAML, strict)
            .expect("bundled predicates.yaml must parse")
    }

    /// Normalize a raw predicate string (case-insensitive, alias-folded) to
    /// its canonical catalog entry.
    ///
    /// In non-strict mode, an unrecognized predicate is still accepted: it
    /// is returned as its own canonical name under the `"unknown"` bridge
    /// category rather than rejected, so the write gate can still persist a
    /// fact whose relation the catalog hasn't been taught yet.
    pub fn normalize(&self, raw: &str) -> Result<PredicateEntry> {
        let key = raw.trim().to_lowercase().replace([' ', '-'], "_");
        if let Some(canonical) = self.alias_index.get(&key) {
            if let Some(entry) = self.entries.get(canonical) {
                return Ok(entry.clone());
            }
        }
        if self.strict {
            return Err(Error::PermanentInput(format!(
                "predicate \"{raw}\" not found in catalog"
            )));
        }
        Ok(PredicateEntry {
            name: key,
            cardinality: Cardinality::Additive,
            bridge_category: "unknown".to_string(),
            enabled: true,
            durability: Durability::LongTerm,
        })
    }

    /// Look up a raw predicate string's canonical entry without the
    /// non-strict catalog's unknown-predicate fallback: `None` means the
    /// predicate isn't in the catalog at all, for callers (like the
    /// extractor's sanitizer) that must fail closed on unknown predicates
    /// regardless of how this catalog instance was configured.
    pub fn lookup(&self, raw: &str) -> Option<PredicateEntry> {
        let key = raw.trim().to_lowercase().replace([' ', '-'], "_");
        let canonical = self.alias_index.get(&key)?;
        self.entries.get(canonical).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_parses() {
        let cat = PredicateCatalog::default_catalog(false);
        assert!(cat.len() >= 10);
    }

    #[test]
    fn resolves_canonical_name() {
        let cat = PredicateCatalog::default_catalog(false);
        let entry = cat.normalize("lives_in").unwrap();
        assert_eq!(entry.cardinality, Cardinality::Exclusive);
        assert_eq!(entry.bridge_category, "location");
    }

    #[test]
    fn resolves_alias_case_insensitive() {
        let cat = PredicateCatalog::default_catalog(false);
        let entry = cat.normalize("Resides In").unwrap();
        assert_eq!(entry.name, "lives_in");
    }

    #[test]
    fn unknown_predicate_non_strict_falls_back() {
        let cat = PredicateCatalog::default_catalog(false);
        let entry = cat.normalize("owns_a_spaceship").unwrap();
        assert_eq!(entry.bridge_category, "unknown");
        assert_eq!(entry.cardinality, Cardinality::Additive);
    }

    #[test]
    fn unknown_predicate_strict_errors() {
        let cat = PredicateCatalog::default_catalog(true);
        assert!(cat.normalize("owns_a_spaceship").is_err());
    }

    #[test]
    fn additive_and_temporal_predicates_classified() {
        let cat = PredicateCatalog::default_catalog(false);
        assert_eq!(cat.normalize("likes").unwrap().cardinality, Cardinality::Additive);
        assert_eq!(cat.normalize("visited").unwrap().cardinality, Cardinality::Temporal);
    }

    #[test]
    fn bundled_entries_default_to_enabled_long_term() {
        let cat = PredicateCatalog::default_catalog(false);
        let entry = cat.normalize("lives_in").unwrap();
        assert!(entry.enabled);
        assert_eq!(entry.durability, Durability::LongTerm);
    }

    #[test]
    fn graph_category_buckets_identity_personal_and_general() {
        let cat = PredicateCatalog::default_catalog(false);
        assert_eq!(cat.normalize("lives_in").unwrap().graph_category(), "personal");
        assert_eq!(cat.normalize("likes").unwrap().graph_category(), "personal");
        assert_eq!(cat.normalize("has_allergy").unwrap().graph_category(), "general");
        assert_eq!(cat.normalize("has_birthday").unwrap().graph_category(), "identity");
    }

    #[test]
    fn lookup_fails_closed_on_unknown_predicate_even_non_strict() {
        let cat = PredicateCatalog::default_catalog(false);
        assert!(cat.lookup("owns_a_spaceship").is_none());
        assert!(cat.lookup("lives_in").is_some());
    }

    #[test]
    fn disabled_and_short_durability_parse_from_yaml() {
        let yaml = r#"
- name: test_ephemeral
  cardinality: additive
  bridge_category: activity
  durability: ephemeral
- name: test_disabled
  cardinality: additive
  bridge_category: activity
  enabled: false
"#;
        let cat = PredicateCatalog::from_yaml(yaml, false).unwrap();
        let eph = cat.normalize("test_ephemeral").unwrap();
        assert_eq!(eph.durability, Durability::Ephemeral);
        let disabled = cat.normalize("test_disabled").unwrap();
        assert!(!disabled.enabled);
    }
}
