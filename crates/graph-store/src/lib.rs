//! Knowledge-graph fact store.
//!
//! Persists triples as `Fact` rows in a JSON file under the configured
//! state path: a `parking_lot::RwLock<HashMap<...>>` loaded once at
//! startup and written back wholesale on `flush`. No embedded-database
//! dependency is introduced for this (see DESIGN.md).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sa_domain::error::{Error, Result};
use sa_domain::trace::TraceEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FactStatus {
    Active,
    Superseded,
    Conflicted,
    Retracted,
    /// Moved here by the decay job once a soft-signal fact's confidence
    /// drops below `DECAY_FLOOR`.
    Deprecated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactCategory {
    Identity,
    Personal,
    General,
    SoftSignal,
}

fn d_category() -> FactCategory {
    FactCategory::General
}

/// A single stored triple with its lifecycle metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub fact_id: Uuid,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub status: FactStatus,
    pub confidence: f64,
    #[serde(default = "d_category")]
    pub category: FactCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Turn ids this fact was derived or corroborated from, oldest first.
    #[serde(default)]
    pub source_turn_ids: Vec<Uuid>,
}

/// Input for [`GraphStore::merge`] — a candidate about to be written.
pub struct NewFactInput {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub confidence: f64,
    pub category: FactCategory,
    pub source_turn_id: Option<Uuid>,
}

pub struct GraphStore {
    facts_path: PathBuf,
    facts: RwLock<HashMap<Uuid, Fact>>,
}

impl GraphStore {
    /// Load or create the graph store at `state_path/graph/facts.json`.
    pub fn new(state_path: &Path) -> Result<Self> {
        let dir = state_path.join("graph");
        std::fs::create_dir_all(&dir).map_err(Error::Io)?;

        let facts_path = dir.join("facts.json");
        let facts: HashMap<Uuid, Fact> = if facts_path.exists() {
            let raw = std::fs::read_to_string(&facts_path).map_err(Error::Io)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::info!(facts = facts.len(), path = %facts_path.display(), "graph store loaded");

        Ok(Self {
            facts_path,
            facts: RwLock::new(facts),
        })
    }

    /// All ACTIVE facts for an exact `(subject, predicate)` key.
    pub fn active_facts_for(&self, subject: &str, predicate: &str) -> Vec<Fact> {
        self.facts
            .read()
            .values()
            .filter(|f| {
                f.status == FactStatus::Active && f.subject == subject && f.predicate == predicate
            })
            .cloned()
            .collect()
    }

    /// All ACTIVE facts for a subject, across predicates — used by the
    /// context builder's profile layer.
    pub fn active_facts_for_subject(&self, subject: &str) -> Vec<Fact> {
        let mut facts: Vec<Fact> = self
            .facts
            .read()
            .values()
            .filter(|f| f.status == FactStatus::Active && f.subject == subject)
            .cloned()
            .collect();
        facts.sort_by_key(|f| f.updated_at);
        facts
    }

    pub fn get(&self, fact_id: Uuid) -> Option<Fact> {
        self.facts.read().get(&fact_id).cloned()
    }

    /// MERGE a candidate on its composite key `(subject, predicate, object)`
    /// (case-insensitive on `object`). Idempotent: a second merge of the
    /// same triple touches the existing ACTIVE fact instead of duplicating
    /// it. Returns `(fact_id, was_new)`.
    ///
    /// Callers are expected to have already run the lifecycle engine and
    /// superseded any conflicting facts via [`GraphStore::supersede`]
    /// before calling this for a fresh write.
    pub fn merge(&self, input: NewFactInput) -> (Uuid, bool) {
        let mut facts = self.facts.write();
        if let Some(existing) = facts.values_mut().find(|f| {
            f.status == FactStatus::Active
                && f.subject == input.subject
                && f.predicate == input.predicate
                && f.object.eq_ignore_ascii_case(&input.object)
        }) {
            existing.updated_at = Utc::now();
            existing.confidence = existing.confidence.max(input.confidence);
            if let Some(turn_id) = input.source_turn_id {
                existing.source_turn_ids.push(turn_id);
            }
            TraceEvent::GraphMerge {
                subject: input.subject,
                predicate: input.predicate,
                object: input.object,
                fact_id: existing.fact_id.to_string(),
                was_new: false,
            }
            .emit();
            return (existing.fact_id, false);
        }

        let now = Utc::now();
        let fact_id = Uuid::new_v4();
        let fact = Fact {
            fact_id,
            subject: input.subject.clone(),
            predicate: input.predicate.clone(),
            object: input.object.clone(),
            status: FactStatus::Active,
            confidence: input.confidence,
            category: input.category,
            created_at: now,
            updated_at: now,
            source_turn_ids: input.source_turn_id.into_iter().collect(),
        };
        facts.insert(fact_id, fact);

        TraceEvent::GraphMerge {
            subject: input.subject,
            predicate: input.predicate,
            object: input.object,
            fact_id: fact_id.to_string(),
            was_new: true,
        }
        .emit();

        (fact_id, true)
    }

    /// Move the listed facts to SUPERSEDED.
    pub fn supersede(&self, fact_ids: &[Uuid]) {
        let mut facts = self.facts.write();
        let now = Utc::now();
        for id in fact_ids {
            if let Some(fact) = facts.get_mut(id) {
                fact.status = FactStatus::Superseded;
                fact.updated_at = now;
            }
        }
    }

    /// Supersede every ACTIVE fact for a subject (soft "forget_entity").
    /// Returns the number of facts moved.
    pub fn supersede_subject(&self, subject: &str) -> usize {
        let mut facts = self.facts.write();
        let now = Utc::now();
        let mut moved = 0;
        for fact in facts.values_mut() {
            if fact.status == FactStatus::Active && fact.subject == subject {
                fact.status = FactStatus::Superseded;
                fact.updated_at = now;
                moved += 1;
            }
        }
        moved
    }

    /// Irrevocably remove every fact for a subject, regardless of status
    /// ("forget_all" / `hard_delete=true`). Returns the number removed.
    pub fn purge_subject(&self, subject: &str) -> usize {
        let mut facts = self.facts.write();
        let before = facts.len();
        facts.retain(|_, f| f.subject != subject);
        before - facts.len()
    }

    /// Decay every ACTIVE `SoftSignal` fact's confidence by `rate_per_day *
    /// days_elapsed` since its last update; facts that fall below `floor`
    /// move to DEPRECATED. Returns the number of facts deprecated.
    pub fn decay_soft_signals(&self, rate_per_day: f64, floor: f64, now: DateTime<Utc>) -> usize {
        let mut facts = self.facts.write();
        let mut deprecated = 0;
        for fact in facts.values_mut() {
            if fact.status != FactStatus::Active || fact.category != FactCategory::SoftSignal {
                continue;
            }
            let days_elapsed = (now - fact.updated_at).num_seconds() as f64 / 86_400.0;
            if days_elapsed <= 0.0 {
                continue;
            }
            fact.confidence = (fact.confidence - rate_per_day * days_elapsed).max(0.0);
            fact.updated_at = now;
            if fact.confidence < floor {
                fact.status = FactStatus::Deprecated;
                deprecated += 1;
            }
        }
        deprecated
    }

    pub fn flush(&self) -> Result<()> {
        let facts = self.facts.read();
        let json = serde_json::to_string_pretty(&*facts)
            .map_err(|e| Error::Other(format!("serializing facts: {e}")))?;
        std::fs::write(&self.facts_path, json).map_err(Error::Io)?;
        Ok(())
    }
}
