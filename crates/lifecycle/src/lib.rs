//! Lifecycle engine: resolves a new candidate fact against the ACTIVE facts
//! already on file for the same `(subject, predicate)` key, according to
//! the predicate's cardinality rule.
//!
//! A pure function evaluating a transition against pre-fetched state and
//! returning a typed decision. Callers hold a single-writer-per-key lock
//! (acquired on `(subject, predicate)`) before calling here.

use chrono::{DateTime, Utc};
use sa_catalog::Cardinality;
use sa_domain::trace::TraceEvent;
use uuid::Uuid;

/// A previously-written ACTIVE fact for the same `(subject, predicate)` key.
#[derive(Debug, Clone)]
pub struct ExistingFact {
    pub fact_id: Uuid,
    pub object: String,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

/// A new candidate fact awaiting a lifecycle decision.
#[derive(Debug, Clone)]
pub struct NewFact {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub confidence: f64,
}

/// The resolution for a new candidate against existing ACTIVE facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    /// The candidate duplicates an existing ACTIVE fact; no write needed
    /// beyond touching the existing fact's last-seen timestamp.
    NoOp { existing_fact_id: Uuid },
    /// The candidate is novel and may be written alongside existing facts.
    Coexist,
    /// The candidate replaces the listed facts, which move to SUPERSEDED.
    Supersede { superseded_fact_ids: Vec<Uuid> },
    /// The candidate contradicts an existing fact without clearly
    /// outranking it (e.g. lower confidence than what's on file); surfaced
    /// for confirmation rather than silently overwritten.
    Conflict { conflicting_fact_ids: Vec<Uuid> },
}

pub struct LifecycleEngine {
    additive_cap: usize,
    temporal_coalesce: chrono::Duration,
    conflict_threshold: f64,
}

impl LifecycleEngine {
    pub fn new(config: &sa_domain::config::LifecycleEngineConfig) -> Self {
        Self {
            additive_cap: config.additive_cap,
            temporal_coalesce: chrono::Duration::seconds(config.temporal_coalesce_secs as i64),
            conflict_threshold: config.conflict_threshold,
        }
    }

    /// Resolve a new candidate against the subject/predicate's existing
    /// ACTIVE facts. `existing` must contain every currently-ACTIVE fact for
    /// this exact `(subject, predicate)` key.
    pub fn resolve(
        &self,
        cardinality: Cardinality,
        candidate: &NewFact,
        existing: &[ExistingFact],
        now: DateTime<Utc>,
    ) -> LifecycleAction {
        let action = match cardinality {
            Cardinality::Exclusive => self.resolve_exclusive(candidate, existing),
            Cardinality::Additive => self.resolve_additive(candidate, existing),
            Cardinality::Temporal => self.resolve_temporal(candidate, existing, now),
        };

        match &action {
            LifecycleAction::Supersede { superseded_fact_ids } => {
                for superseded in superseded_fact_ids {
                    TraceEvent::LifecycleSupersede {
                        subject: candidate.subject.clone(),
                        predicate: candidate.predicate.clone(),
                        cardinality: format!("{cardinality:?}").to_uppercase(),
                        superseded_fact_id: superseded.to_string(),
                        new_fact_id: String::new(),
                    }
                    .emit();
                }
            }
            LifecycleAction::Coexist => {
                TraceEvent::LifecycleCoexist {
                    subject: candidate.subject.clone(),
                    predicate: candidate.predicate.clone(),
                    fact_id: String::new(),
                }
                .emit();
            }
            LifecycleAction::Conflict { conflicting_fact_ids } => {
                for conflicting in conflicting_fact_ids {
                    TraceEvent::LifecycleConflict {
                        subject: candidate.subject.clone(),
                        predicate: candidate.predicate.clone(),
                        fact_id: String::new(),
                        conflicting_fact_id: conflicting.to_string(),
                    }
                    .emit();
                }
            }
            LifecycleAction::NoOp { .. } => {}
        }

        action
    }

    fn find_same_object<'a>(candidate: &NewFact, existing: &'a [ExistingFact]) -> Option<&'a ExistingFact> {
        existing
            .iter()
            .find(|e| e.object.eq_ignore_ascii_case(&candidate.object))
    }

    fn resolve_exclusive(&self, candidate: &NewFact, existing: &[ExistingFact]) -> LifecycleAction {
        if existing.is_empty() {
            return LifecycleAction::Coexist;
        }
        if let Some(same) = Self::find_same_object(candidate, existing) {
            return LifecycleAction::NoOp {
                existing_fact_id: same.fact_id,
            };
        }
        if existing.len() > 1 {
            // Invariant violation safety net: should never happen if the
            // store enforces EXCLUSIVE cardinality ≤ 1 ACTIVE, but surface
            // it as a conflict rather than guessing which one to keep.
            return LifecycleAction::Conflict {
                conflicting_fact_ids: existing.iter().map(|e| e.fact_id).collect(),
            };
        }
        let current = &existing[0];
        if current.confidence >= self.conflict_threshold && candidate.confidence >= self.conflict_threshold {
            LifecycleAction::Conflict {
                conflicting_fact_ids: vec![current.fact_id],
            }
        } else {
            LifecycleAction::Supersede {
                superseded_fact_ids: vec![current.fact_id],
            }
        }
    }

    fn resolve_additive(&self, candidate: &NewFact, existing: &[ExistingFact]) -> LifecycleAction {
        if let Some(same) = Self::find_same_object(candidate, existing) {
            return LifecycleAction::NoOp {
                existing_fact_id: same.fact_id,
            };
        }
        if existing.len() >= self.additive_cap {
            let oldest = existing
                .iter()
                .min_by_key(|e| e.created_at)
                .expect("existing is non-empty when len >= cap > 0");
            return LifecycleAction::Supersede {
                superseded_fact_ids: vec![oldest.fact_id],
            };
        }
        LifecycleAction::Coexist
    }

    fn resolve_temporal(
        &self,
        candidate: &NewFact,
        existing: &[ExistingFact],
        now: DateTime<Utc>,
    ) -> LifecycleAction {
        let recent_same = existing.iter().find(|e| {
            e.object.eq_ignore_ascii_case(&candidate.object)
                && now.signed_duration_since(e.created_at) <= self.temporal_coalesce
        });
        match recent_same {
            Some(e) => LifecycleAction::NoOp {
                existing_fact_id: e.fact_id,
            },
            None => LifecycleAction::Coexist,
        }
    }
}
