//! Background fact persistence: runs a turn's text through the triple
//! extractor, the memory write gate, and the lifecycle engine, then writes
//! whatever survives to the graph. Called after a chat reply is sent, so a
//! slow extraction model never adds to response latency.

use sa_catalog::Durability;
use sa_extractor::SanitizedTriple;
use sa_graph::{FactCategory, NewFactInput};
use sa_identity::{IdentityResolver, Speaker};
use sa_lifecycle::{ExistingFact, LifecycleAction, NewFact};
use sa_memory_gate::{Bucket, Candidate};
use tracing::{debug, info, warn};

use crate::state::AppState;

fn category_for(raw: &str) -> FactCategory {
    match raw {
        "identity" => FactCategory::Identity,
        "personal" => FactCategory::Personal,
        "soft_signal" => FactCategory::SoftSignal,
        _ => FactCategory::General,
    }
}

/// How many times this exact fact has already been corroborated, judged by
/// the turn history already folded into the existing ACTIVE fact (if any).
fn recurrence_for(state: &AppState, subject: &str, predicate: &str, object: &str) -> u32 {
    state
        .graph
        .active_facts_for(subject, predicate)
        .iter()
        .find(|f| f.object.eq_ignore_ascii_case(object))
        .map(|f| f.source_turn_ids.len() as u32)
        .unwrap_or(0)
}

fn candidate_for(triple: &SanitizedTriple) -> Candidate {
    Candidate {
        subject: triple.subject.clone(),
        predicate: triple.predicate.clone(),
        object: triple.object.clone(),
        // No separate utility/stability scoring model is wired in this
        // minimal binding; extraction confidence stands in for both.
        utility: triple.confidence,
        stability: triple.confidence,
        confidence: triple.confidence,
        is_prospective: triple.durability == Durability::Prospective,
        durability: triple.durability,
    }
}

/// Extract, gate, and (for LONG_TERM-bucketed facts) write every candidate
/// triple in `turn_text` to the graph for `user_id`. Errors from the
/// extractor are logged and swallowed — a failed background write must
/// never fail the chat turn that already got its reply.
pub async fn persist_turn_facts(state: AppState, user_id: String, turn_text: String) {
    let identity = IdentityResolver::new(&user_id);
    let known_names: Vec<String> = Vec::new();

    let triples = match state
        .extractor
        .extract(&turn_text, &identity, Speaker::User, &known_names)
        .await
    {
        Ok(triples) => triples,
        Err(e) => {
            warn!(error = %e, user_id, "fact extraction failed, skipping write");
            return;
        }
    };

    if triples.is_empty() {
        return;
    }

    for triple in &triples {
        let recurrence = recurrence_for(&state, &triple.subject, &triple.predicate, &triple.object);
        let candidate = candidate_for(triple);
        let decision = state.memory_gate.decide(&candidate, recurrence, &user_id);

        match decision.bucket {
            Bucket::Discard => {
                debug!(subject = %triple.subject, predicate = %triple.predicate, reason = decision.reason, "fact discarded");
            }
            Bucket::Ephemeral | Bucket::Session | Bucket::Prospective => {
                // No EPHEMERAL/SESSION TTL store or PROSPECTIVE task store is
                // wired in this minimal binding; the bucket decision itself
                // is still fully evaluated and traced, just not persisted.
                debug!(
                    subject = %triple.subject,
                    predicate = %triple.predicate,
                    bucket = ?decision.bucket,
                    reason = decision.reason,
                    "fact bucketed to a store not wired in this binding"
                );
            }
            Bucket::LongTerm => write_long_term(&state, &user_id, triple),
        }
    }

    if let Err(e) = state.graph.flush() {
        warn!(error = %e, user_id, "failed to flush graph after turn fact write");
    }
}

fn write_long_term(state: &AppState, user_id: &str, triple: &SanitizedTriple) {
    let entry = match state.catalog.lookup(&triple.predicate) {
        Some(entry) => entry,
        None => return,
    };

    let existing: Vec<ExistingFact> = state
        .graph
        .active_facts_for(&triple.subject, &triple.predicate)
        .into_iter()
        .map(|f| ExistingFact {
            fact_id: f.fact_id,
            object: f.object,
            confidence: f.confidence,
            created_at: f.created_at,
        })
        .collect();

    let new_fact = NewFact {
        subject: triple.subject.clone(),
        predicate: triple.predicate.clone(),
        object: triple.object.clone(),
        confidence: triple.confidence,
    };

    let action = state
        .lifecycle
        .resolve(entry.cardinality, &new_fact, &existing, chrono::Utc::now());

    match action {
        LifecycleAction::NoOp { .. } => {}
        LifecycleAction::Conflict { .. } => {
            info!(
                subject = %triple.subject,
                predicate = %triple.predicate,
                object = %triple.object,
                "fact conflicts with an existing claim, left for confirmation"
            );
        }
        LifecycleAction::Coexist => {
            state.graph.merge(NewFactInput {
                subject: triple.subject.clone(),
                predicate: triple.predicate.clone(),
                object: triple.object.clone(),
                confidence: triple.confidence,
                category: category_for(&triple.category),
                source_turn_id: None,
            });
        }
        LifecycleAction::Supersede { superseded_fact_ids } => {
            state.graph.supersede(&superseded_fact_ids);
            state.graph.merge(NewFactInput {
                subject: triple.subject.clone(),
                predicate: triple.predicate.clone(),
                object: triple.object.clone(),
                confidence: triple.confidence,
                category: category_for(&triple.category),
                source_turn_id: None,
            });
        }
    }
}
