//! Memory write gate: decides, for each candidate fact surfaced by the
//! triple extractor, which storage bucket (if any) it should be written
//! to. Scoring inputs (utility, stability, confidence) are produced
//! upstream; this crate only implements the threshold ladder and its
//! audit trail.
//!
//! A threshold-driven bucketing decision read from config, evaluated
//! against a config struct the same way the rest of the policy layer
//! evaluates its own thresholds.

use sa_catalog::Durability;
use sa_domain::config::MemoryWriteGateConfig;
use sa_domain::trace::TraceEvent;

/// Where a candidate fact should be written, or that it should be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Not worth remembering at all.
    Discard,
    /// Scoped to the current session; gone once the session resets.
    Session,
    /// Short-lived, time-boxed storage (see
    /// [`MemoryWriteGateConfig::ephemeral_ttl_secs`]).
    Ephemeral,
    /// Durable, written to the knowledge graph.
    LongTerm,
    /// A future-oriented commitment (reminder, planned action) rather than
    /// a fact about the present.
    Prospective,
}

/// A scored candidate fact ready for a bucket decision.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    /// How useful this fact would be to recall later (0.0-1.0).
    pub utility: f64,
    /// How likely this fact is to remain true over time (0.0-1.0).
    pub stability: f64,
    /// Extraction confidence from the triple extractor (0.0-1.0).
    pub confidence: f64,
    /// Whether this candidate describes a future commitment rather than a
    /// present-tense fact (e.g. "remind me to call Sarah Friday").
    pub is_prospective: bool,
    /// The predicate's catalog durability. EPHEMERAL/SESSION/PROSPECTIVE
    /// bypass scoring entirely and force that bucket directly; only
    /// LONG_TERM (and SITUATIONAL/STATIC) candidates are scored.
    pub durability: Durability,
}

#[derive(Debug, Clone)]
pub struct GateDecision {
    pub bucket: Bucket,
    pub reason: &'static str,
}

pub struct MemoryWriteGate {
    config: MemoryWriteGateConfig,
}

impl MemoryWriteGate {
    pub fn new(config: MemoryWriteGateConfig) -> Self {
        Self { config }
    }

    /// Decide the bucket for a candidate. `recurrence_seen` is the number of
    /// prior times an equivalent (subject, predicate, object) has been
    /// independently mentioned — a low-confidence candidate may still
    /// qualify for LONG_TERM once corroborated often enough.
    pub fn decide(&self, candidate: &Candidate, recurrence_seen: u32, user_id: &str) -> GateDecision {
        let decision = self.decide_inner(candidate, recurrence_seen);

        TraceEvent::MemoryWriteDecision {
            user_id: user_id.to_string(),
            subject: candidate.subject.clone(),
            predicate: candidate.predicate.clone(),
            bucket: format!("{:?}", decision.bucket).to_uppercase(),
            utility: candidate.utility,
            stability: candidate.stability,
            confidence: candidate.confidence,
        }
        .emit();

        decision
    }

    fn decide_inner(&self, candidate: &Candidate, recurrence_seen: u32) -> GateDecision {
        if !self.config.write_enabled {
            return GateDecision {
                bucket: Bucket::Discard,
                reason: "writes disabled by policy",
            };
        }

        if candidate.is_prospective {
            return GateDecision {
                bucket: Bucket::Prospective,
                reason: "future-oriented commitment",
            };
        }

        // Predicate durability decides the bucket outright for anything
        // shorter-lived than LONG_TERM; scoring below never runs for these.
        match candidate.durability {
            Durability::Ephemeral => {
                return GateDecision {
                    bucket: Bucket::Ephemeral,
                    reason: "forced ephemeral by predicate durability",
                };
            }
            Durability::Session => {
                return GateDecision {
                    bucket: Bucket::Session,
                    reason: "forced session-scoped by predicate durability",
                };
            }
            Durability::Prospective => {
                return GateDecision {
                    bucket: Bucket::Prospective,
                    reason: "forced prospective by predicate durability",
                };
            }
            Durability::Situational | Durability::Static | Durability::LongTerm => {}
        }

        if candidate.utility < self.config.utility_threshold {
            return GateDecision {
                bucket: Bucket::Discard,
                reason: "utility below threshold",
            };
        }

        let stable = candidate.stability >= self.config.stability_threshold;
        let confident = candidate.confidence >= self.config.confidence_threshold;

        if stable && confident {
            return GateDecision {
                bucket: Bucket::LongTerm,
                reason: "stable and confident",
            };
        }

        // A candidate corroborated by enough independent recurrences earns
        // LONG_TERM regardless of its own stability score.
        if recurrence_seen >= self.config.recurrence_count {
            return GateDecision {
                bucket: Bucket::LongTerm,
                reason: "corroborated by recurrence",
            };
        }

        GateDecision {
            bucket: Bucket::Ephemeral,
            reason: "not yet confident or corroborated enough for durable storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> MemoryWriteGateConfig {
        MemoryWriteGateConfig {
            write_enabled: true,
            utility_threshold: 0.3,
            stability_threshold: 0.6,
            confidence_threshold: 0.7,
            recurrence_count: 2,
            ephemeral_ttl_secs: 21_600,
            session_ttl_secs: 86_400,
        }
    }

    fn candidate(utility: f64, stability: f64, confidence: f64, prospective: bool) -> Candidate {
        Candidate {
            subject: "__USER__::u1".into(),
            predicate: "lives_in".into(),
            object: "Berlin".into(),
            utility,
            stability,
            confidence,
            is_prospective: prospective,
            durability: Durability::LongTerm,
        }
    }

    #[test]
    fn writes_disabled_discards_regardless_of_score() {
        let mut config = cfg();
        config.write_enabled = false;
        let gate = MemoryWriteGate::new(config);
        let d = gate.decide(&candidate(0.9, 0.9, 0.9, false), 5, "u1");
        assert_eq!(d.bucket, Bucket::Discard);
    }

    #[test]
    fn low_utility_discarded() {
        let gate = MemoryWriteGate::new(cfg());
        let d = gate.decide(&candidate(0.1, 0.9, 0.9, false), 0, "u1");
        assert_eq!(d.bucket, Bucket::Discard);
    }

    #[test]
    fn prospective_flag_always_prospective_bucket() {
        let gate = MemoryWriteGate::new(cfg());
        let d = gate.decide(&candidate(0.9, 0.1, 0.1, true), 0, "u1");
        assert_eq!(d.bucket, Bucket::Prospective);
    }

    #[test]
    fn ephemeral_durability_bypasses_scoring() {
        let gate = MemoryWriteGate::new(cfg());
        let mut c = candidate(0.0, 0.0, 0.0, false);
        c.durability = Durability::Ephemeral;
        let d = gate.decide(&c, 0, "u1");
        assert_eq!(d.bucket, Bucket::Ephemeral);
    }

    #[test]
    fn session_durability_bypasses_scoring() {
        let gate = MemoryWriteGate::new(cfg());
        let mut c = candidate(0.9, 0.9, 0.9, false);
        c.durability = Durability::Session;
        let d = gate.decide(&c, 0, "u1");
        assert_eq!(d.bucket, Bucket::Session);
    }

    #[test]
    fn prospective_durability_bypasses_scoring() {
        let gate = MemoryWriteGate::new(cfg());
        let mut c = candidate(0.0, 0.0, 0.0, false);
        c.durability = Durability::Prospective;
        let d = gate.decide(&c, 0, "u1");
        assert_eq!(d.bucket, Bucket::Prospective);
    }

    #[test]
    fn stable_and_confident_is_long_term() {
        let gate = MemoryWriteGate::new(cfg());
        let d = gate.decide(&candidate(0.8, 0.9, 0.9, false), 0, "u1");
        assert_eq!(d.bucket, Bucket::LongTerm);
    }

    #[test]
    fn recurrence_promotes_to_long_term_without_stability() {
        let gate = MemoryWriteGate::new(cfg());
        let d = gate.decide(&candidate(0.8, 0.1, 0.3, false), 1, "u1");
        assert_eq!(d.bucket, Bucket::Ephemeral);
        let d = gate.decide(&candidate(0.8, 0.1, 0.3, false), 2, "u1");
        assert_eq!(d.bucket, Bucket::LongTerm);
    }

    #[test]
    fn unstable_unconfident_uncorroborated_defaults_to_ephemeral_not_session() {
        let gate = MemoryWriteGate::new(cfg());
        let d = gate.decide(&candidate(0.8, 0.2, 0.1, false), 0, "u1");
        assert_eq!(d.bucket, Bucket::Ephemeral);
    }
}
