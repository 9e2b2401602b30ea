use sa_catalog::Durability;
use serde::Deserialize;

/// One candidate triple as returned by the extraction model, before
/// identity resolution or predicate normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    0.5
}

/// Wrapper shape some models return instead of a bare JSON array.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTripleEnvelope {
    pub triples: Vec<RawTriple>,
}

/// A sanitized triple, ready for lifecycle/graph-write decisions.
///
/// `subject` is an anchor entity id (`__USER__::<id>` or `entity::<slug>`),
/// `predicate` is the catalog's canonical name, and `category` is the
/// catalog's `personal`/`general` bridge bucket — demoted to `soft_signal`
/// when a personal-category fact carries low confidence.
#[derive(Debug, Clone)]
pub struct SanitizedTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub category: String,
    pub confidence: f64,
    /// The catalog's durability for this predicate, carried through so the
    /// memory write gate can fast-path PROSPECTIVE facts without a second
    /// catalog lookup. Never `Ephemeral`/`Session` — the sanitizer already
    /// drops those.
    pub durability: Durability,
}
