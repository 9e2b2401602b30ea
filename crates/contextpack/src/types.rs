use serde::{Deserialize, Serialize};

/// Memory injection policy, checked before any retrieval happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContextMode {
    /// No personal memory is retrieved or injected at all.
    Off,
    /// Normal operation.
    Standard,
    /// Same as Standard; reserved for a future wider-budget profile.
    Full,
}

/// Heuristic intent bucket driving the layer-weight profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Personal,
    Task,
    Followup,
    General,
    Mixed,
}

/// A single transcript turn, already fetched for this session.
#[derive(Debug, Clone)]
pub struct TranscriptTurn {
    pub role: String,
    pub content: String,
}

/// Mirrors `sa_episodes`'s episode kind without depending on that crate —
/// the builder stays a pure function over caller-supplied data, same as the
/// original workspace-file version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeKindHint {
    Regular,
    Consolidated,
}

/// An episodic search candidate, already retrieved from the vector store.
#[derive(Debug, Clone)]
pub struct EpisodicCandidate {
    pub episode_id: String,
    pub summary: String,
    pub similarity: f32,
    pub kind: EpisodeKindHint,
}

/// Boost multiplier applied to a CONSOLIDATED episode's similarity score
/// before ranking — consolidated summaries condense more signal per
/// character, so they're favored at equal similarity.
pub const CONSOLIDATED_BOOST: f32 = 1.1;

/// Everything the context builder needs for one turn. Retrieval (graph
/// queries, vector search, transcript fetch) happens upstream; this struct
/// is the pure-function boundary.
pub struct ContextInputs<'a> {
    pub mode: ContextMode,
    pub user_message: &'a str,
    /// Last turns for this session, chronological. Only the most recent 12
    /// are used even if more are supplied.
    pub transcript_turns: Vec<TranscriptTurn>,
    /// Episodic candidates from outside the current session. Only the top
    /// 10 after boosting and ranking are used even if more are supplied.
    pub episodic_candidates: Vec<EpisodicCandidate>,
    /// Pre-rendered identity-predicate fact lines (e.g. "adı: Ahmet").
    pub identity_facts: Vec<String>,
    /// Pre-rendered EXCLUSIVE, non-identity ACTIVE fact lines.
    pub hard_facts: Vec<String>,
    /// Pre-rendered ADDITIVE/TEMPORAL ACTIVE fact lines.
    pub soft_facts: Vec<String>,
    /// Pre-rendered CONFLICTED fact groups, one open question per entry.
    pub open_questions: Vec<String>,
    /// The most recently active entity in this session, if any — used to
    /// resolve a dangling pronoun in `user_message`.
    pub last_active_entity: Option<String>,
}
