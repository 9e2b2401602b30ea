use serde::Serialize;

/// Structured trace events emitted across all SerialAgent crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    ContextBuilt {
        total_injected_chars: usize,
        files_included: usize,
        files_truncated_per_file: usize,
        files_truncated_total_cap: usize,
        files_excluded: usize,
        skills_index_chars: usize,
        user_facts_chars: usize,
        bootstrap_included: bool,
    },
    SkillDocLoaded {
        skill_name: String,
        doc_chars: usize,
    },
    UserFactsFetched {
        user_id: String,
        facts_chars: usize,
        pinned_count: usize,
        search_count: usize,
    },
    WorkspaceFileRead {
        filename: String,
        raw_chars: usize,
        cache_hit: bool,
    },
    BootstrapCompleted {
        workspace_id: String,
    },
    SerialMemoryCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    LlmRequest {
        provider: String,
        model: String,
        role: String,
        streaming: bool,
        duration_ms: u64,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
    },
    LlmFallback {
        from_provider: String,
        from_model: String,
        to_provider: String,
        to_model: String,
        reason: String,
    },
    SessionResolved {
        session_key: String,
        session_id: String,
        is_new: bool,
    },
    SessionReset {
        session_key: String,
        old_session_id: String,
        new_session_id: String,
        reason: String,
    },
    TranscriptAppend {
        session_id: String,
        lines: usize,
    },
    IdentityResolved {
        raw_peer_id: String,
        canonical: String,
    },
    MemoryWriteDecision {
        user_id: String,
        subject: String,
        predicate: String,
        bucket: String,
        utility: f64,
        stability: f64,
        confidence: f64,
    },
    LifecycleSupersede {
        subject: String,
        predicate: String,
        cardinality: String,
        superseded_fact_id: String,
        new_fact_id: String,
    },
    LifecycleCoexist {
        subject: String,
        predicate: String,
        fact_id: String,
    },
    LifecycleConflict {
        subject: String,
        predicate: String,
        fact_id: String,
        conflicting_fact_id: String,
    },
    GraphMerge {
        subject: String,
        predicate: String,
        object: String,
        fact_id: String,
        was_new: bool,
    },
    VectorUpsert {
        episode_id: String,
        point_id: String,
        dims: usize,
    },
    VectorSearch {
        user_id: String,
        k: usize,
        hits: usize,
        duration_ms: u64,
    },
    SemanticCacheLookup {
        cache_key: String,
        hit: bool,
        similarity: Option<f32>,
    },
    ContextLayerBuilt {
        layer: String,
        intent: String,
        raw_chars: usize,
        injected_chars: usize,
        truncated: bool,
    },
    OrchestratorPlanned {
        request_id: String,
        intent: String,
        task_count: usize,
        layer_count: usize,
    },
    DagTaskCompleted {
        request_id: String,
        task_id: String,
        task_type: String,
        succeeded: bool,
        duration_ms: u64,
        fallback_count: u32,
    },
    SynthesizerStreamed {
        request_id: String,
        chunks: usize,
        total_chars: usize,
    },
    EpisodeTransition {
        episode_id: String,
        from_status: String,
        to_status: String,
    },
    EpisodeConsolidated {
        user_id: String,
        episode_ids: Vec<String>,
        summary_chars: usize,
    },
    LeaderElected {
        instance_id: String,
        lock_name: String,
        term_expires_at: String,
    },
    LeaderLost {
        instance_id: String,
        lock_name: String,
        reason: String,
    },
    KeyCooldown {
        provider: String,
        key_label: String,
        reason: String,
        until: String,
    },
    SchedulerJobRan {
        job_name: String,
        leader_only: bool,
        duration_ms: u64,
        succeeded: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "sa_event");
    }
}
