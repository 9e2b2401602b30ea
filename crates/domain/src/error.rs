/// Shared error type used across all SerialAgent crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("SerialMemory: {0}")]
    SerialMemory(String),

    #[error("skill not found: {0}")]
    SkillNotFound(String),

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    /// Upstream dependency failed in a way that is expected to clear on its
    /// own (network blip, 5xx, connection reset). Safe to retry with backoff.
    #[error("transient external failure: {0}")]
    TransientExternal(String),

    /// A key/provider/agent has exhausted its configured quota for the
    /// current window. Retrying the same key will not help before reset.
    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),

    /// The caller supplied input that can never succeed (malformed request,
    /// invalid predicate, schema violation). Retrying is pointless.
    #[error("invalid input: {0}")]
    PermanentInput(String),

    /// The graph or vector store backing a read/write is unreachable.
    #[error("store unavailable: {0}")]
    DbUnavailable(String),

    /// The triple extractor produced output that could not be parsed into
    /// well-formed candidate facts.
    #[error("extractor parse failure: {0}")]
    ExtractorParse(String),

    /// The vector store is reachable but degraded (e.g. index rebuilding);
    /// callers may fall back to a text-only path.
    #[error("vector store degraded: {0}")]
    VectorStoreDegraded(String),

    /// An action was blocked by policy (e.g. a lifecycle or gate rule).
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// The caller is not permitted to perform this action.
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether a caller should retry this operation (with backoff) rather
    /// than surface it immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::TransientExternal(_)
                | Error::Timeout(_)
                | Error::DbUnavailable(_)
                | Error::VectorStoreDegraded(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
