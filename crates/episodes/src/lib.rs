//! Episode lifecycle: PENDING → IN_PROGRESS → READY/FAILED, with an
//! independent `vector_status` substate, an `EPISODE_WINDOW`-triggered
//! creation rule, and a separate consolidation pass that folds runs of
//! REGULAR episodes into a CONSOLIDATED one.
//!
//! Uses the same JSON-file persistence idiom already reused by
//! `sa-graph`/`sa-vector`, with bounded-retry-with-backoff applied to
//! summarization and embedding attempts.

pub mod consolidation;
pub mod retry;
pub mod scanner;
pub mod store;
pub mod trigger;
pub mod types;
pub mod worker;

pub use retry::{backoff_delay, retry_with_backoff};
pub use scanner::scan_and_enqueue_consolidations;
pub use store::EpisodeStore;
pub use trigger::{episode_turn_range, should_create_episode};
pub use types::{Episode, EpisodeKind, EpisodeStatus, VectorStatus};
pub use worker::{EpisodeWorker, WorkerOutcome, EMBEDDING_FALLBACK_PREDICATE};
