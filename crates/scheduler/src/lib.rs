//! Background job scheduling and leader election.
//!
//! A cross-process coordinator built from single-process cron/concurrency/
//! lock primitives: a fixed [`types::BaseJob`] catalog, pure
//! [`schedule::is_due`]/[`schedule::due_jobs`] cadence checks, a TTL-based
//! [`lock::SchedulerLockStore`] for leader election, and a
//! [`concurrency::ConcurrencyGuard`] port for bounding fan-out batch jobs.
//!
//! This crate is deliberately dependency-light: it knows nothing about
//! episodes, the graph, or the DAG. Job bodies are supplied by the caller
//! (the gateway binds each [`types::BaseJob`] name to a concrete async
//! closure), the same pre-gathered-input pattern used by the orchestrator
//! and synthesizer crates.

pub mod concurrency;
pub mod coordinator;
pub mod lock;
pub mod notify;
pub mod schedule;
pub mod types;

pub use concurrency::ConcurrencyGuard;
pub use coordinator::SchedulerCoordinator;
pub use lock::SchedulerLockStore;
pub use notify::{should_emit, GateDecision};
pub use schedule::{due_jobs, is_due};
pub use types::{builtin_jobs, BaseJob};
