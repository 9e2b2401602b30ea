//! Thin axum binding over the cognitive-core library crates.
//!
//! Wires `sa-graph`, `sa-vector`, `sa-episodes`, `sa-scheduler`, and the
//! planner/executor/synthesizer pipeline into a single process behind
//! `axum`. Full auth/session plumbing, the benchmarking surface, and
//! static UI assets are out of scope; see `cli::doctor` for startup
//! diagnostics instead of a dashboard.

pub mod api;
pub mod cli;
pub mod jobs;
pub mod memory_write;
pub mod state;
