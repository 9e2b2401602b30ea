//! Executes a planner-produced task DAG: layers of ready tasks run in
//! parallel, generation/clarification tasks route through the LLM router
//! with key-pool rotation, tool tasks dispatch to a registry, and
//! memory_control tasks perform privileged graph operations.
//!
//! Grounded on `crates/gateway/src/runtime/turn.rs`'s tool loop (model
//! invocation, thought/tool-call event splitting) and `crates/providers/
//! src/router.rs`'s governance-list fallback, generalized from one linear
//! loop to an explicit dependency DAG executed in topological layers.

pub mod executor;
pub mod keyed_chat;
pub mod memory_control;
pub mod registry;
pub mod substitute;
pub mod types;

pub use executor::DagExecutor;
pub use registry::{ToolHandler, ToolRegistry};
pub use types::{ExecutionContext, ExecutorEvent, TaskResult, TaskStatus};
