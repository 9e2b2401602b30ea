//! Turn-level planner: decides intent, detects topic, and produces a DAG
//! of tasks for the DAG executor to run.
//!
//! A single planner call hydrates session/topic state and produces a fixed
//! tool-calling loop, generalized here into an explicit, inspectable task
//! DAG rather than an implicit loop.

pub mod hydrate;
pub mod plan;
pub mod types;

pub use hydrate::hydrate_active_topic;
pub use plan::{annotate_conflicts, apply_intent_inheritance, plan, topic_changed, ORCHESTRATOR_ROLE};
pub use types::{HistoryTurn, OrchestratorInput, PlanResponse, PlannedTask, TaskType};
