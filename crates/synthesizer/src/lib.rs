//! Builds the final combined prompt from a DAG's raw results plus identity
//! facts, persona/style directives, and situational instructions, then
//! streams and sanitizes the model's reply.
//!
//! Grounded on `crates/gateway/src/runtime/turn.rs` (streaming loop,
//! `TurnEvent::AssistantDelta`/`Final`) and `crates/providers/src/
//! router.rs`'s governance-list fallback (via `chat_stream_for_role_name`).

pub mod preamble;
pub mod presets;
pub mod prompt;
pub mod sanitize;
pub mod situational;
pub mod stream;
pub mod types;

pub use presets::{StyleCatalog, StylePreset};
pub use prompt::build_prompt;
pub use sanitize::sanitize_output;
pub use stream::{synthesize, SYNTHESIZER_ROLE};
pub use types::{MoodSignal, RawResult, SynthInput};
