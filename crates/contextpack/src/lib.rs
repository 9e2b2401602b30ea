pub mod builder;
pub mod dedup;
pub mod injection;
pub mod intent;
pub mod report;
pub mod truncation;
pub mod types;

pub use builder::ContextBuilder;
pub use report::{ContextReport, LayerReport};
pub use types::{
    ContextInputs, ContextMode, EpisodeKindHint, EpisodicCandidate, Intent, TranscriptTurn,
};
