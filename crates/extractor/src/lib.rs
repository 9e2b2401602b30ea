pub mod extractor;
pub mod parse;
pub mod sanitize;
pub mod types;

pub use extractor::LlmTripleExtractor;
pub use sanitize::TripleSanitizer;
pub use types::{RawTriple, SanitizedTriple};
