use std::sync::Arc;

use sa_catalog::PredicateCatalog;
use sa_domain::capability::ModelRole;
use sa_domain::error::Result;
use sa_domain::tool::Message;
use sa_identity::{IdentityResolver, Speaker};
use sa_providers::router::LlmRouter;
use sa_providers::traits::ChatRequest;

use crate::parse::parse_llm_output;
use crate::sanitize::TripleSanitizer;
use crate::types::SanitizedTriple;

const SYSTEM_PROMPT: &str = "You extract factual (subject, predicate, object) triples \
from a single conversation turn. Respond with a JSON array only, no prose. \
Each element has \"subject\", \"predicate\", \"object\", and \"confidence\" \
(0.0-1.0) fields. Only extract durable facts, not passing remarks. If there \
is nothing worth remembering, respond with an empty array.";

/// Extracts and sanitizes candidate triples from a turn of conversation,
/// using the configured `Extractor` model role.
///
/// Calls `LlmRouter::chat_for_role` for the model call, then runs the
/// response through a permissive-parse-then-sanitize pipeline.
pub struct LlmTripleExtractor {
    router: Arc<LlmRouter>,
    catalog: Arc<PredicateCatalog>,
}

impl LlmTripleExtractor {
    pub fn new(router: Arc<LlmRouter>, catalog: Arc<PredicateCatalog>) -> Self {
        Self { router, catalog }
    }

    /// Extract sanitized candidate triples from one turn's text.
    ///
    /// `identity` is the caller's resolver for the user the turn belongs to;
    /// `known_names` are names already on file for that user, so a bare
    /// proper-noun subject can fold onto the user's own anchor without this
    /// single batch having to rediscover it.
    pub async fn extract(
        &self,
        turn_text: &str,
        identity: &IdentityResolver,
        speaker: Speaker,
        known_names: &[String],
    ) -> Result<Vec<SanitizedTriple>> {
        if turn_text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let req = ChatRequest {
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(turn_text),
            ],
            json_mode: true,
            temperature: Some(0.0),
            ..ChatRequest::default()
        };

        let response = self.router.chat_for_role(ModelRole::Extractor, req).await?;
        let raw = parse_llm_output(&response.content)?;
        let sanitizer = TripleSanitizer {
            catalog: &self.catalog,
            identity,
        };
        Ok(sanitizer.sanitize_batch(&raw, speaker, known_names))
    }
}
