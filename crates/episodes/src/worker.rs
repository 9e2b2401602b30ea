use sa_domain::capability::ModelRole;
use sa_domain::config::EpisodePipelineConfig;
use sa_domain::error::Result;
use sa_domain::tool::{Message, MessageContent, Role};
use sa_domain::trace::TraceEvent;
use sa_graph::{FactCategory, GraphStore, NewFactInput};
use sa_providers::router::LlmRouter;
use sa_providers::traits::{ChatRequest, EmbeddingsRequest};
use sa_vector::VectorStore;

use crate::retry::retry_with_backoff;
use crate::store::EpisodeStore;
use crate::types::{Episode, EpisodeKind, VectorStatus};

const SUMMARY_SYSTEM_PROMPT: &str = "Summarize the following conversation turns into a short, \
third-person episodic memory a few sentences long. Capture what happened and what mattered, \
not a transcript.";

/// A fallback embedding predicate, used only when the vector store upsert
/// fails and `store_embedding_in_graph_on_vector_failure` is set: the raw
/// vector is stringified and stashed as a fact so it is not silently lost.
pub const EMBEDDING_FALLBACK_PREDICATE: &str = "HAS_EMBEDDING_FALLBACK";

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerOutcome {
    NoWork,
    Processed {
        episode_id: uuid::Uuid,
        summary: Option<String>,
        vector_status: VectorStatus,
    },
}

pub struct EpisodeWorker<'a> {
    pub store: &'a EpisodeStore,
    pub vector: &'a VectorStore,
    pub graph: &'a GraphStore,
    pub router: &'a LlmRouter,
    pub config: &'a EpisodePipelineConfig,
}

impl EpisodeWorker<'_> {
    /// Claim and process one PENDING episode of `kind`. `fetch_turns`
    /// supplies the transcript text for the episode's turn range (or
    /// `source_episode_ids`' prior summaries, for a consolidation job) —
    /// the worker itself has no opinion on where turns live.
    pub async fn run_once(
        &self,
        kind: EpisodeKind,
        fetch_turns: impl FnOnce(&Episode) -> Option<String>,
    ) -> WorkerOutcome {
        let Some(episode) = self.store.claim_one_pending(kind) else {
            return WorkerOutcome::NoWork;
        };

        let Some(text) = fetch_turns(&episode) else {
            self.store.mark_failed(episode.episode_id, "no turns found in range");
            return WorkerOutcome::Processed {
                episode_id: episode.episode_id,
                summary: None,
                vector_status: VectorStatus::Pending,
            };
        };

        let summary = match self.summarize(&text, episode.episode_id).await {
            Ok(summary) => summary,
            Err(e) => {
                self.store.mark_failed(episode.episode_id, e.to_string());
                return WorkerOutcome::Processed {
                    episode_id: episode.episode_id,
                    summary: None,
                    vector_status: VectorStatus::Pending,
                };
            }
        };

        let (vector_status, vector_error) = self.finalize_vectors(&episode, &summary).await;
        self.store
            .mark_ready(episode.episode_id, summary.clone(), vector_status, vector_error);

        if episode.kind == EpisodeKind::Consolidated {
            TraceEvent::EpisodeConsolidated {
                user_id: episode.user_id.clone(),
                episode_ids: episode
                    .source_episode_ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect(),
                summary_chars: summary.len(),
            }
            .emit();
        }

        WorkerOutcome::Processed {
            episode_id: episode.episode_id,
            summary: Some(summary),
            vector_status,
        }
    }

    async fn summarize(&self, text: &str, episode_id: uuid::Uuid) -> Result<String> {
        let req = ChatRequest {
            messages: vec![
                Message {
                    role: Role::System,
                    content: MessageContent::Text(SUMMARY_SYSTEM_PROMPT.to_string()),
                },
                Message {
                    role: Role::User,
                    content: MessageContent::Text(text.to_string()),
                },
            ],
            ..Default::default()
        };

        let seed = episode_id.to_string();
        let resp = retry_with_backoff(
            self.config.max_attempts,
            self.config.retry_backoff_ms,
            &seed,
            |_attempt| {
                self.store.record_attempt(episode_id);
                let req = req.clone();
                async move { self.router.chat_for_role(ModelRole::Summarizer, req).await }
            },
        )
        .await?;

        Ok(resp.content)
    }

    /// Embed the summary and upsert it into the vector store. Returns the
    /// resulting `vector_status` and, on failure, a human-readable reason.
    /// A summary shorter than `min_summary_chars` is considered too thin
    /// to be worth embedding at all.
    async fn finalize_vectors(&self, episode: &Episode, summary: &str) -> (VectorStatus, Option<String>) {
        if summary.chars().count() < self.config.min_summary_chars {
            return (VectorStatus::Skipped, None);
        }

        let seed = episode.episode_id.to_string();
        let embed_result = retry_with_backoff(3, self.config.retry_backoff_ms, &seed, |_| {
            let req = EmbeddingsRequest {
                input: vec![summary.to_string()],
                model: None,
            };
            async move { self.router.embed_for_role(ModelRole::Embedder, req).await }
        })
        .await;

        let embedding = match embed_result {
            Ok(resp) => match resp.embeddings.into_iter().next() {
                Some(embedding) => embedding,
                None => return (VectorStatus::Failed, Some("embedder returned no vectors".to_string())),
            },
            Err(e) => return (VectorStatus::Failed, Some(e.to_string())),
        };

        match self
            .vector
            .upsert(&episode.user_id, &episode.episode_id.to_string(), embedding.clone())
        {
            Ok(_) => (VectorStatus::Ready, None),
            Err(e) => {
                if self.config.store_embedding_in_graph_on_vector_failure {
                    self.graph.merge(NewFactInput {
                        subject: episode.episode_id.to_string(),
                        predicate: EMBEDDING_FALLBACK_PREDICATE.to_string(),
                        object: encode_embedding(&embedding),
                        confidence: 1.0,
                        category: FactCategory::General,
                        source_turn_id: None,
                    });
                }
                (VectorStatus::Failed, Some(e.to_string()))
            }
        }
    }
}

fn encode_embedding(embedding: &[f32]) -> String {
    embedding
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
