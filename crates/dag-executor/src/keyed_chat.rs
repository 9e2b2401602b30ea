use chrono::Utc;
use sa_domain::error::{Error, Result};
use sa_key_pool::KeyPool;
use sa_providers::router::LlmRouter;
use sa_providers::traits::{ChatRequest, ChatResponse};

const MAX_KEY_ATTEMPTS: u32 = 8;

/// Wrap [`LlmRouter::chat_for_role_name`] with key-level retry bookkeeping.
///
/// The router already walks a model governance list internally; this adds
/// an outer loop over keys registered in the pool *for that role*, so a
/// 429 on one key rotates to the next before the model itself is given up
/// on. Keys are registered per role name rather than per literal provider
/// id, since the router — not its callers — owns provider resolution.
/// Returns the response plus how many key attempts it took (for tracing).
pub async fn chat_with_key_rotation(
    router: &LlmRouter,
    key_pool: &KeyPool,
    role: &str,
    req: &ChatRequest,
) -> Result<(ChatResponse, u32)> {
    let now = Utc::now();
    for attempt in 0..MAX_KEY_ATTEMPTS {
        match key_pool.next_available_key(role, now) {
            None => return router.chat_for_role_name(role, req.clone()).await.map(|r| (r, attempt)),
            Some(key) => match router.chat_for_role_name(role, req.clone()).await {
                Ok(resp) => {
                    let tokens = resp.usage.as_ref().map(|u| u.total_tokens as u64).unwrap_or(0);
                    key_pool.record_success(role, &key, tokens, now);
                    return Ok((resp, attempt));
                }
                Err(e) if e.is_retryable() => {
                    let is_quota = matches!(e, Error::QuotaExhausted(_));
                    key_pool.record_failure(role, &key, is_quota, now);
                }
                Err(e) => return Err(e),
            },
        }
    }
    router
        .chat_for_role_name(role, req.clone())
        .await
        .map(|r| (r, MAX_KEY_ATTEMPTS))
}
