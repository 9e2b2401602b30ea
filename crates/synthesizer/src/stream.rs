use futures_util::StreamExt;

use sa_domain::error::Result;
use sa_domain::stream::StreamEvent;
use sa_domain::tool::{Message, MessageContent, Role};
use sa_domain::trace::TraceEvent;
use sa_providers::router::LlmRouter;
use sa_providers::traits::ChatRequest;

use crate::presets::StyleCatalog;
use crate::prompt::build_prompt;
use crate::sanitize::sanitize_output;
use crate::types::SynthInput;

pub const SYNTHESIZER_ROLE: &str = "synthesizer";

/// Stream the synthesizer model's reply for one request and return the
/// fully assembled, sanitized text. `on_chunk` is called with each raw
/// token as it arrives (pre-sanitization — live display), mirroring the
/// teacher's `TurnEvent::AssistantDelta` streaming shape.
pub async fn synthesize(
    router: &LlmRouter,
    input: SynthInput<'_>,
    catalog: &StyleCatalog,
    mut on_chunk: impl FnMut(&str),
) -> Result<String> {
    let request_id = input.request_id.to_string();
    let prompt = build_prompt(&input, catalog);

    let req = ChatRequest {
        messages: vec![Message {
            role: Role::System,
            content: MessageContent::Text(prompt),
        }],
        ..Default::default()
    };

    let mut stream = router
        .chat_stream_for_role_name(SYNTHESIZER_ROLE, req)
        .await?;

    let mut buf = String::new();
    let mut chunks = 0usize;
    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::Token { text } => {
                on_chunk(&text);
                buf.push_str(&text);
                chunks += 1;
            }
            StreamEvent::Done { .. } => break,
            StreamEvent::Error { message } => {
                return Err(sa_domain::error::Error::Provider {
                    provider: "synthesizer".to_string(),
                    message,
                });
            }
            _ => {}
        }
    }

    let sanitized = sanitize_output(&buf);
    TraceEvent::SynthesizerStreamed {
        request_id,
        chunks,
        total_chars: sanitized.len(),
    }
    .emit();

    Ok(sanitized)
}
