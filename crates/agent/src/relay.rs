use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use carmatch_core::domain::conversation::ConversationMessage;

use crate::llm::LlmClient;
use crate::personas::Persona;

/// Forwards a transcript under a persona prompt and hands back the reply text.
#[derive(Clone)]
pub struct ConversationalRelay {
    client: Arc<dyn LlmClient>,
}

impl ConversationalRelay {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub async fn relay(
        &self,
        persona: Persona,
        messages: &[ConversationMessage],
    ) -> Result<String> {
        let started = Instant::now();
        let result = self.client.complete(persona.system_prompt(), messages).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(reply) => info!(
                event_name = "chat.relay.completed",
                persona = persona.as_str(),
                message_count = messages.len(),
                reply_chars = reply.chars().count(),
                elapsed_ms,
                "completion relayed"
            ),
            Err(error) => warn!(
                event_name = "chat.relay.failed",
                persona = persona.as_str(),
                message_count = messages.len(),
                elapsed_ms,
                error = %error,
                "completion request failed"
            ),
        }

        result
    }
}
