use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{InvocationError, SlashResult};
use crate::model::Snowflake;
use crate::transport::InteractionResponder;

/// What gets sent back for one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionResponse {
    /// Empty acknowledgement of a health-check.
    Pong,
    Message { content: String },
    /// Acknowledges without content; the requester sees a pending state.
    Deferred,
}

impl InteractionResponse {
    pub fn message(content: impl Into<String>) -> Self {
        InteractionResponse::Message {
            content: content.into(),
        }
    }

    pub fn to_wire(&self) -> Value {
        match self {
            InteractionResponse::Pong => json!({ "type": 1 }),
            InteractionResponse::Message { content } => {
                json!({ "type": 4, "data": { "content": content } })
            }
            InteractionResponse::Deferred => json!({ "type": 5 }),
        }
    }
}

/// Once-only access to the response primitive of an interaction.
#[derive(Clone)]
pub struct ResponseHandle {
    interaction_id: Snowflake,
    token: String,
    responder: Arc<dyn InteractionResponder>,
    responded: Arc<AtomicBool>,
}

impl ResponseHandle {
    pub fn new(
        interaction_id: Snowflake,
        token: impl Into<String>,
        responder: Arc<dyn InteractionResponder>,
    ) -> Self {
        Self {
            interaction_id,
            token: token.into(),
            responder,
            responded: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    /// Emits `response`; a second call for the same interaction fails.
    /// A transport failure re-arms the handle so the emission can be retried.
    pub async fn send(&self, response: InteractionResponse) -> SlashResult<()> {
        if self
            .responded
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(InvocationError::AlreadyResponded {
                interaction: self.interaction_id.to_string(),
            }
            .into());
        }

        if let Err(e) = self
            .responder
            .respond(self.interaction_id, &self.token, &response)
            .await
        {
            self.responded.store(false, Ordering::SeqCst);
            return Err(e.into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for ResponseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseHandle")
            .field("interaction_id", &self.interaction_id)
            .field("responded", &self.is_responded())
            .finish()
    }
}
