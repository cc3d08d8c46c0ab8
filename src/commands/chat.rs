use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use crate::models::{ChatMessage, ChatRole};
use crate::services::state::AppState;

/// Shown in place of a reply when the chat call fails; there is no retry.
pub const FALLBACK_REPLY: &str =
    "Sorry, AskLio is unavailable right now. Please try again in a moment.";

/// Chat history lives in the panel only: not persisted, not part of the
/// store, gone when the session ends.
#[derive(Default)]
pub struct ChatSession {
    messages: Mutex<Vec<ChatMessage>>,
}

impl ChatSession {
    pub fn new() -> Self {
        ChatSession::default()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, role: ChatRole, content: String) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ChatMessage { role, content });
    }
}

/// The user message is appended optimistically before the call goes out.
pub async fn send_message(
    state: &Arc<AppState>,
    session: &ChatSession,
    text: &str,
) -> Result<(), String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    session.push(ChatRole::User, trimmed.to_string());

    match state.api.chat(trimmed).await {
        Ok(reply) => session.push(ChatRole::Assistant, reply),
        Err(err) => {
            warn!(error = %err, "chat call failed");
            session.push(ChatRole::Assistant, FALLBACK_REPLY.to_string());
        }
    }
    Ok(())
}
