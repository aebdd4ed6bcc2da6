//! The conversation orchestrator: one user message in, one classified
//! and generated reply out, with history updated behind it.

use parley_intent::{response_template, IntentClient};
use parley_session::SessionStore;
use parley_types::{Classification, Turn};
use std::sync::Arc;
use thiserror::Error;

/// How many prior turns are passed to generation. Older turns are
/// silently dropped; the window is fixed, not configurable.
pub const HISTORY_WINDOW: usize = 6;

/// Reply used when generation fails. The turn still counts: this text
/// is appended to history as the assistant turn so the conversation
/// keeps flowing.
pub const FALLBACK_RESPONSE: &str =
    "I apologize, but I'm having trouble understanding. Could you please rephrase that?";

#[derive(Debug, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("message is empty")]
    EmptyMessage,
}

/// Everything a conversational turn produces.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub classification: Classification,
    pub response: String,
}

/// Drives a conversational turn: classify, generate, then record.
#[derive(Clone)]
pub struct Orchestrator {
    sessions: Arc<SessionStore>,
    intents: Arc<IntentClient>,
}

impl Orchestrator {
    pub fn new(sessions: Arc<SessionStore>, intents: Arc<IntentClient>) -> Self {
        Self { sessions, intents }
    }

    /// Handles one user message for a session.
    ///
    /// Provider failures never fail the turn: a classification error
    /// degrades to `other` with zero confidence, a generation error to
    /// the fixed fallback reply. Only an empty message is rejected, and
    /// rejection leaves history untouched — the user/assistant pair is
    /// appended strictly after a reply (real or fallback) exists.
    pub async fn handle_turn(
        &self,
        session_id: &str,
        user_message: &str,
    ) -> Result<TurnOutcome, TurnError> {
        if user_message.trim().is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        // History as it stood before this turn.
        let history = self.sessions.get_history(session_id);

        let classification = match self.intents.classify(user_message).await {
            Ok(classification) => classification,
            Err(e) => {
                tracing::warn!(error = %e, "classification unavailable, defaulting to other");
                Classification::unavailable(format!("classification unavailable: {e}"))
            }
        };

        let response = match self
            .intents
            .generate(
                response_template(classification.intent),
                trailing_window(&history),
                user_message,
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "generation failed, using fallback response");
                FALLBACK_RESPONSE.to_string()
            }
        };

        self.sessions.append_turn(session_id, Turn::user(user_message));
        self.sessions
            .append_turn(session_id, Turn::assistant(response.clone()));

        Ok(TurnOutcome {
            classification,
            response,
        })
    }
}

fn trailing_window(history: &[Turn]) -> &[Turn] {
    &history[history.len().saturating_sub(HISTORY_WINDOW)..]
}
