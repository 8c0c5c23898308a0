//! Conversation session controller.
//!
//! Coordinates one back-and-forth cycle between the person and the remote
//! answering collaborator: appending the user turn, holding the transient
//! placeholder while the call is outstanding, and reconciling the answer
//! (or the failure) back into the transcript.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::transcript::Transcript;
use super::turn::{Role, Turn};
use crate::citation::Citation;
use crate::error::Result;

/// A single message sent to the answering collaborator as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Response payload from the answering collaborator.
///
/// `sources` and `follow_ups` are optional on the wire; absence means the
/// answer carries no citations and no suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Citation>>,
    #[serde(
        default,
        rename = "followUps",
        alias = "follow_ups",
        skip_serializing_if = "Option::is_none"
    )]
    pub follow_ups: Option<Vec<String>>,
}

/// The remote answering collaborator.
///
/// The trait lives here so the controller can be exercised without the
/// network layer; `escriba-interaction` provides the hosted implementation.
#[async_trait]
pub trait AnsweringAgent: Send + Sync {
    /// Answers the conversation so far. `messages` is the full transcript
    /// in chronological order, placeholder excluded.
    async fn answer(&self, messages: &[ChatMessage]) -> Result<AnswerPayload>;
}

/// Result of a submit cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The answer was appended to the transcript.
    Answered,
    /// Preconditions not met (empty draft or a call already in flight);
    /// nothing changed.
    Ignored,
    /// The remote call failed. The user turn is kept for retry and `notice`
    /// is the transient, non-blocking message for the UI layer.
    Failed { notice: String },
}

/// Drives a single conversation session.
///
/// State lives behind `RwLock`s so the transcript (including the pending
/// placeholder) stays observable while a call is outstanding, and so the
/// awaiting guard is an atomic check-and-set: at most one remote call may be
/// in flight per session.
pub struct ConversationController {
    session_id: String,
    transcript: Arc<RwLock<Transcript>>,
    draft: Arc<RwLock<String>>,
    awaiting: Arc<RwLock<bool>>,
    agent: Arc<dyn AnsweringAgent>,
}

impl ConversationController {
    /// Creates a controller for a fresh session.
    pub fn new(agent: Arc<dyn AnsweringAgent>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            transcript: Arc::new(RwLock::new(Transcript::new())),
            draft: Arc::new(RwLock::new(String::new())),
            awaiting: Arc::new(RwLock::new(false)),
            agent,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Replaces the draft text.
    pub async fn set_draft(&self, text: impl Into<String>) {
        *self.draft.write().await = text.into();
    }

    pub async fn draft(&self) -> String {
        self.draft.read().await.clone()
    }

    /// True while a remote call is outstanding.
    pub async fn is_awaiting(&self) -> bool {
        *self.awaiting.read().await
    }

    /// A point-in-time copy of the transcript, placeholder included.
    pub async fn transcript(&self) -> Vec<Turn> {
        self.transcript.read().await.turns().to_vec()
    }

    /// Submits the current draft to the answering collaborator.
    ///
    /// No-op when the trimmed draft is empty or a call is already in
    /// flight. The draft is cleared as soon as the user turn is appended,
    /// regardless of whether the call succeeds. `awaiting` is always back
    /// to false when this returns.
    pub async fn submit(&self) -> SubmitOutcome {
        // Check-and-set under the write lock so a concurrent submit cannot
        // slip in between the check and the flag flip.
        let question = {
            let mut awaiting = self.awaiting.write().await;
            if *awaiting {
                return SubmitOutcome::Ignored;
            }
            let mut draft = self.draft.write().await;
            let trimmed = draft.trim();
            if trimmed.is_empty() {
                return SubmitOutcome::Ignored;
            }
            let question = trimmed.to_string();
            draft.clear();
            *awaiting = true;
            question
        };

        let context = {
            let mut transcript = self.transcript.write().await;
            transcript.append(Turn::user(question));
            let context: Vec<ChatMessage> = transcript
                .context_turns()
                .map(|turn| ChatMessage {
                    role: turn.role,
                    content: turn.content.clone(),
                })
                .collect();
            transcript.append(Turn::placeholder());
            context
        };

        tracing::debug!(
            session_id = %self.session_id,
            context_len = context.len(),
            "Submitting question to answering collaborator"
        );

        let outcome = match self.agent.answer(&context).await {
            Ok(payload) => {
                let mut transcript = self.transcript.write().await;
                transcript.remove_placeholder();
                transcript.append(
                    Turn::assistant(payload.message)
                        .with_sources(payload.sources.unwrap_or_default())
                        .with_follow_ups(payload.follow_ups.unwrap_or_default()),
                );
                SubmitOutcome::Answered
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    error = %err,
                    "Answering collaborator call failed"
                );
                let mut transcript = self.transcript.write().await;
                transcript.remove_placeholder();
                SubmitOutcome::Failed {
                    notice: err.to_string(),
                }
            }
        };

        *self.awaiting.write().await = false;
        outcome
    }

    /// Re-asks the most recent user question.
    ///
    /// The most recent user turn and everything after it (the answer being
    /// replaced) are removed, then the question is resubmitted, so a
    /// successful regeneration leaves the transcript the same length with a
    /// fresh answer at the end. No-op when the transcript has no user turn
    /// or a call is in flight.
    pub async fn regenerate_last(&self) -> SubmitOutcome {
        if self.is_awaiting().await {
            return SubmitOutcome::Ignored;
        }

        let question = {
            let mut transcript = self.transcript.write().await;
            match transcript.rewind_to_last_user() {
                Some(question) => question,
                None => return SubmitOutcome::Ignored,
            }
        };

        self.set_draft(question).await;
        self.submit().await
    }

    /// Submits a follow-up suggestion as the next question.
    pub async fn select_follow_up(&self, suggestion: impl Into<String>) -> SubmitOutcome {
        self.set_draft(suggestion).await;
        self.submit().await
    }
}
