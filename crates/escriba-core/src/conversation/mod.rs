//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `turn`: conversation turn types (`Role`, `Turn`)
//! - `transcript`: ordered turn sequencer (`Transcript`)
//! - `controller`: session controller and the answering-collaborator seam
//!   (`ConversationController`, `AnsweringAgent`, `AnswerPayload`)

mod controller;
mod transcript;
mod turn;

// Re-export public API
pub use controller::{
    AnswerPayload, AnsweringAgent, ChatMessage, ConversationController, SubmitOutcome,
};
pub use transcript::Transcript;
pub use turn::{Role, Turn};
