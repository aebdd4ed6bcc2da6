//! Chat provider adapter for the Parley voice backend.
//!
//! Wraps the Azure OpenAI chat-completions endpoint behind two narrow
//! operations: classifying a user message into the intent taxonomy and
//! generating a reply conditioned on intent and trailing history. The
//! prompt templates that give each intent its response tone live in
//! [`prompts`].
//!
//! Calls run under a bounded timeout and fail as typed [`IntentError`]s;
//! the orchestrator pattern-matches and degrades rather than surfacing
//! provider failures to the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod prompts;

pub use client::IntentClient;
pub use config::IntentConfig;
pub use error::IntentError;
pub use prompts::response_template;
