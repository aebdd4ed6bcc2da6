//! Shared types for the Parley voice backend.
//!
//! This crate provides the foundational types used across all Parley
//! crates: conversation roles and turns, the intent taxonomy, and the
//! classification result returned by the intent provider.
//!
//! No crate in the workspace depends on anything *except* `parley-types`
//! for cross-cutting type definitions. This keeps the dependency graph
//! clean and prevents circular dependencies.

use serde::{Deserialize, Deserializer, Serialize};

/// Session identifier used when a client does not supply one.
///
/// All anonymous clients share this id, and therefore share conversation
/// and transcript state. That is the wire contract, not an isolation
/// guarantee — clients that need isolation must send their own id.
pub const DEFAULT_SESSION_ID: &str = "default";

/// The speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human on the other end of the call.
    User,
    /// The generated reply.
    Assistant,
}

impl Role {
    /// Returns the wire label for this role, as chat providers expect it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message exchange unit in a conversation, tagged with its speaker.
///
/// Turns are append-only; insertion order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Coarse classification of a user message, driving response tone.
///
/// This is a closed set: any tag the provider returns outside the known
/// ones deserializes to [`Intent::Other`], so downstream prompt selection
/// never sees an unrecognized intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// The user is asking for information or clarification.
    Question,
    /// The user is expressing dissatisfaction or reporting an issue.
    Complaint,
    /// General conversation, greeting, or non-specific intent.
    #[default]
    Other,
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The default arm is deliberate: classifiers drift, and an
        // unrecognized tag must land on the neutral intent rather than
        // fail the turn.
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "question" => Self::Question,
            "complaint" => Self::Complaint,
            _ => Self::Other,
        })
    }
}

impl Intent {
    /// Returns the wire label for this intent.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Complaint => "complaint",
            Self::Other => "other",
        }
    }
}

/// The result of classifying a single user message.
///
/// Produced per message and returned to the client; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    /// Provider-reported confidence in `[0, 1]`. Trusted as returned;
    /// `0.0` only when classification was unavailable.
    pub confidence: f32,
    /// Brief provider explanation, or a description of the failure when
    /// classification was unavailable.
    pub reasoning: String,
}

impl Classification {
    /// The degraded classification used when the provider cannot be
    /// reached or returns garbage. The turn still proceeds with the
    /// neutral prompt template.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            intent: Intent::Other,
            confidence: 0.0,
            reasoning: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_round_trips_known_tags() {
        for (intent, tag) in [
            (Intent::Question, "\"question\""),
            (Intent::Complaint, "\"complaint\""),
            (Intent::Other, "\"other\""),
        ] {
            assert_eq!(serde_json::to_string(&intent).unwrap(), tag);
            assert_eq!(serde_json::from_str::<Intent>(tag).unwrap(), intent);
        }
    }

    #[test]
    fn unrecognized_intent_tag_falls_back_to_other() {
        let intent: Intent = serde_json::from_str("\"escalation\"").unwrap();
        assert_eq!(intent, Intent::Other);
    }

    #[test]
    fn classification_parses_provider_json() {
        let parsed: Classification = serde_json::from_str(
            r#"{"intent": "complaint", "confidence": 0.92, "reasoning": "reports a billing issue"}"#,
        )
        .unwrap();
        assert_eq!(parsed.intent, Intent::Complaint);
        assert!((parsed.confidence - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn unavailable_classification_defaults_to_other_with_zero_confidence() {
        let fallback = Classification::unavailable("provider timed out");
        assert_eq!(fallback.intent, Intent::Other);
        assert_eq!(fallback.confidence, 0.0);
        assert_eq!(fallback.reasoning, "provider timed out");
    }

    #[test]
    fn turn_constructors_tag_roles() {
        assert_eq!(Turn::user("hi").role, Role::User);
        assert_eq!(Turn::assistant("hello").role, Role::Assistant);
    }
}
