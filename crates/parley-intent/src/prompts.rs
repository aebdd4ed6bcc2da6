//! Fixed prompt templates for classification and response generation.

use parley_types::Intent;

/// System instruction for the classification call. The provider is asked
/// for a bare JSON object matching [`parley_types::Classification`].
pub const CLASSIFY_SYSTEM_PROMPT: &str = "\
You are an intent classifier. Classify user messages into one of these categories:
- question: User is asking for information or clarification
- complaint: User is expressing dissatisfaction or reporting an issue
- other: General conversation, greeting, or non-specific intent

Respond ONLY with a JSON object containing:
{
    \"intent\": \"question|complaint|other\",
    \"confidence\": <float between 0 and 1>,
    \"reasoning\": \"brief explanation\"
}";

const QUESTION_TEMPLATE: &str = "\
You are a helpful virtual assistant. The user has asked a question.
Provide a clear, concise, and helpful response. If you need more context, ask a follow-up question.
Be conversational and natural in your response.";

const COMPLAINT_TEMPLATE: &str = "\
You are an empathetic customer service assistant. The user has raised a complaint or concern.
Acknowledge their concern, show empathy, and offer to help resolve the issue.
Be warm, understanding, and professional in your response.";

const OTHER_TEMPLATE: &str = "\
You are a friendly and professional virtual assistant.
Engage naturally with the user. Keep responses brief and conversational.
If appropriate, you can ask how you can help them today.";

/// Selects the system instruction for a reply. The intent enum is
/// closed, so anything the classifier returned outside the known tags
/// has already collapsed to [`Intent::Other`] and lands on the neutral
/// template.
pub fn response_template(intent: Intent) -> &'static str {
    match intent {
        Intent::Question => QUESTION_TEMPLATE,
        Intent::Complaint => COMPLAINT_TEMPLATE,
        Intent::Other => OTHER_TEMPLATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_intent_selects_a_distinct_template() {
        let question = response_template(Intent::Question);
        let complaint = response_template(Intent::Complaint);
        let other = response_template(Intent::Other);
        assert_ne!(question, complaint);
        assert_ne!(complaint, other);
        assert_ne!(question, other);
    }
}
