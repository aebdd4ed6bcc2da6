use crate::config::IntentConfig;
use crate::error::IntentError;
use crate::prompts::CLASSIFY_SYSTEM_PROMPT;
use parley_types::{Classification, Turn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Timeout for a single chat-completions request.
const CHAT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sampling temperature for classification. Low, for stable labels.
const CLASSIFY_TEMPERATURE: f64 = 0.3;

/// Sampling temperature for reply generation.
const GENERATE_TEMPERATURE: f64 = 0.7;

/// Token cap keeping spoken replies short.
const GENERATE_MAX_TOKENS: u32 = 150;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the Azure OpenAI chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct IntentClient {
    config: IntentConfig,
    http: reqwest::Client,
}

impl IntentClient {
    pub fn new(config: IntentConfig) -> Result<Self, IntentError> {
        let http = reqwest::Client::builder().timeout(CHAT_TIMEOUT).build()?;
        Ok(Self { config, http })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Classifies a single user message. No history is passed: the
    /// label depends only on the message itself.
    pub async fn classify(&self, user_message: &str) -> Result<Classification, IntentError> {
        let body = json!({
            "messages": [
                {"role": "system", "content": CLASSIFY_SYSTEM_PROMPT},
                {"role": "user", "content": user_message},
            ],
            "temperature": CLASSIFY_TEMPERATURE,
            "response_format": {"type": "json_object"},
        });

        let content = self.complete(body).await?;
        let classification: Classification = serde_json::from_str(content.trim())
            .map_err(|e| IntentError::Malformed(format!("{e}: {content}")))?;

        tracing::info!(
            intent = classification.intent.as_str(),
            confidence = classification.confidence,
            "intent classified"
        );
        Ok(classification)
    }

    /// Generates a reply from a system instruction, the trailing
    /// history window, and the current user message (appended last).
    pub async fn generate(
        &self,
        system_prompt: &str,
        history: &[Turn],
        user_message: &str,
    ) -> Result<String, IntentError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(json!({"role": "system", "content": system_prompt}));
        for turn in history {
            messages.push(json!({"role": turn.role.as_str(), "content": turn.content}));
        }
        messages.push(json!({"role": "user", "content": user_message}));

        let body = json!({
            "messages": messages,
            "temperature": GENERATE_TEMPERATURE,
            "max_tokens": GENERATE_MAX_TOKENS,
        });

        let content = self.complete(body).await?;
        let reply = content.trim().to_string();
        tracing::info!(chars = reply.len(), "generated response");
        Ok(reply)
    }

    /// Posts one chat-completions request and extracts the first
    /// choice's message content.
    async fn complete(&self, body: Value) -> Result<String, IntentError> {
        if !self.config.is_configured() {
            return Err(IntentError::NotConfigured("azure openai"));
        }

        let response = self
            .http
            .post(self.config.chat_url())
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(IntentError::Provider {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| IntentError::Malformed(format!("{e}: {text}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| IntentError::Malformed("response contained no choices".to_string()))
    }
}
