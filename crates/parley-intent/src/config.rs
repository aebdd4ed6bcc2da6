use serde::Deserialize;
use std::fmt;

fn default_deployment() -> String {
    "gpt-4".to_string()
}

fn default_api_version() -> String {
    "2024-12-01-preview".to_string()
}

/// Azure OpenAI chat-completions settings.
#[derive(Clone, Deserialize)]
pub struct IntentConfig {
    /// API key. Empty means the provider is unconfigured.
    #[serde(default)]
    pub api_key: String,

    /// Resource endpoint base (e.g. "https://myres.openai.azure.com").
    /// Empty means the provider is unconfigured.
    #[serde(default)]
    pub endpoint: String,

    /// Deployment name addressed in the URL path.
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// API version query parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            deployment: default_deployment(),
            api_version: default_api_version(),
        }
    }
}

impl fmt::Debug for IntentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl IntentConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.endpoint.is_empty()
    }

    /// The chat-completions URL for the configured deployment.
    pub fn chat_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_joins_endpoint_deployment_and_version() {
        let config = IntentConfig {
            endpoint: "https://myres.openai.azure.com/".to_string(),
            deployment: "gpt-4".to_string(),
            api_version: "2024-12-01-preview".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.chat_url(),
            "https://myres.openai.azure.com/openai/deployments/gpt-4/chat/completions?api-version=2024-12-01-preview"
        );
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = IntentConfig {
            api_key: "secret".to_string(),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
