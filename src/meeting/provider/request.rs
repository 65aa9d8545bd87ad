//! Provider selection and request types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a chat message sent to the provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// System instruction.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

impl ChatRole {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A prior message of the conversation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

/// User-configured provider and its variables (model name, keys, URLs).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProvider {
    /// Provider identifier.
    pub provider: String,
    /// Provider variables.
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl SelectedProvider {
    /// Look up a variable by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Provider configuration read fresh for every request.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAiConfig {
    /// Provider type, `None` when unset.
    pub provider: Option<String>,
    /// User-configured provider.
    pub selected_provider: SelectedProvider,
}

/// A single request to the text-generation provider.
///
/// `provider` is `None` when the built-in hosted API should serve the call.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    /// Provider type, `None` for the hosted API.
    pub provider: Option<String>,
    /// User-configured provider.
    pub selected_provider: SelectedProvider,
    /// System instruction.
    pub system_prompt: String,
    /// Prior conversation, oldest first.
    pub history: Vec<ChatMessage>,
    /// Message to answer.
    pub user_message: String,
}

impl ProviderRequest {
    /// Build a history-less request from the current provider configuration.
    #[must_use]
    pub fn single_shot(
        config: MeetingAiConfig,
        use_hosted_api: bool,
        system_prompt: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            provider: if use_hosted_api { None } else { config.provider },
            selected_provider: config.selected_provider,
            system_prompt: system_prompt.into(),
            history: Vec::new(),
            user_message: user_message.into(),
        }
    }

    /// Whether the hosted API should serve this request.
    #[must_use]
    pub const fn uses_hosted_api(&self) -> bool {
        self.provider.is_none()
    }
}
