//! Identifier types for meeting conversations.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the conversation a summarizer session belongs to.
///
/// Callers usually already own a conversation id (from their chat store), so
/// any non-empty string is accepted. [`ConversationId::new`] mints a random
/// UUID-backed id for callers that do not.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Create a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for ConversationId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("conversation id must not be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(ConversationId::new(), ConversationId::new());
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(" ".parse::<ConversationId>().is_err());
        let id: ConversationId = " conv-1 ".parse().expect("valid id");
        assert_eq!(id.as_str(), "conv-1");
    }

    #[test]
    fn test_serde_transparent() {
        let id = ConversationId::from("abc");
        assert_eq!(serde_json::to_string(&id).expect("json"), "\"abc\"");
    }
}
