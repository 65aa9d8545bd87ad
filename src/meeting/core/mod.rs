//! Core meeting types: configuration, errors, identifiers and the summary model.

pub mod config;
pub mod errors;
pub mod ids;
pub mod summary;

pub use config::{LlmConfig, MeetingConfig, SummarizerConfig, SummarizerConfigBuilder};
pub use errors::{SummarizerError, SummarizerResult};
pub use ids::ConversationId;
pub use summary::{ActionItem, ActionStatus, LiveSummaryData, create_empty_summary};
