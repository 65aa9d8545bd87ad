//! Options accepted when a meeting session starts.

use std::sync::Arc;

use crate::meeting::core::errors::SummarizerError;
use crate::meeting::core::ids::ConversationId;
use crate::meeting::core::summary::LiveSummaryData;
use crate::meeting::provider::request::MeetingAiConfig;

/// Provider configuration accessor, invoked fresh for every request.
pub type AiConfigSource = Arc<dyn Fn() -> MeetingAiConfig + Send + Sync>;
/// Called with the applied summary and its Unix-millisecond timestamp.
pub type SummaryCallback = Arc<dyn Fn(&LiveSummaryData, i64) + Send + Sync>;
/// Called when an update attempt fails.
pub type ErrorCallback = Arc<dyn Fn(&SummarizerError) + Send + Sync>;

/// Options for [`MeetingSummarizer::start_meeting`](super::MeetingSummarizer::start_meeting).
pub struct MeetingOptions {
    /// Conversation the session belongs to.
    pub conversation_id: ConversationId,
    /// Provider configuration accessor.
    pub ai_config: AiConfigSource,
    /// Previously saved summary to resume from.
    pub initial_summary: Option<LiveSummaryData>,
    /// Update-applied callback.
    pub on_summary_updated: Option<SummaryCallback>,
    /// Error callback.
    pub on_error: Option<ErrorCallback>,
}

impl MeetingOptions {
    /// Create options with no initial summary and no callbacks.
    #[must_use]
    pub fn new<F>(conversation_id: impl Into<ConversationId>, ai_config: F) -> Self
    where
        F: Fn() -> MeetingAiConfig + Send + Sync + 'static,
    {
        Self {
            conversation_id: conversation_id.into(),
            ai_config: Arc::new(ai_config),
            initial_summary: None,
            on_summary_updated: None,
            on_error: None,
        }
    }

    /// Resume from a previously saved summary.
    #[must_use]
    pub fn with_initial_summary(mut self, summary: LiveSummaryData) -> Self {
        self.initial_summary = Some(summary);
        self
    }

    /// Register the update-applied callback.
    #[must_use]
    pub fn on_summary_updated<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LiveSummaryData, i64) + Send + Sync + 'static,
    {
        self.on_summary_updated = Some(Arc::new(callback));
        self
    }

    /// Register the error callback.
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SummarizerError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }
}
