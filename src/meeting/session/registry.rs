//! Registry of live summarizers keyed by conversation.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::meeting::core::config::SummarizerConfig;
use crate::meeting::core::errors::SummarizerResult;
use crate::meeting::core::ids::ConversationId;
use crate::meeting::provider::completion::CompletionProvider;
use crate::meeting::provider::flags::HostedApiFlag;
use crate::meeting::session::options::MeetingOptions;
use crate::meeting::session::summarizer::MeetingSummarizer;

/// Concurrent map of per-conversation summarizers sharing one provider.
pub struct MeetingRegistry {
    config: SummarizerConfig,
    provider: Arc<dyn CompletionProvider>,
    flags: Arc<dyn HostedApiFlag>,
    meetings: DashMap<ConversationId, Arc<MeetingSummarizer>>,
}

impl MeetingRegistry {
    /// Create an empty registry.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: SummarizerConfig,
        provider: Arc<dyn CompletionProvider>,
        flags: Arc<dyn HostedApiFlag>,
    ) -> SummarizerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            provider,
            flags,
            meetings: DashMap::new(),
        })
    }

    /// Start (or restart) the session for a conversation and schedule its updates.
    pub async fn open(&self, options: MeetingOptions) -> Arc<MeetingSummarizer> {
        let conversation_id = options.conversation_id.clone();
        let summarizer = self
            .meetings
            .entry(conversation_id.clone())
            .or_insert_with(|| {
                Arc::new(MeetingSummarizer::from_validated(
                    self.config.clone(),
                    Arc::clone(&self.provider),
                    Arc::clone(&self.flags),
                ))
            })
            .clone();

        summarizer.start_meeting(options).await;
        summarizer.schedule_updates().await;
        info!(%conversation_id, active = self.meetings.len(), "Meeting opened");
        summarizer
    }

    /// Summarizer for a conversation, if open.
    #[must_use]
    pub fn get(&self, conversation_id: &ConversationId) -> Option<Arc<MeetingSummarizer>> {
        self.meetings
            .get(conversation_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Stop and remove a conversation's summarizer. Returns whether it was open.
    pub async fn close(&self, conversation_id: &ConversationId, flush: bool) -> bool {
        let Some((_, summarizer)) = self.meetings.remove(conversation_id) else {
            return false;
        };
        summarizer.stop_meeting(flush).await;
        info!(%conversation_id, flushed = flush, "Meeting closed");
        true
    }

    /// Number of open conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    /// Whether no conversation is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }
}
