//! Live meeting summarizer session.
//!
//! A [`MeetingSummarizer`] owns at most one active session: the buffered
//! deltas, the latest merged summary and the timing state. Updates run one at
//! a time behind an in-flight guard; the provider is called without holding
//! the session lock so reads and ingestion never wait on the network.

use std::sync::Arc;
use std::sync::Weak;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::meeting::core::config::SummarizerConfig;
use crate::meeting::core::errors::{SummarizerError, SummarizerResult};
use crate::meeting::core::ids::ConversationId;
use crate::meeting::core::summary::{LiveSummaryData, create_empty_summary};
use crate::meeting::ingest::delta_buffer::{DeltaBuffer, DeltaSource};
use crate::meeting::ingest::sanitize::{ListLimits, sanitize_summary_with};
use crate::meeting::parsing::summary_parser::parse_meeting_summary_with_repair_and_limits;
use crate::meeting::provider::completion::{CompletionProvider, collect_response};
use crate::meeting::provider::flags::HostedApiFlag;
use crate::meeting::provider::request::ProviderRequest;
use crate::meeting::schedule::policy::{SchedulePolicy, UpdateCheck};
use crate::meeting::session::options::{
    AiConfigSource, ErrorCallback, MeetingOptions, SummaryCallback,
};
use crate::meeting::session::prompts::{
    JSON_REPAIR_PROMPT, MEETING_SYSTEM_PROMPT, merge_message, repair_message,
};

/// Observable state of the active session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStatus {
    /// Conversation the session belongs to.
    pub conversation_id: ConversationId,
    /// Time of the last applied summary, if any.
    pub updated_at: Option<i64>,
    /// Buffered characters awaiting the next merge.
    pub pending_chars: usize,
    /// Whether an update is running.
    pub is_updating: bool,
}

struct MeetingSession {
    conversation_id: ConversationId,
    generation: u64,
    /// Bumped by `clear_summary` so in-flight merges of stale data are dropped.
    epoch: u64,
    ai_config: AiConfigSource,
    summary: LiveSummaryData,
    buffer: DeltaBuffer,
    last_update_at: i64,
    last_attempt_at: i64,
    on_summary_updated: Option<SummaryCallback>,
    on_error: Option<ErrorCallback>,
}

/// Snapshot taken when an update starts.
struct PendingUpdate {
    conversation_id: ConversationId,
    generation: u64,
    epoch: u64,
    ai_config: AiConfigSource,
    summary: LiveSummaryData,
    buffer: String,
}

struct SchedulerHandle {
    task: JoinHandle<()>,
    shutdown: Arc<Notify>,
}

/// Clears the in-flight marker on every exit path, unless `stop_meeting`
/// already handed it to a newer session.
struct InFlightGuard<'a> {
    flag: &'a AtomicU64,
    token: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let _ = self
            .flag
            .compare_exchange(self.token, 0, Ordering::SeqCst, Ordering::SeqCst);
    }
}

/// Live meeting summarizer owning one conversation session at a time.
pub struct MeetingSummarizer {
    config: SummarizerConfig,
    policy: SchedulePolicy,
    limits: ListLimits,
    provider: Arc<dyn CompletionProvider>,
    flags: Arc<dyn HostedApiFlag>,
    session: Mutex<Option<MeetingSession>>,
    /// Generation of the session whose update is running, 0 when idle.
    in_flight: AtomicU64,
    generations: AtomicU64,
    scheduler: Mutex<Option<SchedulerHandle>>,
}

impl MeetingSummarizer {
    /// Create a summarizer with no active session.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: SummarizerConfig,
        provider: Arc<dyn CompletionProvider>,
        flags: Arc<dyn HostedApiFlag>,
    ) -> SummarizerResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config, provider, flags))
    }

    pub(crate) fn from_validated(
        config: SummarizerConfig,
        provider: Arc<dyn CompletionProvider>,
        flags: Arc<dyn HostedApiFlag>,
    ) -> Self {
        let limits = ListLimits {
            summary: config.summary_max,
            decisions: config.decisions_max,
            action_items: config.action_items_max,
        };
        Self {
            policy: SchedulePolicy::from_config(&config),
            limits,
            config,
            provider,
            flags,
            session: Mutex::new(None),
            in_flight: AtomicU64::new(0),
            generations: AtomicU64::new(0),
            scheduler: Mutex::new(None),
        }
    }

    /// Start a session, replacing any existing one without flushing it.
    ///
    /// A saved summary is sanitized and adopted; otherwise the session starts
    /// empty. The buffer and timestamps are reset.
    pub async fn start_meeting(&self, options: MeetingOptions) {
        let summary = options.initial_summary.map_or_else(create_empty_summary, |saved| {
            sanitize_summary_with(saved, self.limits)
        });
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;

        let mut guard = self.session.lock().await;
        if let Some(previous) = guard.as_ref() {
            debug!(
                previous = %previous.conversation_id,
                "Replacing active meeting session"
            );
        }
        info!(
            conversation_id = %options.conversation_id,
            resumed = !summary.is_empty(),
            "Meeting session started"
        );
        *guard = Some(MeetingSession {
            conversation_id: options.conversation_id,
            generation,
            epoch: 0,
            ai_config: options.ai_config,
            summary,
            buffer: DeltaBuffer::new(self.config.max_delta_chars),
            last_update_at: 0,
            last_attempt_at: 0,
            on_summary_updated: options.on_summary_updated,
            on_error: options.on_error,
        });
    }

    /// Stop the session, optionally forcing one final update first.
    ///
    /// Cancels the scheduler and resets the in-flight guard. Safe to call
    /// without an active session.
    pub async fn stop_meeting(&self, flush: bool) {
        if flush {
            self.tick(true).await;
        }
        let previous = self.session.lock().await.take();
        self.stop_scheduler().await;
        self.in_flight.store(0, Ordering::SeqCst);

        if let Some(session) = previous {
            info!(
                conversation_id = %session.conversation_id,
                flushed = flush,
                "Meeting session stopped"
            );
        }
    }

    /// Reset the summary and buffer, then report the empty summary.
    pub async fn clear_summary(&self) {
        let (callback, cleared, updated_at) = {
            let mut guard = self.session.lock().await;
            let Some(session) = guard.as_mut() else {
                return;
            };
            session.summary = create_empty_summary();
            session.buffer.clear();
            session.epoch += 1;
            session.last_update_at = now_ms();
            debug!(conversation_id = %session.conversation_id, "Meeting summary cleared");
            (
                session.on_summary_updated.clone(),
                session.summary.clone(),
                session.last_update_at,
            )
        };

        if let Some(callback) = callback {
            callback(&cleared, updated_at);
        }
    }

    /// Buffer a text fragment. Ignored without a session or for blank text.
    pub async fn ingest_delta(&self, text: &str, source: DeltaSource) {
        let mut guard = self.session.lock().await;
        let Some(session) = guard.as_mut() else {
            return;
        };
        if session.buffer.push(text, source) {
            debug!(
                %source,
                pending_chars = session.buffer.char_len(),
                "Buffered meeting delta"
            );
        }
    }

    /// Buffer text recognized on a screen capture.
    pub async fn maybe_ingest_screenshot_text(&self, text: &str) {
        self.ingest_delta(text, DeltaSource::Ocr).await;
    }

    /// Copy of the current summary, or `None` without a session.
    ///
    /// Never waits for an in-flight update; it may return the pre-update
    /// snapshot.
    pub async fn get_current_summary(&self) -> Option<LiveSummaryData> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|session| session.summary.clone())
    }

    /// Status of the active session, or `None` without a session.
    pub async fn status(&self) -> Option<SessionStatus> {
        let is_updating = self.in_flight.load(Ordering::SeqCst) != 0;
        self.session.lock().await.as_ref().map(|session| SessionStatus {
            conversation_id: session.conversation_id.clone(),
            updated_at: (session.last_update_at > 0).then_some(session.last_update_at),
            pending_chars: session.buffer.char_len(),
            is_updating,
        })
    }

    /// Run one update if one is due.
    ///
    /// No-op without a session or while another update runs. Failures are
    /// reported through the error callback and never returned: the buffer is
    /// kept so the next tick retries.
    pub async fn tick(&self, force: bool) {
        let Some(pending) = self.begin_update(force).await else {
            return;
        };
        let _guard = InFlightGuard {
            flag: &self.in_flight,
            token: pending.generation,
        };

        let started = Instant::now();
        let result = self.run_update(&pending).await;
        self.finish_update(pending, result, started.elapsed()).await;
    }

    /// Start the background poll loop if it is not already running.
    ///
    /// The loop only holds a weak reference; it ends when the summarizer is
    /// dropped or the session stops.
    pub async fn schedule_updates(self: &Arc<Self>) {
        let mut slot = self.scheduler.lock().await;
        if slot.as_ref().is_some_and(|handle| !handle.task.is_finished()) {
            debug!("Summary scheduler already running");
            return;
        }

        let period = Duration::from_millis(self.config.poll_interval_ms);
        let shutdown = Arc::new(Notify::new());
        let signal = Arc::clone(&shutdown);
        let summarizer: Weak<Self> = Arc::downgrade(self);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let Some(summarizer) = summarizer.upgrade() else {
                            break;
                        };
                        summarizer.tick(false).await;
                    }
                    () = signal.notified() => {
                        debug!("Summary scheduler shutting down");
                        break;
                    }
                }
            }
        });

        info!(?period, "Summary scheduler started");
        *slot = Some(SchedulerHandle { task, shutdown });
    }

    /// Whether the background poll loop is running.
    pub async fn is_scheduled(&self) -> bool {
        self.scheduler
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.task.is_finished())
    }

    async fn stop_scheduler(&self) {
        if let Some(handle) = self.scheduler.lock().await.take() {
            handle.shutdown.notify_one();
        }
    }

    /// Check the guard and the policy, then mark the attempt.
    async fn begin_update(&self, force: bool) -> Option<PendingUpdate> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut()?;
        if self.in_flight.load(Ordering::SeqCst) != 0 {
            debug!("Summary update already in flight");
            return None;
        }

        let buffer = session.buffer.snapshot();
        let now = now_ms();
        let check = UpdateCheck {
            now,
            last_attempt_at: session.last_attempt_at,
            last_update_at: session.last_update_at,
            buffer_length: buffer.chars().count(),
            force,
        };
        if !self.policy.is_due(check) {
            return None;
        }

        session.last_attempt_at = now;
        self.in_flight.store(session.generation, Ordering::SeqCst);

        Some(PendingUpdate {
            conversation_id: session.conversation_id.clone(),
            generation: session.generation,
            epoch: session.epoch,
            ai_config: Arc::clone(&session.ai_config),
            summary: session.summary.clone(),
            buffer,
        })
    }

    async fn run_update(&self, pending: &PendingUpdate) -> SummarizerResult<LiveSummaryData> {
        debug!(
            conversation_id = %pending.conversation_id,
            pending_chars = pending.buffer.chars().count(),
            "Requesting summary merge"
        );
        let summary_json = serde_json::to_string(&pending.summary)?;
        let raw = self
            .request(
                &pending.ai_config,
                MEETING_SYSTEM_PROMPT,
                merge_message(&summary_json, &pending.buffer),
            )
            .await?;

        let parsed = parse_meeting_summary_with_repair_and_limits(&raw, self.limits, |broken| {
            self.request_repair(&pending.ai_config, broken)
        })
        .await?;
        parsed.ok_or(SummarizerError::ParseFailure)
    }

    async fn request_repair(
        &self,
        ai_config: &AiConfigSource,
        raw: String,
    ) -> SummarizerResult<Option<String>> {
        info!(raw_len = raw.len(), "Requesting JSON repair");
        let repaired = self
            .request(ai_config, JSON_REPAIR_PROMPT, repair_message(&raw))
            .await?;
        Ok((!repaired.trim().is_empty()).then_some(repaired))
    }

    /// Send one single-shot request, re-reading the provider configuration.
    async fn request(
        &self,
        ai_config: &AiConfigSource,
        system_prompt: &str,
        user_message: String,
    ) -> SummarizerResult<String> {
        let request = ProviderRequest::single_shot(
            ai_config(),
            self.flags.use_hosted_api().await,
            system_prompt,
            user_message,
        );
        collect_response(self.provider.stream_completion(request)).await
    }

    async fn finish_update(
        &self,
        pending: PendingUpdate,
        result: SummarizerResult<LiveSummaryData>,
        elapsed: Duration,
    ) {
        let mut guard = self.session.lock().await;
        let Some(session) = guard
            .as_mut()
            .filter(|session| session.generation == pending.generation)
        else {
            debug!(
                conversation_id = %pending.conversation_id,
                "Session ended during update, discarding result"
            );
            return;
        };

        match result {
            Ok(summary) => {
                if session.epoch != pending.epoch {
                    debug!(
                        conversation_id = %pending.conversation_id,
                        "Summary cleared during update, discarding merge"
                    );
                    return;
                }
                session.summary = summary.clone();
                session.buffer.clear();
                session.last_update_at = now_ms();
                let updated_at = session.last_update_at;
                let callback = session.on_summary_updated.clone();
                drop(guard);

                info!(
                    conversation_id = %pending.conversation_id,
                    bullets = summary.summary.len(),
                    decisions = summary.decisions.len(),
                    action_items = summary.action_items.len(),
                    ?elapsed,
                    "Meeting summary updated"
                );
                if let Some(callback) = callback {
                    callback(&summary, updated_at);
                }
            }
            Err(err) => {
                let callback = session.on_error.clone();
                drop(guard);

                warn!(
                    conversation_id = %pending.conversation_id,
                    %err,
                    "Meeting summary update failed"
                );
                if let Some(callback) = callback {
                    callback(&err);
                }
            }
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::meeting::core::config::SummarizerConfigBuilder;
    use crate::meeting::core::summary::ActionItem;
    use crate::meeting::provider::flags::{LocalFlagStore, StaticFlag};
    use crate::meeting::provider::request::{MeetingAiConfig, SelectedProvider};
    use crate::meeting::session::testing::ScriptedProvider;

    const MERGED: &str = r#"{"summary":["Budget reviewed"],"decisions":["Ship v2"],"actionItems":[{"text":"Send notes","owner":"Ana"}]}"#;

    fn ai_config() -> MeetingAiConfig {
        MeetingAiConfig {
            provider: Some("ollama".to_string()),
            selected_provider: SelectedProvider {
                provider: "ollama".to_string(),
                variables: std::collections::HashMap::new(),
            },
        }
    }

    fn summarizer(provider: Arc<ScriptedProvider>) -> Arc<MeetingSummarizer> {
        Arc::new(
            MeetingSummarizer::new(SummarizerConfig::default(), provider, Arc::new(StaticFlag(false)))
                .expect("valid config"),
        )
    }

    #[derive(Default)]
    struct Recorder {
        updates: StdMutex<Vec<(LiveSummaryData, i64)>>,
        errors: StdMutex<Vec<String>>,
    }

    fn options(recorder: &Arc<Recorder>) -> MeetingOptions {
        let on_update = Arc::clone(recorder);
        let on_error = Arc::clone(recorder);
        MeetingOptions::new("conv-1", ai_config)
            .on_summary_updated(move |summary, at| {
                on_update
                    .updates
                    .lock()
                    .expect("lock")
                    .push((summary.clone(), at));
            })
            .on_error(move |err| {
                on_error.errors.lock().expect("lock").push(err.to_string());
            })
    }

    #[tokio::test]
    async fn test_no_session_is_noop() {
        let provider = Arc::new(ScriptedProvider::ok(&[MERGED]));
        let summarizer = summarizer(Arc::clone(&provider));

        summarizer.ingest_delta("hello", DeltaSource::Audio).await;
        summarizer.tick(true).await;
        summarizer.clear_summary().await;
        summarizer.stop_meeting(true).await;

        assert!(summarizer.get_current_summary().await.is_none());
        assert!(summarizer.status().await.is_none());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_start_sanitizes_initial_summary() {
        let provider = Arc::new(ScriptedProvider::default());
        let summarizer = summarizer(provider);
        let saved = LiveSummaryData {
            summary: vec![" Intro ".to_string(), "intro!".to_string()],
            decisions: Vec::new(),
            action_items: vec![ActionItem::new("  ")],
        };

        summarizer
            .start_meeting(MeetingOptions::new("conv-1", ai_config).with_initial_summary(saved))
            .await;

        let current = summarizer.get_current_summary().await.expect("session");
        assert_eq!(current.summary, vec!["Intro"]);
        assert!(current.action_items.is_empty());
    }

    #[tokio::test]
    async fn test_tick_applies_merge_and_clears_buffer() {
        let provider = Arc::new(ScriptedProvider::ok(&[MERGED]));
        let summarizer = summarizer(Arc::clone(&provider));
        let recorder = Arc::new(Recorder::default());
        summarizer.start_meeting(options(&recorder)).await;

        summarizer.ingest_delta("We reviewed the budget", DeltaSource::Audio).await;
        summarizer.maybe_ingest_screenshot_text("Slide: v2 launch").await;
        summarizer.tick(false).await;

        let current = summarizer.get_current_summary().await.expect("session");
        assert_eq!(current.summary, vec!["Budget reviewed"]);
        assert_eq!(current.action_items[0].owner.as_deref(), Some("Ana"));

        let status = summarizer.status().await.expect("session");
        assert_eq!(status.pending_chars, 0);
        assert!(status.updated_at.is_some());
        assert!(!status.is_updating);

        let updates = recorder.updates.lock().expect("lock");
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, current);
        assert!(recorder.errors.lock().expect("lock").is_empty());

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt, MEETING_SYSTEM_PROMPT);
        assert!(requests[0].history.is_empty());
        assert!(requests[0].user_message.contains("[AUDIO] We reviewed the budget"));
        assert!(requests[0].user_message.contains("[OCR] Slide: v2 launch"));
        assert!(requests[0].user_message.contains(r#""actionItems":[]"#));
    }

    #[tokio::test]
    async fn test_empty_buffer_never_requests() {
        let provider = Arc::new(ScriptedProvider::ok(&[MERGED]));
        let summarizer = summarizer(Arc::clone(&provider));
        summarizer
            .start_meeting(MeetingOptions::new("conv-1", ai_config))
            .await;

        summarizer.ingest_delta("   ", DeltaSource::User).await;
        summarizer.tick(true).await;

        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_repair_path_applies_repaired_json() {
        let truncated = r#"{"summary":["A"],"decisions":["B"],"actionItems":[{"text":"C"}]"#;
        let fixed = r#"{"summary":["A"],"decisions":["B"],"actionItems":[{"text":"C"}]}"#;
        let provider = Arc::new(ScriptedProvider::ok(&[truncated, fixed]));
        let summarizer = summarizer(Arc::clone(&provider));
        summarizer
            .start_meeting(MeetingOptions::new("conv-1", ai_config))
            .await;

        summarizer.ingest_delta("notes", DeltaSource::User).await;
        summarizer.tick(false).await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].system_prompt, JSON_REPAIR_PROMPT);
        assert!(requests[1].user_message.starts_with("Fix this JSON:\n"));
        let current = summarizer.get_current_summary().await.expect("session");
        assert_eq!(current.decisions, vec!["B"]);
    }

    #[tokio::test]
    async fn test_parse_failure_keeps_buffer_and_reports() {
        let provider = Arc::new(ScriptedProvider::ok(&["not json", ""]));
        let summarizer = summarizer(Arc::clone(&provider));
        let recorder = Arc::new(Recorder::default());
        summarizer.start_meeting(options(&recorder)).await;

        summarizer.ingest_delta("keep me", DeltaSource::Audio).await;
        summarizer.tick(false).await;

        assert_eq!(provider.call_count(), 2);
        let errors = recorder.errors.lock().expect("lock").clone();
        assert_eq!(errors, vec![SummarizerError::ParseFailure.to_string()]);
        assert!(recorder.updates.lock().expect("lock").is_empty());

        let status = summarizer.status().await.expect("session");
        assert_eq!(status.pending_chars, "[AUDIO] keep me".chars().count());
        assert!(!status.is_updating);
        assert_eq!(summarizer.get_current_summary().await, Some(create_empty_summary()));

        // cooldown applies after a failed attempt
        summarizer.tick(false).await;
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_provider_error_reported_and_guard_released() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(SummarizerError::Provider("connection refused".to_string())),
            Ok(MERGED.to_string()),
        ]));
        let summarizer = summarizer(Arc::clone(&provider));
        let recorder = Arc::new(Recorder::default());
        summarizer.start_meeting(options(&recorder)).await;

        summarizer.ingest_delta("hello", DeltaSource::Audio).await;
        summarizer.tick(false).await;

        let errors = recorder.errors.lock().expect("lock").clone();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("connection refused"));
        assert!(!summarizer.status().await.expect("session").is_updating);

        // forced retry goes through once the guard is released
        summarizer.tick(true).await;
        assert_eq!(provider.call_count(), 2);
        assert_eq!(recorder.updates.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_ticks_apply_once() {
        let gate = Arc::new(Notify::new());
        let provider = Arc::new(
            ScriptedProvider::ok(&[MERGED, MERGED]).with_gate(Arc::clone(&gate)),
        );
        let summarizer = summarizer(Arc::clone(&provider));
        let recorder = Arc::new(Recorder::default());
        summarizer.start_meeting(options(&recorder)).await;
        summarizer.ingest_delta("first", DeltaSource::Audio).await;

        let first = {
            let summarizer = Arc::clone(&summarizer);
            tokio::spawn(async move { summarizer.tick(false).await })
        };
        provider.started.notified().await;
        assert!(summarizer.status().await.expect("session").is_updating);

        // reads are not blocked while the merge is pending
        assert_eq!(summarizer.get_current_summary().await, Some(create_empty_summary()));

        summarizer.tick(true).await;
        assert_eq!(provider.call_count(), 1);

        gate.notify_one();
        first.await.expect("tick task");

        assert_eq!(provider.call_count(), 1);
        assert_eq!(recorder.updates.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn test_clear_reports_empty_summary() {
        let provider = Arc::new(ScriptedProvider::ok(&[MERGED]));
        let summarizer = summarizer(provider);
        let recorder = Arc::new(Recorder::default());
        summarizer.start_meeting(options(&recorder)).await;
        summarizer.ingest_delta("something", DeltaSource::Audio).await;
        summarizer.tick(false).await;

        summarizer.ingest_delta("more", DeltaSource::Audio).await;
        summarizer.clear_summary().await;

        let updates = recorder.updates.lock().expect("lock");
        assert_eq!(updates.len(), 2);
        assert!(updates[1].0.is_empty());
        drop(updates);
        assert_eq!(summarizer.status().await.expect("session").pending_chars, 0);
    }

    #[tokio::test]
    async fn test_clear_during_update_discards_merge() {
        let gate = Arc::new(Notify::new());
        let provider = Arc::new(ScriptedProvider::ok(&[MERGED]).with_gate(Arc::clone(&gate)));
        let summarizer = summarizer(Arc::clone(&provider));
        summarizer
            .start_meeting(MeetingOptions::new("conv-1", ai_config))
            .await;
        summarizer.ingest_delta("stale", DeltaSource::Audio).await;

        let pending = {
            let summarizer = Arc::clone(&summarizer);
            tokio::spawn(async move { summarizer.tick(false).await })
        };
        provider.started.notified().await;
        summarizer.clear_summary().await;
        gate.notify_one();
        pending.await.expect("tick task");

        assert_eq!(summarizer.get_current_summary().await, Some(create_empty_summary()));
    }

    #[tokio::test]
    async fn test_stop_with_flush_forces_final_update() {
        let provider = Arc::new(ScriptedProvider::ok(&[MERGED, MERGED]));
        let summarizer = summarizer(Arc::clone(&provider));
        let recorder = Arc::new(Recorder::default());
        summarizer.start_meeting(options(&recorder)).await;

        summarizer.ingest_delta("a", DeltaSource::Audio).await;
        summarizer.tick(false).await;
        summarizer.ingest_delta("last words", DeltaSource::Audio).await;
        // inside the cooldown, only the forced flush can run
        summarizer.tick(false).await;
        assert_eq!(provider.call_count(), 1);

        summarizer.stop_meeting(true).await;
        assert_eq!(provider.call_count(), 2);
        assert_eq!(recorder.updates.lock().expect("lock").len(), 2);
        assert!(recorder.errors.lock().expect("lock").is_empty());
        assert!(summarizer.get_current_summary().await.is_none());
        assert!(summarizer.status().await.is_none());
    }

    #[tokio::test]
    async fn test_restart_replaces_session() {
        let provider = Arc::new(ScriptedProvider::default());
        let summarizer = summarizer(provider);
        summarizer
            .start_meeting(MeetingOptions::new("conv-1", ai_config))
            .await;
        summarizer.ingest_delta("old", DeltaSource::Audio).await;
        summarizer
            .start_meeting(MeetingOptions::new("conv-2", ai_config))
            .await;

        let status = summarizer.status().await.expect("session");
        assert_eq!(status.conversation_id.as_str(), "conv-2");
        assert_eq!(status.pending_chars, 0);
    }

    #[tokio::test]
    async fn test_config_accessor_read_per_request() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let provider = Arc::new(ScriptedProvider::ok(&["garbage", MERGED]));
        let summarizer = summarizer(Arc::clone(&provider));
        summarizer
            .start_meeting(MeetingOptions::new("conv-1", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                ai_config()
            }))
            .await;

        summarizer.ingest_delta("x", DeltaSource::User).await;
        summarizer.tick(false).await;

        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_hosted_flag_clears_provider() {
        let provider = Arc::new(ScriptedProvider::ok(&[MERGED]));
        let summarizer = Arc::new(
            MeetingSummarizer::new(
                SummarizerConfig::default(),
                Arc::clone(&provider) as Arc<dyn CompletionProvider>,
                Arc::new(StaticFlag(true)),
            )
            .expect("valid config"),
        );
        summarizer
            .start_meeting(MeetingOptions::new("conv-1", ai_config))
            .await;
        summarizer.ingest_delta("x", DeltaSource::User).await;
        summarizer.tick(false).await;

        assert!(provider.requests()[0].uses_hosted_api());
    }

    #[tokio::test]
    async fn test_flag_store_toggle_read_per_request() {
        let path = std::env::temp_dir().join(format!(
            "live-summary-session-flags-{}.json",
            uuid::Uuid::new_v4()
        ));
        tokio::fs::write(&path, r#"{"hosted_api_enabled":false}"#)
            .await
            .expect("write flags");
        let provider = Arc::new(ScriptedProvider::ok(&[MERGED, MERGED]));
        let summarizer = Arc::new(
            MeetingSummarizer::new(
                SummarizerConfig::default(),
                Arc::clone(&provider) as Arc<dyn CompletionProvider>,
                Arc::new(LocalFlagStore::new(path.clone())),
            )
            .expect("valid config"),
        );
        summarizer
            .start_meeting(MeetingOptions::new("conv-1", ai_config))
            .await;

        summarizer.ingest_delta("local first", DeltaSource::Audio).await;
        summarizer.tick(false).await;
        tokio::fs::write(&path, r#"{"hosted_api_enabled":"true"}"#)
            .await
            .expect("rewrite flags");
        summarizer.ingest_delta("hosted next", DeltaSource::Audio).await;
        summarizer.tick(true).await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].uses_hosted_api());
        assert!(requests[1].uses_hosted_api());
    }

    #[tokio::test]
    async fn test_scheduler_polls_and_stops() {
        let provider = Arc::new(ScriptedProvider::ok(&[MERGED]));
        let config = SummarizerConfigBuilder::new()
            .poll_interval_ms(20)
            .build()
            .expect("valid config");
        let summarizer = Arc::new(
            MeetingSummarizer::new(
                config,
                Arc::clone(&provider) as Arc<dyn CompletionProvider>,
                Arc::new(StaticFlag(false)),
            )
            .expect("valid config"),
        );
        summarizer
            .start_meeting(MeetingOptions::new("conv-1", ai_config))
            .await;
        summarizer.ingest_delta("scheduled", DeltaSource::Audio).await;

        summarizer.schedule_updates().await;
        summarizer.schedule_updates().await;
        assert!(summarizer.is_scheduled().await);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(provider.call_count(), 1);

        summarizer.stop_meeting(false).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!summarizer.is_scheduled().await);
    }
}
