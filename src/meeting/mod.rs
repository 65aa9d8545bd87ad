//! Live meeting summarizer.
//!
//! Maintains a rolling structured summary of a meeting while it happens:
//! - `core`: Configuration, errors, IDs and the summary model
//! - `ingest`: Delta buffering, deduplication and sanitization
//! - `parsing`: JSON extraction from model output and the repair fallback
//! - `schedule`: When an update is due
//! - `provider`: Completion provider seam, request shape and hosted-API flag
//! - `session`: The per-meeting summarizer and the multi-meeting registry
//! - `adapters`: Integration adapters (e.g., Rig with Ollama)

pub mod adapters;
pub mod core;
pub mod ingest;
pub mod parsing;
pub mod provider;
pub mod schedule;
pub mod session;

// Re-export commonly used types for convenience
pub use adapters::{RigOllamaProvider, init_tracing};
pub use core::{
    ActionItem, ActionStatus, ConversationId, LiveSummaryData, LlmConfig, MeetingConfig,
    SummarizerConfig, SummarizerConfigBuilder, SummarizerError, SummarizerResult,
    create_empty_summary,
};
pub use ingest::{DeltaBuffer, DeltaSource, ListLimits, dedupe_list, normalize_text, sanitize_summary};
pub use parsing::{
    extract_json_block, parse_meeting_summary, parse_meeting_summary_with_repair,
};
pub use provider::{
    ChunkStream, CompletionProvider, HostedApiFlag, LocalFlagStore, MeetingAiConfig,
    ProviderRequest, SelectedProvider, StaticFlag, collect_response,
};
pub use schedule::{SchedulePolicy, UpdateCheck, should_update_summary};
pub use session::{MeetingOptions, MeetingRegistry, MeetingSummarizer, SessionStatus};
