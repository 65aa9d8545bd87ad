//! Session lifecycle: the summarizer, its options and the multi-meeting registry.

pub mod options;
pub mod prompts;
pub mod registry;
pub mod summarizer;

#[cfg(test)]
mod testing;

pub use options::{AiConfigSource, ErrorCallback, MeetingOptions, SummaryCallback};
pub use prompts::{JSON_REPAIR_PROMPT, MEETING_SYSTEM_PROMPT};
pub use registry::MeetingRegistry;
pub use summarizer::{MeetingSummarizer, SessionStatus};
