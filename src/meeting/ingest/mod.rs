//! Delta ingestion, deduplication and sanitization.

pub mod dedupe;
pub mod delta_buffer;
pub mod sanitize;

pub use dedupe::{dedupe_action_items, dedupe_list, normalize_text};
pub use delta_buffer::{DeltaBuffer, DeltaSource};
pub use sanitize::{
    ListLimits, clip_list, coerce_summary, sanitize_summary, sanitize_summary_with,
};
