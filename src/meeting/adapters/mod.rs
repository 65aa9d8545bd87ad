//! Adapters bridging external LLM runtimes into the summarizer.

pub mod rig_adapter;

pub use rig_adapter::{RigOllamaProvider, init_tracing};
