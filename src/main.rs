//! Binary entrypoint for the live meeting summarizer demo.

use std::process::ExitCode;

use live_summary::start_live_summary;

/// Summarize meeting text piped on stdin with a local Ollama model.
fn main() -> ExitCode {
    start_live_summary::run()
}
