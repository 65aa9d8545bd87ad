//! Startup helpers for the `live-summary` command-line demo.
//!
//! Reads meeting text from stdin, one fragment per line. A line starting with
//! `ocr:` or `user:` is tagged with that source; anything else is treated as
//! audio transcript. Each applied summary is printed to stdout and the session
//! is flushed when stdin closes.

use std::collections::HashMap;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::DateTime;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::meeting::adapters::{RigOllamaProvider, init_tracing};
use crate::meeting::core::{ConversationId, LiveSummaryData, MeetingConfig, SummarizerResult};
use crate::meeting::ingest::DeltaSource;
use crate::meeting::provider::{
    CompletionProvider, HostedApiFlag, LocalFlagStore, MeetingAiConfig, SelectedProvider,
    StaticFlag,
};
use crate::meeting::session::{MeetingOptions, MeetingSummarizer};

const PROVIDER_NAME: &str = "ollama";

/// Run one summarization session over stdin.
///
/// # Returns
/// `ExitCode::SUCCESS` once stdin is exhausted, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();
    tracing::info!("Starting live summary v{}", env!("CARGO_PKG_VERSION"));

    let config = match MeetingConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(run_session(config)) {
        tracing::error!("Session error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

async fn run_session(config: MeetingConfig) -> SummarizerResult<()> {
    let provider: Arc<dyn CompletionProvider> = Arc::new(RigOllamaProvider::new(&config.llm)?);
    let flags: Arc<dyn HostedApiFlag> = match &config.flags_path {
        Some(path) => Arc::new(LocalFlagStore::new(path.clone())),
        None => Arc::new(StaticFlag(false)),
    };
    let summarizer = Arc::new(MeetingSummarizer::new(
        config.summarizer.clone(),
        provider,
        flags,
    )?);

    let model = config.llm.model.clone();
    let conversation_id = ConversationId::new();
    tracing::info!(%conversation_id, %model, "Listening on stdin");

    let options = MeetingOptions::new(conversation_id, move || ollama_config(&model))
        .on_summary_updated(print_summary)
        .on_error(|err| {
            let _ = writeln!(std::io::stderr().lock(), "summary update failed: {err}");
        });
    summarizer.start_meeting(options).await;
    summarizer.schedule_updates().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (source, text) = parse_line(&line);
        summarizer.ingest_delta(text, source).await;
    }

    summarizer.stop_meeting(true).await;
    Ok(())
}

fn ollama_config(model: &str) -> MeetingAiConfig {
    MeetingAiConfig {
        provider: Some(PROVIDER_NAME.to_string()),
        selected_provider: SelectedProvider {
            provider: PROVIDER_NAME.to_string(),
            variables: HashMap::from([("model".to_string(), model.to_string())]),
        },
    }
}

/// Split an input line into its source tag and text.
fn parse_line(line: &str) -> (DeltaSource, &str) {
    if let Some(text) = line.strip_prefix("ocr:") {
        (DeltaSource::Ocr, text)
    } else if let Some(text) = line.strip_prefix("user:") {
        (DeltaSource::User, text)
    } else {
        (DeltaSource::Audio, line)
    }
}

fn print_summary(summary: &LiveSummaryData, updated_at: i64) {
    let stamp = DateTime::from_timestamp_millis(updated_at)
        .map_or_else(|| updated_at.to_string(), |at| at.format("%H:%M:%S").to_string());
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "=== summary updated at {stamp} ===\n{summary}");
}
