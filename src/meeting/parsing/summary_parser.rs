//! Parse model responses into sanitized summaries, with a repair fallback.

use std::future::Future;

use serde_json::Value;
use tracing::debug;

use crate::meeting::core::errors::SummarizerResult;
use crate::meeting::core::summary::LiveSummaryData;
use crate::meeting::ingest::sanitize::{ListLimits, coerce_summary};
use crate::meeting::parsing::extract::extract_json_block;

/// Parse a raw model response with the default list limits.
///
/// Returns `None` if no JSON object can be extracted or decoded.
#[must_use]
pub fn parse_meeting_summary(raw: &str) -> Option<LiveSummaryData> {
    parse_meeting_summary_with(raw, ListLimits::default())
}

/// Parse a raw model response with explicit list limits.
#[must_use]
pub fn parse_meeting_summary_with(raw: &str, limits: ListLimits) -> Option<LiveSummaryData> {
    if raw.trim().is_empty() {
        return None;
    }
    let candidate = extract_json_block(raw)?;
    match serde_json::from_str::<Value>(candidate) {
        Ok(value) if value.is_object() => Some(coerce_summary(&value, limits)),
        Ok(_) => None,
        Err(err) => {
            debug!(%err, "Meeting summary JSON did not decode");
            None
        }
    }
}

/// Parse a raw response, asking `repair` to fix it if direct parsing fails.
///
/// # Errors
/// Returns an error only if the repair call itself fails. An empty repair
/// output or an unparseable repaired text yields `Ok(None)`.
pub async fn parse_meeting_summary_with_repair<F, Fut>(
    raw: &str,
    repair: F,
) -> SummarizerResult<Option<LiveSummaryData>>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = SummarizerResult<Option<String>>>,
{
    parse_meeting_summary_with_repair_and_limits(raw, ListLimits::default(), repair).await
}

/// Same as [`parse_meeting_summary_with_repair`] with explicit list limits.
///
/// # Errors
/// Returns an error only if the repair call itself fails.
pub async fn parse_meeting_summary_with_repair_and_limits<F, Fut>(
    raw: &str,
    limits: ListLimits,
    repair: F,
) -> SummarizerResult<Option<LiveSummaryData>>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = SummarizerResult<Option<String>>>,
{
    if let Some(parsed) = parse_meeting_summary_with(raw, limits) {
        return Ok(Some(parsed));
    }

    debug!(raw_len = raw.len(), "Direct parse failed, requesting JSON repair");
    let Some(repaired) = repair(raw.to_string()).await? else {
        return Ok(None);
    };
    Ok(parse_meeting_summary_with(&repaired, limits))
}
