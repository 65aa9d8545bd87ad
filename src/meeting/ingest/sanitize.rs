//! Sanitization of summaries coming from the model or from the caller.
//!
//! Every accepted summary goes through [`sanitize_summary`]: entries are
//! trimmed, empty ones dropped, lists deduplicated and then clipped to their
//! maximum length keeping the most recent entries.

use serde_json::Value;

use crate::meeting::core::config::{ACTION_ITEMS_MAX, DECISIONS_MAX, SUMMARY_MAX};
use crate::meeting::core::summary::{ActionItem, ActionStatus, LiveSummaryData};
use crate::meeting::ingest::dedupe::{dedupe_action_items, dedupe_list};

/// Maximum list lengths applied during sanitization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListLimits {
    /// Maximum rolling summary bullets.
    pub summary: usize,
    /// Maximum decisions.
    pub decisions: usize,
    /// Maximum action items.
    pub action_items: usize,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            summary: SUMMARY_MAX,
            decisions: DECISIONS_MAX,
            action_items: ACTION_ITEMS_MAX,
        }
    }
}

/// Keep only the last `max` items.
#[must_use]
pub fn clip_list<T>(mut items: Vec<T>, max: usize) -> Vec<T> {
    if items.len() > max {
        let overflow = items.len() - max;
        items.drain(..overflow);
    }
    items
}

/// Sanitize a summary with the default list limits.
#[must_use]
pub fn sanitize_summary(summary: LiveSummaryData) -> LiveSummaryData {
    sanitize_summary_with(summary, ListLimits::default())
}

/// Sanitize a summary with explicit list limits.
#[must_use]
pub fn sanitize_summary_with(summary: LiveSummaryData, limits: ListLimits) -> LiveSummaryData {
    let action_items = summary
        .action_items
        .into_iter()
        .map(|item| ActionItem {
            text: item.text.trim().to_string(),
            owner: trim_optional(item.owner),
            due: trim_optional(item.due),
            status: item.status,
        })
        .filter(|item| !item.text.is_empty())
        .collect();

    LiveSummaryData {
        summary: clip_list(dedupe_list(summary.summary), limits.summary),
        decisions: clip_list(dedupe_list(summary.decisions), limits.decisions),
        action_items: clip_list(dedupe_action_items(action_items), limits.action_items),
    }
}

/// Coerce an arbitrary decoded JSON value into a sanitized summary.
///
/// Missing or non-array sections become empty; elements are stringified,
/// falsy ones (`null`, `false`, `0`, `""`) dropped. Action items that are not
/// objects or have no text are dropped.
#[must_use]
pub fn coerce_summary(value: &Value, limits: ListLimits) -> LiveSummaryData {
    let raw = LiveSummaryData {
        summary: coerce_strings(value.get("summary")),
        decisions: coerce_strings(value.get("decisions")),
        action_items: value
            .get("actionItems")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(coerce_action_item).collect())
            .unwrap_or_default(),
    };
    sanitize_summary_with(raw, limits)
}

fn coerce_strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(stringify).collect())
        .unwrap_or_default()
}

fn coerce_action_item(value: &Value) -> Option<ActionItem> {
    let object = value.as_object()?;
    let text = object.get("text").and_then(stringify)?;
    Some(ActionItem {
        text,
        owner: object.get("owner").and_then(stringify),
        due: object.get("due").and_then(stringify),
        status: ActionStatus::coerce(object.get("status").and_then(Value::as_str)),
    })
}

/// Stringify a JSON value, returning `None` for falsy values.
fn stringify(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Bool(false) => return None,
        Value::String(s) if s.is_empty() => return None,
        Value::Number(n) if n.as_f64() == Some(0.0) => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    };
    Some(text)
}

/// Integral floats print without a fraction, so `1.0` reads as `1`.
fn number_text(n: &serde_json::Number) -> String {
    n.as_i64()
        .map(|i| i.to_string())
        .or_else(|| n.as_u64().map(|u| u.to_string()))
        .or_else(|| n.as_f64().map(|f| f.to_string()))
        .unwrap_or_else(|| n.to_string())
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
