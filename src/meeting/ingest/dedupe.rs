//! Text normalization and list deduplication helpers.

use std::collections::HashSet;

use crate::meeting::core::summary::ActionItem;

/// Normalize text for duplicate detection.
///
/// Lowercases, drops every character that is not alphanumeric, `_` or
/// whitespace, collapses whitespace runs to a single space and trims.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut prev_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                normalized.push(' ');
                prev_space = true;
            }
        } else if ch.is_alphanumeric() || ch == '_' {
            for lower in ch.to_lowercase() {
                normalized.push(lower);
            }
            prev_space = false;
        }
    }

    normalized.trim().to_string()
}

/// Drop entries that normalize to empty or to an already seen value.
///
/// Kept entries are trimmed; the first occurrence wins.
#[must_use]
pub fn dedupe_list(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(items.len());

    for item in items {
        let normalized = normalize_text(&item);
        if normalized.is_empty() || !seen.insert(normalized) {
            continue;
        }
        deduped.push(item.trim().to_string());
    }

    deduped
}

/// Drop action items whose `text` normalizes to empty or to an already seen value.
///
/// Owner and due date are ignored: two items with the same text but different
/// owners collapse to the first one.
#[must_use]
pub fn dedupe_action_items(items: Vec<ActionItem>) -> Vec<ActionItem> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(items.len());

    for item in items {
        let normalized = normalize_text(&item.text);
        if normalized.is_empty() || !seen.insert(normalized) {
            continue;
        }
        deduped.push(item);
    }

    deduped
}
