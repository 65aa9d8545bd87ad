//! Locate the JSON object inside a free-form model response.

use std::sync::LazyLock;

use regex::Regex;

static JSON_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)```").ok());
static ANY_FENCE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").ok());

/// Extract the first balanced `{...}` span from a model response.
///
/// A fenced code block (tagged `json` first, then any fence) is preferred over
/// the raw text. Within the chosen text, the span starts at the first `{` and
/// ends at its matching `}`; braces inside JSON string literals are not
/// counted. Returns `None` if no balanced object is found.
#[must_use]
pub fn extract_json_block(text: &str) -> Option<&str> {
    let target = fenced_body(text).unwrap_or(text);
    balanced_object(target)
}

fn fenced_body(text: &str) -> Option<&str> {
    [&JSON_FENCE, &ANY_FENCE].into_iter().find_map(|fence| {
        Option::as_ref(fence)
            .and_then(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|body| body.as_str())
    })
}

fn balanced_object(target: &str) -> Option<&str> {
    let start = target.find('{')?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in target[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&target[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}
