//! Instructions sent to the provider.

/// System prompt for merging deltas into the rolling summary.
pub const MEETING_SYSTEM_PROMPT: &str = r#"You are a meeting summarization engine.
Maintain a LIVE rolling summary with three sections:
1) Rolling Summary (2-6 bullet points)
2) Decisions (bullet list)
3) Action Items (bullet list with owner + due if mentioned)

You will be given the previous summary JSON and new content deltas.
Merge updates into the existing summary: update, append, and deduplicate.
Return strictly valid JSON with this schema and no extra text:
{
  "summary": ["..."],
  "decisions": ["..."],
  "actionItems": [
    {"text":"...", "owner": "...?", "due":"...?", "status":"open"}
  ]
}"#;

/// System prompt for the single-shot JSON repair call.
pub const JSON_REPAIR_PROMPT: &str = r#"You are a JSON repair tool.
Return ONLY valid JSON matching this schema:
{
  "summary": ["..."],
  "decisions": ["..."],
  "actionItems": [
    {"text":"...", "owner": "...?", "due":"...?", "status":"open"}
  ]
}
Do not include code fences or commentary."#;

/// Build the merge request message.
#[must_use]
pub fn merge_message(summary_json: &str, deltas: &str) -> String {
    format!(
        "Previous summary JSON:\n{summary_json}\n\nNew content deltas:\n{deltas}\n\nReturn updated JSON only."
    )
}

/// Build the repair request message.
#[must_use]
pub fn repair_message(raw: &str) -> String {
    format!("Fix this JSON:\n{raw}")
}
