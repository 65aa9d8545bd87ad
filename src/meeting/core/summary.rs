//! Live summary data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Completion state of an action item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Still to be done.
    #[default]
    Open,
    /// Completed.
    Done,
}

impl ActionStatus {
    /// Stable string form for storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Done => "done",
        }
    }

    /// Coerce a raw status value: only an exact `"done"` is done.
    #[must_use]
    pub fn coerce(raw: Option<&str>) -> Self {
        match raw {
            Some("done") => Self::Done,
            _ => Self::Open,
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single action item. Duplicates are detected on `text` only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    /// What needs to be done.
    pub text: String,
    /// Who owns it, if mentioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// When it is due, if mentioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    /// Completion state.
    #[serde(default)]
    pub status: ActionStatus,
}

impl ActionItem {
    /// Build an open action item with only a text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Attach an owner.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Attach a due date.
    #[must_use]
    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    /// Set the status.
    #[must_use]
    pub const fn with_status(mut self, status: ActionStatus) -> Self {
        self.status = status;
        self
    }
}

/// Rolling meeting summary shown to the user and persisted by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSummaryData {
    /// Rolling summary bullets, oldest first.
    #[serde(default)]
    pub summary: Vec<String>,
    /// Decisions taken, oldest first.
    #[serde(default)]
    pub decisions: Vec<String>,
    /// Action items, oldest first.
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
}

impl LiveSummaryData {
    /// Whether all three sections are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.decisions.is_empty() && self.action_items.is_empty()
    }
}

/// Create a fresh, empty summary.
#[must_use]
pub fn create_empty_summary() -> LiveSummaryData {
    LiveSummaryData::default()
}

impl fmt::Display for LiveSummaryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary")?;
        for bullet in &self.summary {
            writeln!(f, "  - {bullet}")?;
        }
        writeln!(f, "Decisions")?;
        for decision in &self.decisions {
            writeln!(f, "  - {decision}")?;
        }
        writeln!(f, "Action items")?;
        for item in &self.action_items {
            let mark = match item.status {
                ActionStatus::Open => ' ',
                ActionStatus::Done => 'x',
            };
            write!(f, "  [{mark}] {}", item.text)?;
            if let Some(owner) = &item.owner {
                write!(f, " (owner: {owner})")?;
            }
            if let Some(due) = &item.due {
                write!(f, " (due: {due})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
