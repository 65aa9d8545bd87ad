//! Bounded buffer of labeled text deltas awaiting the next merge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Origin of a text fragment.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaSource {
    /// Speech transcription.
    Audio,
    /// Text recognized on a screen capture.
    Ocr,
    /// Text typed by the user.
    User,
}

impl DeltaSource {
    /// Stable string form for storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Ocr => "ocr",
            Self::User => "user",
        }
    }

    /// Uppercase marker written in front of each buffered fragment.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Audio => "AUDIO",
            Self::Ocr => "OCR",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for DeltaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeltaSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "audio" => Ok(Self::Audio),
            "ocr" => Ok(Self::Ocr),
            "user" => Ok(Self::User),
            _ => Err(value.to_string()),
        }
    }
}

/// Text buffer bounded to a maximum character count.
///
/// On overflow the oldest characters are dropped so the most recent text
/// survives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaBuffer {
    text: String,
    max_chars: usize,
}

impl DeltaBuffer {
    /// Create an empty buffer holding at most `max_chars` characters.
    #[must_use]
    pub const fn new(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            max_chars,
        }
    }

    /// Append a labeled fragment. Blank fragments are ignored.
    ///
    /// Returns `true` if the fragment was appended.
    pub fn push(&mut self, delta: &str, source: DeltaSource) -> bool {
        let delta = delta.trim();
        if delta.is_empty() {
            return false;
        }

        let joined = format!("{}\n[{}] {delta}", self.text, source.label());
        self.text = joined.trim().to_string();
        self.keep_recent();
        true
    }

    /// Buffered text, trimmed.
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.text.trim().to_string()
    }

    /// Number of buffered characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the buffer holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Drop all buffered text.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    fn keep_recent(&mut self) {
        let len = self.char_len();
        if len <= self.max_chars {
            return;
        }
        let skip = len - self.max_chars;
        if let Some((start, _)) = self.text.char_indices().nth(skip) {
            self.text.drain(..start);
        }
    }
}
