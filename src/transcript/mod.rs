//! Transcript module - capture and segmentation of conversation output
//!
//! The conversation engine prints its turns as plain text. This module
//! captures that text and splits it back into per-speaker content.

pub mod capture;
pub mod segment;
pub mod sentinel;
pub mod turns;

use std::fmt;

pub use capture::{OutputCapture, OutputChannel};
pub use segment::{clean_for_display, extract_speaker, is_speaker_name, Segmenter};
pub use sentinel::strip_sentinels;
pub use turns::{TurnLog, TurnRecord};

/// Full text of one conversation run. Read-only once captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Snapshot the text collected by a capture
    pub fn from_capture(capture: &OutputCapture) -> Self {
        Self(capture.captured_text())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Transcript {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
