//! Structured turn records
//!
//! The group chat reports each turn both as printed text and as a
//! [`TurnRecord`]. A [`TurnLog`] answers the same per-speaker questions as
//! [`Segmenter`](crate::transcript::Segmenter) without any pattern matching.

use serde::{Deserialize, Serialize};

/// One participant's contribution to the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Participant that spoke
    pub speaker: String,
    /// Text of the turn
    pub body: String,
}

impl TurnRecord {
    pub fn new(speaker: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            body: body.into(),
        }
    }

    /// Render the turn the way it appears in a transcript
    pub fn render(&self, coordinator: &str) -> String {
        format!("{} (to {}):\n\n{}\n\n", self.speaker, coordinator, self.body)
    }
}

/// Ordered list of turns from one conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnLog {
    turns: Vec<TurnRecord>,
}

impl TurnLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: TurnRecord) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&TurnRecord> {
        self.turns.last()
    }

    /// All of `speaker`'s turns, each trimmed, joined with `\n`
    pub fn extract(&self, speaker: &str) -> String {
        self.turns
            .iter()
            .filter(|turn| turn.speaker == speaker)
            .map(|turn| turn.body.trim())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Rebuild the transcript text these turns would have printed
    pub fn render(&self, coordinator: &str) -> String {
        self.turns
            .iter()
            .map(|turn| turn.render(coordinator))
            .collect()
    }
}
