//! Group conversation history
//!
//! Holds every turn of the group chat and builds the message list each
//! persona sees when it is asked to speak.

use crate::agent::persona::Persona;
use crate::core::Message;
use crate::transcript::{TurnLog, TurnRecord};

/// Shared history of a group chat
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: TurnLog,
    /// Number of recent turns shown to a persona (None = all)
    context_window: Option<usize>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many recent turns a persona sees.
    ///
    /// The opening message is always kept so the task stays in view.
    pub fn with_context_window(mut self, turns: usize) -> Self {
        self.context_window = Some(turns);
        self
    }

    /// Add a turn
    pub fn add_turn(&mut self, turn: TurnRecord) {
        self.turns.push(turn);
    }

    /// Consume the conversation, keeping its turns
    pub fn into_turns(self) -> TurnLog {
        self.turns
    }

    /// Messages for `persona`: its system message, then the history with
    /// its own turns as assistant messages and everyone else's as named user
    /// messages.
    pub fn messages_for(&self, persona: &Persona) -> Vec<Message> {
        let turns = self.turns.turns();
        let start = match self.context_window {
            Some(window) if turns.len() > window + 1 => turns.len() - window,
            _ => 1,
        };

        let mut result = vec![Message::system(&persona.system_message)];
        result.extend(
            turns
                .first()
                .into_iter()
                .chain(turns.iter().skip(start))
                .map(|turn| {
                    if turn.speaker == persona.name {
                        Message::assistant(&turn.body)
                    } else {
                        Message::user(&turn.body).with_name(&turn.speaker)
                    }
                }),
        );
        result
    }
}
