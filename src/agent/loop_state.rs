//! Group chat loop state
//!
//! Tracks rounds taken and why the conversation stopped.

/// Why a conversation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A turn matched the termination predicate
    Terminated { speaker: String },
    /// The round bound was reached first
    MaxRounds,
}

/// State of the group chat loop
#[derive(Debug, Clone)]
pub struct ChatLoopState {
    /// Rounds taken so far, including the opening message
    pub round: usize,
    /// Maximum allowed rounds
    pub max_rounds: usize,
    /// Set once a turn satisfies the termination predicate
    pub terminated_by: Option<String>,
}

impl ChatLoopState {
    /// Create a new loop state with the given round bound
    pub fn new(max_rounds: usize) -> Self {
        Self {
            round: 0,
            max_rounds,
            terminated_by: None,
        }
    }

    /// Check if the loop should continue
    pub fn should_continue(&self) -> bool {
        self.round < self.max_rounds && self.terminated_by.is_none()
    }

    /// Increment the round counter
    pub fn next_round(&mut self) {
        self.round += 1;
    }

    /// Record that `speaker` ended the conversation
    pub fn terminate(&mut self, speaker: impl Into<String>) {
        self.terminated_by = Some(speaker.into());
    }

    /// Why the loop stopped. Only meaningful once `should_continue` is false.
    pub fn stop_reason(&self) -> StopReason {
        match self.terminated_by {
            Some(ref speaker) => StopReason::Terminated {
                speaker: speaker.clone(),
            },
            None => StopReason::MaxRounds,
        }
    }
}
