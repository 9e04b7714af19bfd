//! Group chat engine
//!
//! A proxy opens the conversation, then personas speak in round-robin order
//! until one of them satisfies the termination predicate or the round bound
//! is reached. Every turn is printed to an [`OutputChannel`] as
//! `speaker (to coordinator):` followed by the body, and recorded as a
//! [`TurnRecord`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::agent::conversation::Conversation;
use crate::agent::loop_state::{ChatLoopState, StopReason};
use crate::agent::persona::Persona;
use crate::core::{Config, Result, WayfarerError};
use crate::llm::{GenerateOptions, LLMProvider};
use crate::transcript::{is_speaker_name, OutputChannel, TurnLog, TurnRecord};

/// Predicate over a turn's text that ends the conversation
pub type TerminationPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Callback invoked with every turn as it is emitted
pub type TurnSink = Box<dyn Fn(&TurnRecord) + Send + Sync>;

/// Result of a finished conversation
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Every turn, opening message included
    pub turns: TurnLog,
    /// Rounds taken
    pub rounds: usize,
    /// Why the conversation stopped
    pub stop_reason: StopReason,
}

/// A multi-persona conversation
pub struct GroupChat {
    llm: Arc<dyn LLMProvider>,
    model: String,
    options: GenerateOptions,
    personas: Vec<Persona>,
    coordinator: String,
    proxy: String,
    max_rounds: usize,
    context_window: Option<usize>,
    is_termination: TerminationPredicate,
    on_turn: Option<TurnSink>,
    output: OutputChannel,
}

/// Builder for creating a GroupChat
pub struct GroupChatBuilder {
    llm: Arc<dyn LLMProvider>,
    model: String,
    options: GenerateOptions,
    personas: Vec<Persona>,
    coordinator: String,
    proxy: String,
    max_rounds: usize,
    context_window: Option<usize>,
    is_termination: TerminationPredicate,
    on_turn: Option<TurnSink>,
    output: Option<OutputChannel>,
}

impl GroupChatBuilder {
    /// Start from the chat and model settings in `config`
    pub fn new(llm: Arc<dyn LLMProvider>, config: &Config) -> Self {
        let sentinel = config.chat.termination_sentinel.clone();
        let is_termination: TerminationPredicate =
            Box::new(move |text: &str| text.contains(sentinel.as_str()));
        Self {
            llm,
            model: config.llm.model.clone(),
            options: GenerateOptions {
                temperature: Some(config.llm.temperature),
                seed: config.llm.seed,
                ..Default::default()
            },
            personas: Vec::new(),
            coordinator: config.chat.coordinator.clone(),
            proxy: config.chat.proxy.clone(),
            max_rounds: config.chat.max_rounds,
            context_window: config.chat.context_window,
            is_termination,
            on_turn: None,
            output: None,
        }
    }

    /// Add a speaking persona. Personas speak in the order they are added.
    pub fn persona(mut self, persona: Persona) -> Self {
        self.personas.push(persona);
        self
    }

    /// Add several personas
    pub fn personas(mut self, personas: impl IntoIterator<Item = Persona>) -> Self {
        self.personas.extend(personas);
        self
    }

    /// Set maximum rounds, opening message included
    pub fn max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    /// Limit how much history each persona sees
    pub fn context_window(mut self, turns: usize) -> Self {
        self.context_window = Some(turns);
        self
    }

    /// Replace the termination predicate
    pub fn terminate_when(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.is_termination = Box::new(predicate);
        self
    }

    /// Receive each turn as a structured record, alongside the printed text
    pub fn on_turn(mut self, sink: impl Fn(&TurnRecord) + Send + Sync + 'static) -> Self {
        let sink: TurnSink = Box::new(sink);
        self.on_turn = Some(sink);
        self
    }

    /// Channel the turns are printed to
    pub fn output(mut self, output: OutputChannel) -> Self {
        self.output = Some(output);
        self
    }

    /// Build the GroupChat
    pub fn build(self) -> Result<GroupChat> {
        if self.personas.is_empty() {
            return Err(WayfarerError::config("A group chat needs at least one persona"));
        }

        if let Some(name) = std::iter::once(&self.proxy)
            .chain(self.personas.iter().map(|p| &p.name))
            .find(|name| !is_speaker_name(name))
        {
            return Err(WayfarerError::config(format!(
                "Participant name '{}' must contain only letters, digits and underscores",
                name
            )));
        }

        if let Some(duplicate) = self
            .personas
            .iter()
            .enumerate()
            .find(|(i, p)| self.personas[..*i].iter().any(|q| q.name == p.name))
            .map(|(_, p)| p.name.clone())
        {
            return Err(WayfarerError::config(format!(
                "Persona '{}' is registered twice",
                duplicate
            )));
        }

        if self.personas.iter().any(|p| p.name == self.proxy) {
            return Err(WayfarerError::config(format!(
                "Persona name '{}' collides with the proxy",
                self.proxy
            )));
        }

        Ok(GroupChat {
            llm: self.llm,
            model: self.model,
            options: self.options,
            personas: self.personas,
            coordinator: self.coordinator,
            proxy: self.proxy,
            max_rounds: self.max_rounds,
            context_window: self.context_window,
            is_termination: self.is_termination,
            on_turn: self.on_turn,
            output: self.output.unwrap_or_else(OutputChannel::stdout),
        })
    }
}

impl GroupChat {
    /// Create a builder from configuration
    pub fn builder(llm: Arc<dyn LLMProvider>, config: &Config) -> GroupChatBuilder {
        GroupChatBuilder::new(llm, config)
    }

    /// Name every turn header is addressed to
    pub fn coordinator(&self) -> &str {
        &self.coordinator
    }

    /// Every participant name, proxy first
    pub fn participant_names(&self) -> Vec<&str> {
        std::iter::once(self.proxy.as_str())
            .chain(self.personas.iter().map(|p| p.name.as_str()))
            .collect()
    }

    /// Run the conversation from the proxy's opening `prompt`
    pub async fn run(&self, prompt: &str) -> Result<ChatOutcome> {
        let mut conversation = Conversation::new();
        if let Some(window) = self.context_window {
            conversation = conversation.with_context_window(window);
        }
        let mut state = ChatLoopState::new(self.max_rounds);

        info!(
            personas = self.personas.len(),
            max_rounds = self.max_rounds,
            "starting group chat"
        );

        self.emit(&mut conversation, TurnRecord::new(&self.proxy, prompt))?;
        state.next_round();

        let mut speakers = self.personas.iter().cycle();

        while state.should_continue() {
            let Some(persona) = speakers.next() else {
                break;
            };
            debug!(round = state.round + 1, speaker = %persona.name, "requesting turn");

            let messages = conversation.messages_for(persona);
            let response = self
                .llm
                .chat(&self.model, &messages, Some(self.options.clone()))
                .await
                .map_err(|e| {
                    WayfarerError::conversation(format!(
                        "{} failed on round {}: {}",
                        persona.name,
                        state.round + 1,
                        e
                    ))
                })?;

            let terminates = (self.is_termination)(&response.content);
            self.emit(
                &mut conversation,
                TurnRecord::new(&persona.name, response.content),
            )?;
            state.next_round();

            if terminates {
                state.terminate(&persona.name);
            }
        }

        let stop_reason = state.stop_reason();
        info!(rounds = state.round, ?stop_reason, "group chat finished");

        Ok(ChatOutcome {
            turns: conversation.into_turns(),
            rounds: state.round,
            stop_reason,
        })
    }

    fn emit(&self, conversation: &mut Conversation, turn: TurnRecord) -> Result<()> {
        self.output.write_str(&turn.render(&self.coordinator))?;
        if let Some(ref sink) = self.on_turn {
            sink(&turn);
        }
        conversation.add_turn(turn);
        Ok(())
    }
}
