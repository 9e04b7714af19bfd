//! Agent module - personas, group chat and the travel planner
//!
//! Contains the conversation engine that drives the personas and the planner
//! that turns its transcript into a travel plan.

pub mod conversation;
pub mod group_chat;
pub mod loop_state;
pub mod persona;
pub mod planner;

pub use conversation::Conversation;
pub use group_chat::{ChatOutcome, GroupChat, GroupChatBuilder, TerminationPredicate, TurnSink};
pub use loop_state::{ChatLoopState, StopReason};
pub use persona::{travel_team, Persona};
pub use planner::{Stage, TravelPlan, TravelPlanner, TripRequest};
