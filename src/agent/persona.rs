//! Travel personas
//!
//! Each persona is an LLM-backed participant with a fixed behaviour prompt
//! and a completion sentinel it appends to its final contribution.

pub const PLANNER: &str = "planner_agent";
pub const LOCAL: &str = "local_agent";
pub const LANGUAGE: &str = "language_agent";
pub const SUMMARY: &str = "travel_summary_agent";

/// One configured chat participant
#[derive(Debug, Clone, PartialEq)]
pub struct Persona {
    /// Participant name, used in turn headers
    pub name: String,
    /// System message describing the persona's job
    pub system_message: String,
    /// Marker the persona emits when it is done
    pub sentinel: String,
}

impl Persona {
    /// Build a persona whose system message ends by asking for `sentinel`
    pub fn new(name: impl Into<String>, duty: &str, sentinel: impl Into<String>) -> Self {
        let sentinel = sentinel.into();
        Self {
            name: name.into(),
            system_message: format!("{} end with '{}'", duty.trim_end(), sentinel),
            sentinel,
        }
    }
}

/// The four personas that write a travel plan, in speaking order
pub fn travel_team() -> Vec<Persona> {
    vec![
        Persona::new(
            PLANNER,
            "You are a helpful assistant that can suggest a travel plan for a user based on \
             their request. After providing your suggestions,",
            "PLANNER COMPLETE",
        ),
        Persona::new(
            LOCAL,
            "You are a helpful assistant that can suggest authentic and interesting local \
             activities or places to visit. After providing your suggestions,",
            "LOCAL COMPLETE",
        ),
        Persona::new(
            LANGUAGE,
            "You are a helpful assistant that can provide language tips for the destination. \
             After providing your suggestions,",
            "LANGUAGE COMPLETE",
        ),
        Persona::new(
            SUMMARY,
            "You are a helpful assistant that can compile all suggestions into a final travel \
             plan. Format the plan with clear sections using markdown headers (#). After \
             providing the final plan,",
            "FINAL PLAN COMPLETE",
        ),
    ]
}

/// Sentinels of every persona in `team`
pub fn sentinels(team: &[Persona]) -> Vec<&str> {
    team.iter().map(|p| p.sentinel.as_str()).collect()
}
