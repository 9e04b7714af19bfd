//! Wayfarer - multi-agent AI travel planner
//!
//! Four LLM personas (planner, local guide, language coach, summariser) take
//! turns in a group chat. The chat is printed as a plain-text transcript,
//! captured, and split back into one section per persona.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: LLM provider abstraction with an OpenAI-compatible client
//! - **Transcript**: Output capture, segmentation, and sentinel handling
//! - **Agent**: Personas, the group chat engine, and the travel planner
//! - **CLI**: Subcommands, interactive input, and rendering
//!
//! # Usage
//!
//! ```rust,no_run
//! use wayfarer::{Config, TravelPlanner};
//!
//! #[tokio::main]
//! async fn main() -> wayfarer::Result<()> {
//!     let planner = TravelPlanner::new(Config::load()?)?;
//!     let request = planner.request("Tokyo, Japan", 3)?;
//!
//!     let plan = planner.generate(&request).await?;
//!     println!("{}", plan.final_plan.unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
pub mod transcript;

// Re-export commonly used items
pub use agent::{TravelPlan, TravelPlanner, TripRequest};
pub use crate::core::{Config, Result, WayfarerError};
pub use transcript::{clean_for_display, extract_speaker, OutputCapture, OutputChannel};
