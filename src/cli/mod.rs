//! CLI module - command-line interface
//!
//! Contains the subcommands, interactive input and plan rendering.

pub mod commands;
pub mod prompt;
pub mod render;

pub use commands::{run_config, run_plan, run_segment, PlanOptions, SegmentOptions};
pub use render::render_plan;
