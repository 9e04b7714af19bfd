//! Wayfarer - multi-agent AI travel planner
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wayfarer::cli::{self, PlanOptions, SegmentOptions};
use wayfarer::{Config, WayfarerError};

/// Wayfarer - plan a trip with a team of AI agents
#[derive(Parser, Debug)]
#[command(name = "wayfarer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug output
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a travel plan
    Plan {
        /// Where to go (asked interactively when omitted)
        destination: Option<String>,

        /// Trip length in days
        #[arg(long, short = 'n')]
        days: Option<u32>,

        /// Save the final plan as markdown
        #[arg(long, short = 's')]
        save: bool,

        /// Directory for the saved plan
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,

        /// Print the cleaned planning process log
        #[arg(long)]
        show_log: bool,

        /// Model used by every agent
        #[arg(long, short = 'm')]
        model: Option<String>,
    },

    /// Split a saved transcript by speaker
    Segment {
        /// Transcript file
        file: PathBuf,

        /// Speaker whose turns to extract
        #[arg(long)]
        speaker: Option<String>,

        /// Name the turn headers are addressed to
        #[arg(long, default_value = "chat_manager")]
        coordinator: String,

        /// Print a cleaned copy of the whole transcript instead
        #[arg(long, conflicts_with = "speaker")]
        clean: bool,

        /// Sentinel to strip from the extracted text (repeatable)
        #[arg(long)]
        strip: Vec<String>,
    },

    /// Show the configuration file
    Config {
        /// Write the default configuration to disk
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Build configuration
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            report(&anyhow::Error::from(e));
            return ExitCode::FAILURE;
        }
    };
    if args.debug {
        config.debug = true;
    }

    let log_level = if config.debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, mut config: Config) -> anyhow::Result<()> {
    match command {
        Command::Plan {
            destination,
            days,
            save,
            output_dir,
            show_log,
            model,
        } => {
            if let Some(model) = model {
                config.llm.model = model;
            }

            cli::run_plan(
                config,
                PlanOptions {
                    destination,
                    days,
                    save,
                    output_dir,
                    show_log,
                },
            )
            .await?;
        }

        Command::Segment {
            file,
            speaker,
            coordinator,
            clean,
            strip,
        } => {
            let text = cli::run_segment(&SegmentOptions {
                file,
                speaker,
                coordinator,
                clean,
                strip,
            })?;
            println!("{}", text);
        }

        Command::Config { init } => {
            println!("{}", cli::run_config(init)?);
        }
    }

    Ok(())
}

fn report(err: &anyhow::Error) {
    eprintln!("{}", failure_message(err));
}

fn failure_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<WayfarerError>() {
        Some(WayfarerError::Config(msg)) => format!("❌ Configuration error: {}", msg),
        Some(e) if e.is_configuration() => format!("❌ Configuration error: {}", e),
        Some(WayfarerError::InvalidInput(msg)) => format!("⚠️  {}", msg),
        _ => format!("❌ An error occurred: {:#}", err),
    }
}
