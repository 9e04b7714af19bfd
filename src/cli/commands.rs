//! CLI commands
//!
//! The `plan`, `segment` and `config` subcommands.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::agent::{Stage, TravelPlanner};
use crate::cli::prompt;
use crate::cli::render::render_plan;
use crate::core::{Config, Result, WayfarerError};
use crate::transcript::{strip_sentinels, Segmenter};

/// Options for `wayfarer plan`
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub destination: Option<String>,
    pub days: Option<u32>,
    pub save: bool,
    pub output_dir: Option<PathBuf>,
    pub show_log: bool,
}

/// Options for `wayfarer segment`
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    pub file: PathBuf,
    pub speaker: Option<String>,
    pub coordinator: String,
    pub clean: bool,
    /// Sentinels removed from the extracted text
    pub strip: Vec<String>,
}

/// Generate a travel plan and print it
pub async fn run_plan(config: Config, options: PlanOptions) -> Result<()> {
    let planner = TravelPlanner::new(config)?;
    let limits = planner.config().trip.clone();

    let (destination, days) = match options.destination {
        Some(dest) => (dest, options.days.unwrap_or(limits.default_days)),
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();
            let dest = prompt::read_destination(&mut input, &mut output)?;
            let days = match options.days {
                Some(days) => days,
                None => prompt::read_days(&mut input, &mut output, &limits)?,
            };
            (dest, days)
        }
    };

    let request = planner.request(&destination, days)?;
    println!(
        "### Planning your {}-day trip to {}...\n",
        request.days, request.destination
    );

    let pb = create_progress_bar();
    let result = planner
        .generate_with_progress(&request, |stage: Stage| {
            pb.set_position(stage.percent());
            pb.set_message(stage.message());
        })
        .await;

    let plan = match result {
        Ok(plan) => {
            pb.finish_and_clear();
            plan
        }
        Err(e) => {
            pb.abandon_with_message("Planning failed");
            return Err(e);
        }
    };

    println!("{}", render_plan(&plan, options.show_log));

    if options.save {
        let dir = options.output_dir.unwrap_or(limits.output_dir);
        match plan.save_markdown(&dir)? {
            Some(path) => println!("💾 Saved travel plan to {}", path.display()),
            None => println!("Nothing to save: no final plan was generated."),
        }
    }

    Ok(())
}

/// Segment a saved transcript file and return the text to print
pub fn run_segment(options: &SegmentOptions) -> Result<String> {
    let transcript = fs::read_to_string(&options.file)?;
    let segmenter = Segmenter::new(&options.coordinator)?;
    debug!(
        file = %options.file.display(),
        speakers = ?segmenter.speakers_in(&transcript),
        "segmenting transcript"
    );

    if options.clean {
        return Ok(segmenter.clean(&transcript));
    }

    let speaker = options
        .speaker
        .as_deref()
        .ok_or_else(|| WayfarerError::invalid_input("Pass --speaker or --clean"))?;
    let text = segmenter.extract(&transcript, speaker);

    if options.strip.is_empty() {
        Ok(text)
    } else {
        Ok(strip_sentinels(&text, &options.strip).unwrap_or_default())
    }
}

/// Show or write the configuration file
pub fn run_config(init: bool) -> Result<String> {
    if init {
        let path = Config::default().save()?;
        return Ok(format!("Wrote default configuration to {}", path.display()));
    }

    Ok(format!(
        "# {}\n{}",
        Config::config_file().display(),
        Config::default_config_toml()
    ))
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}% {msg}")
        .map(|style| style.progress_chars("━╸━"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
