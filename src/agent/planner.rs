//! Travel planner
//!
//! Runs the travel team's group chat with its output captured, then splits
//! the transcript into the sections shown to the user.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::agent::group_chat::GroupChat;
use crate::agent::persona::{self, Persona};
use crate::core::config::TripConfig;
use crate::core::{Config, Result, WayfarerError};
use crate::llm::{LLMProvider, OpenAiClient};
use crate::transcript::{strip_sentinels, OutputCapture, OutputChannel, Segmenter, Transcript, TurnLog};

/// A validated trip request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    pub destination: String,
    pub days: u32,
}

impl TripRequest {
    /// Validate user input against the configured limits
    pub fn new(destination: &str, days: u32, limits: &TripConfig) -> Result<Self> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(WayfarerError::invalid_input("Please enter a destination"));
        }

        if days < limits.min_days || days > limits.max_days {
            return Err(WayfarerError::invalid_input(format!(
                "Duration must be between {} and {} days",
                limits.min_days, limits.max_days
            )));
        }

        Ok(Self {
            destination: destination.to_string(),
            days,
        })
    }

    /// Opening message the proxy sends to the team
    pub fn prompt(&self) -> String {
        format!(
            "Plan a {} day trip to {}. Follow these steps:\n\
             1. Planner_agent: Suggest overall itinerary and timing\n\
             2. Local_agent: Add local attractions and activities\n\
             3. Language_agent: Provide essential phrases and language tips\n\
             4. Travel_summary_agent: Compile everything into a final plan with clear sections\n",
            self.days, self.destination
        )
    }

    /// File name for the downloadable plan
    pub fn download_file_name(&self) -> String {
        let slug: String = self
            .destination
            .to_lowercase()
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' => '_',
                other => other,
            })
            .collect();
        format!("travel_plan_{}.md", slug)
    }
}

/// Progress milestones reported while a plan is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Initializing,
    AgentsReady,
    Generating,
    Finalizing,
    Complete,
}

impl Stage {
    /// Fixed completion percentage for the milestone
    pub fn percent(self) -> u64 {
        match self {
            Stage::Initializing => 0,
            Stage::AgentsReady => 10,
            Stage::Generating => 20,
            Stage::Finalizing => 90,
            Stage::Complete => 100,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Stage::Initializing => "Initializing AI travel agents...",
            Stage::AgentsReady => "AI travel agents initialized! Starting planning process...",
            Stage::Generating => "Generating travel itinerary...",
            Stage::Finalizing => "Finalizing your travel plan...",
            Stage::Complete => "Travel plan completed!",
        }
    }
}

/// Finished plan, one field per persona
#[derive(Debug, Clone)]
pub struct TravelPlan {
    pub request: TripRequest,
    /// Compiled plan from the summary persona
    pub final_plan: Option<String>,
    /// Itinerary from the planner persona
    pub itinerary: Option<String>,
    /// Attractions from the local persona
    pub local_activities: Option<String>,
    /// Phrases from the language persona
    pub language_tips: Option<String>,
    /// Cleaned transcript for the process log
    pub process_log: String,
    /// Raw captured transcript
    pub transcript: Transcript,
    /// Structured turns reported by the engine
    pub turns: TurnLog,
}

impl TravelPlan {
    /// Write the final plan as markdown into `dir`.
    ///
    /// Returns `None` without touching the filesystem when no final plan was
    /// generated.
    pub fn save_markdown(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let Some(ref plan) = self.final_plan else {
            return Ok(None);
        };

        fs::create_dir_all(dir)?;
        let path = dir.join(self.request.download_file_name());
        fs::write(&path, plan)?;
        info!(path = %path.display(), "saved travel plan");
        Ok(Some(path))
    }
}

/// Runs the travel team for a trip request
pub struct TravelPlanner {
    config: Config,
    llm: Arc<dyn LLMProvider>,
    team: Vec<Persona>,
    output: OutputChannel,
}

impl TravelPlanner {
    /// Create a planner backed by the configured chat-completions endpoint.
    ///
    /// Fails with [`WayfarerError::MissingApiKey`] before anything else runs
    /// when no credential is available.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let llm: Arc<dyn LLMProvider> = Arc::new(OpenAiClient::from_config(&config)?);
        Ok(Self::with_provider(config, llm, OutputChannel::stdout()))
    }

    /// Create a planner with an explicit provider and output channel
    pub fn with_provider(config: Config, llm: Arc<dyn LLMProvider>, output: OutputChannel) -> Self {
        Self {
            config,
            llm,
            team: persona::travel_team(),
            output,
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate input against this planner's limits
    pub fn request(&self, destination: &str, days: u32) -> Result<TripRequest> {
        TripRequest::new(destination, days, &self.config.trip)
    }

    /// Generate a plan
    pub async fn generate(&self, request: &TripRequest) -> Result<TravelPlan> {
        self.generate_with_progress(request, |_| {}).await
    }

    /// Generate a plan, reporting each milestone to `on_stage`
    pub async fn generate_with_progress(
        &self,
        request: &TripRequest,
        mut on_stage: impl FnMut(Stage),
    ) -> Result<TravelPlan> {
        on_stage(Stage::Initializing);

        let chat = GroupChat::builder(Arc::clone(&self.llm), &self.config)
            .personas(self.team.iter().cloned())
            .output(self.output.clone())
            .build()?;
        on_stage(Stage::AgentsReady);

        info!(
            destination = %request.destination,
            days = request.days,
            provider = self.llm.name(),
            "generating travel plan"
        );

        let mut capture = OutputCapture::new(&self.output);
        on_stage(Stage::Generating);

        let outcome = match capture.capture(chat.run(&request.prompt())).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "travel plan generation failed");
                debug!(
                    bytes = capture.captured_text().len(),
                    "discarding partial transcript"
                );
                return Err(e);
            }
        };
        on_stage(Stage::Finalizing);

        let transcript = Transcript::from_capture(&capture);
        let plan = self.build_plan(request, &chat, transcript, outcome.turns)?;

        on_stage(Stage::Complete);
        Ok(plan)
    }

    fn build_plan(
        &self,
        request: &TripRequest,
        chat: &GroupChat,
        transcript: Transcript,
        turns: TurnLog,
    ) -> Result<TravelPlan> {
        let segmenter =
            Segmenter::new(chat.coordinator())?.with_speakers(chat.participant_names());
        let sentinels = persona::sentinels(&self.team);

        let section = |name: &str| {
            let raw = segmenter.extract(transcript.as_str(), name);
            if raw.is_empty() {
                debug!(speaker = name, "no content extracted");
            }
            strip_sentinels(&raw, &sentinels)
        };

        Ok(TravelPlan {
            request: request.clone(),
            final_plan: section(persona::SUMMARY),
            itinerary: section(persona::PLANNER),
            local_activities: section(persona::LOCAL),
            language_tips: section(persona::LANGUAGE),
            process_log: segmenter.clean(transcript.as_str()),
            transcript,
            turns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> TripConfig {
        TripConfig::default()
    }

    #[test]
    fn test_request_validation() {
        assert!(TripRequest::new("  ", 3, &limits()).is_err());
        assert!(TripRequest::new("Paris", 0, &limits()).is_err());
        assert!(TripRequest::new("Paris", 31, &limits()).is_err());

        let request = TripRequest::new(" Paris ", 30, &limits()).unwrap();
        assert_eq!(request.destination, "Paris");
    }

    #[test]
    fn test_download_file_name() {
        let request = TripRequest::new("New York City", 3, &limits()).unwrap();
        assert_eq!(request.download_file_name(), "travel_plan_new_york_city.md");

        let request = TripRequest::new("Tokyo, Japan", 3, &limits()).unwrap();
        assert_eq!(request.download_file_name(), "travel_plan_tokyo,_japan.md");

        let request = TripRequest::new("../etc", 3, &limits()).unwrap();
        assert_eq!(request.download_file_name(), "travel_plan_.._etc.md");
    }

    #[test]
    fn test_prompt_lists_steps() {
        let request = TripRequest::new("Lisbon", 4, &limits()).unwrap();
        let prompt = request.prompt();
        assert!(prompt.starts_with("Plan a 4 day trip to Lisbon."));
        assert!(prompt.contains("4. Travel_summary_agent"));
    }

    #[test]
    fn test_stage_percentages_increase() {
        let stages = [
            Stage::Initializing,
            Stage::AgentsReady,
            Stage::Generating,
            Stage::Finalizing,
            Stage::Complete,
        ];
        assert!(stages.windows(2).all(|w| w[0].percent() < w[1].percent()));
    }

    #[test]
    fn test_new_requires_api_key() {
        let mut config = Config::default();
        config.llm.api_key = None;
        assert!(matches!(
            TravelPlanner::new(config),
            Err(WayfarerError::MissingApiKey)
        ));
    }
}
