//! Transcript segmentation
//!
//! Splits a captured transcript into per-speaker content using the turn
//! header convention `speaker (to coordinator):`, and produces a cleaned copy
//! for the process log.

use std::collections::HashSet;

use regex::{Captures, Regex};

use crate::core::Result;

/// A header line found in a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header<'t> {
    speaker: &'t str,
    /// Byte offset of the start of the header line
    start: usize,
    /// Byte offset just past the header's colon
    end: usize,
}

/// Transcript splitter bound to one coordinator name
#[derive(Debug, Clone)]
pub struct Segmenter {
    coordinator: String,
    /// Any header line, with or without inline text after the colon
    header: Regex,
    /// Header lines that carry nothing but whitespace after the colon
    bare_header: Regex,
    blank_run: Regex,
    /// When set, only these speakers' headers end a segment
    speakers: Option<HashSet<String>>,
}

impl Segmenter {
    /// Create a segmenter for headers addressed to `coordinator`
    pub fn new(coordinator: &str) -> Result<Self> {
        let escaped = regex::escape(coordinator);

        Ok(Self {
            coordinator: coordinator.to_string(),
            header: Regex::new(&format!(r"(?m)^(\w+) \(to {}\):", escaped))?,
            bare_header: Regex::new(&format!(r"(?m)^(\w+) \(to {}\):[^\S\n]*$", escaped))?,
            blank_run: Regex::new(r"\n\s*\n")?,
            speakers: None,
        })
    }

    /// Restrict segment boundaries to a registered set of speakers.
    ///
    /// Header-like lines from unregistered names are then treated as body
    /// text of the surrounding turn.
    pub fn with_speakers<I, S>(mut self, speakers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.speakers = Some(speakers.into_iter().map(Into::into).collect());
        self
    }

    /// Coordinator name this segmenter matches
    pub fn coordinator(&self) -> &str {
        &self.coordinator
    }

    fn is_registered(&self, speaker: &str) -> bool {
        self.speakers
            .as_ref()
            .map_or(true, |speakers| speakers.contains(speaker))
    }

    fn headers<'t>(&self, transcript: &'t str) -> Vec<Header<'t>> {
        self.header
            .captures_iter(transcript)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let speaker = caps.get(1)?.as_str();
                self.is_registered(speaker).then_some(Header {
                    speaker,
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect()
    }

    /// Concatenate every turn attributed to `speaker`.
    ///
    /// Each turn runs from just after its header to the next header or the
    /// end of the transcript. Turns are trimmed and joined with `\n`. Returns
    /// an empty string when the speaker never appears.
    pub fn extract(&self, transcript: &str, speaker: &str) -> String {
        if speaker.is_empty() {
            return String::new();
        }

        let headers = self.headers(transcript);
        let segments: Vec<&str> = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| header.speaker == speaker)
            .map(|(i, header)| {
                let stop = headers
                    .get(i + 1)
                    .map_or(transcript.len(), |next| next.start);
                transcript[header.end..stop].trim()
            })
            .collect();

        segments.join("\n").trim().to_string()
    }

    /// Names of every speaker with at least one header, in first-seen order
    pub fn speakers_in(&self, transcript: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.headers(transcript)
            .into_iter()
            .filter(|header| seen.insert(header.speaker))
            .map(|header| header.speaker.to_string())
            .collect()
    }

    /// Copy of the transcript for human reading.
    ///
    /// Drops header lines with no inline text and collapses runs of blank
    /// lines into one. Lossy; never feed the result back into [`extract`].
    ///
    /// [`extract`]: Segmenter::extract
    pub fn clean(&self, transcript: &str) -> String {
        let without_headers = self.bare_header.replace_all(transcript, |caps: &Captures| {
            if self.is_registered(&caps[1]) {
                String::new()
            } else {
                caps[0].to_string()
            }
        });

        self.blank_run
            .replace_all(&without_headers, "\n\n")
            .into_owned()
    }
}

/// Whether `name` can appear in a turn header: a non-empty run of ASCII
/// letters, digits and underscores
pub fn is_speaker_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Extract all of `speaker`'s turns from a transcript whose headers are
/// addressed to `coordinator`
pub fn extract_speaker(transcript: &str, speaker: &str, coordinator: &str) -> Result<String> {
    Ok(Segmenter::new(coordinator)?.extract(transcript, speaker))
}

/// Cleaned, display-only copy of a transcript
pub fn clean_for_display(transcript: &str, coordinator: &str) -> Result<String> {
    Ok(Segmenter::new(coordinator)?.clean(transcript))
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: &str = "chat_manager";

    #[test]
    fn test_speaker_names() {
        assert!(is_speaker_name("planner_agent"));
        assert!(is_speaker_name("Agent2"));
        assert!(!is_speaker_name(""));
        assert!(!is_speaker_name("food-guide"));
        assert!(!is_speaker_name("local agent"));
    }

    #[test]
    fn test_single_turn() {
        let transcript = "planner_agent (to chat_manager):\n\n  Day 1: arrive.\nDay 2: museum.  \n";
        assert_eq!(
            extract_speaker(transcript, "planner_agent", M).unwrap(),
            "Day 1: arrive.\nDay 2: museum."
        );
    }

    #[test]
    fn test_absent_speaker_is_empty() {
        let transcript = "planner_agent (to chat_manager):\n\nDay 1\n";
        assert_eq!(extract_speaker(transcript, "local_agent", M).unwrap(), "");
        assert_eq!(extract_speaker("", "local_agent", M).unwrap(), "");
        assert_eq!(extract_speaker(transcript, "", M).unwrap(), "");
    }

    #[test]
    fn test_two_turns_joined() {
        let transcript = "local_agent (to chat_manager):\n\nB1\n\n\
                          local_agent (to chat_manager):\n\nB2\n";
        assert_eq!(extract_speaker(transcript, "local_agent", M).unwrap(), "B1\nB2");
    }

    #[test]
    fn test_turn_stops_at_next_header() {
        let transcript = "user_proxy (to chat_manager):\n\nPlan a trip\n\n\
                          planner_agent (to chat_manager):\n\nItinerary\n\n\
                          language_agent (to chat_manager):\n\nSay merci\n";
        assert_eq!(extract_speaker(transcript, "planner_agent", M).unwrap(), "Itinerary");
        assert_eq!(extract_speaker(transcript, "user_proxy", M).unwrap(), "Plan a trip");
        assert_eq!(extract_speaker(transcript, "language_agent", M).unwrap(), "Say merci");
    }

    #[test]
    fn test_any_speaker_name_bounds_a_turn() {
        // Names without an `_agent` suffix still end the previous turn
        let transcript = "planner_agent (to chat_manager):\n\nItinerary\n\
                          critic (to chat_manager):\n\nToo long\n";
        assert_eq!(extract_speaker(transcript, "planner_agent", M).unwrap(), "Itinerary");
        assert_eq!(extract_speaker(transcript, "critic", M).unwrap(), "Too long");
    }

    #[test]
    fn test_registered_speakers_only() {
        let segmenter = Segmenter::new(M)
            .unwrap()
            .with_speakers(["planner_agent", "user_proxy"]);
        let transcript = "planner_agent (to chat_manager):\n\nItinerary\n\
                          quoted (to chat_manager): not a real turn\n\
                          user_proxy (to chat_manager):\n\nThanks\n";
        assert_eq!(
            segmenter.extract(transcript, "planner_agent"),
            "Itinerary\nquoted (to chat_manager): not a real turn"
        );
    }

    #[test]
    fn test_header_must_start_line() {
        let transcript = "planner_agent (to chat_manager):\n\n\
                          As local_agent (to chat_manager): said, go early.\n";
        assert_eq!(
            extract_speaker(transcript, "planner_agent", M).unwrap(),
            "As local_agent (to chat_manager): said, go early."
        );
    }

    #[test]
    fn test_inline_header_body() {
        let transcript = "local_agent (to chat_manager): Visit the market.\n";
        assert_eq!(
            extract_speaker(transcript, "local_agent", M).unwrap(),
            "Visit the market."
        );
    }

    #[test]
    fn test_name_prefix_does_not_match() {
        let transcript = "travel_planner_agent (to chat_manager):\n\nSummary\n";
        assert_eq!(extract_speaker(transcript, "planner_agent", M).unwrap(), "");
    }

    #[test]
    fn test_other_coordinator_ignored() {
        let transcript = "planner_agent (to host):\n\nItinerary\n";
        assert_eq!(extract_speaker(transcript, "planner_agent", M).unwrap(), "");
        assert_eq!(
            extract_speaker(transcript, "planner_agent", "host").unwrap(),
            "Itinerary"
        );
    }

    #[test]
    fn test_extract_is_idempotent() {
        let segmenter = Segmenter::new(M).unwrap();
        let transcript = "planner_agent (to chat_manager):\n\nA\n\nplanner_agent (to chat_manager):\n\nB\n";
        let first = segmenter.extract(transcript, "planner_agent");
        let second = segmenter.extract(transcript, "planner_agent");
        assert_eq!(first, second);
    }

    #[test]
    fn test_speakers_in_order() {
        let segmenter = Segmenter::new(M).unwrap();
        let transcript = "user_proxy (to chat_manager):\n\nGo\n\
                          planner_agent (to chat_manager):\n\nA\n\
                          user_proxy (to chat_manager):\n\nMore\n";
        assert_eq!(
            segmenter.speakers_in(transcript),
            vec!["user_proxy".to_string(), "planner_agent".to_string()]
        );
    }

    #[test]
    fn test_clean_removes_bare_headers() {
        let transcript = "user_proxy (to chat_manager):\n\nPlan a trip\n\n\n\n\
                          planner_agent (to chat_manager):   \n\nDay 1\n";
        assert_eq!(
            clean_for_display(transcript, M).unwrap(),
            "\n\nPlan a trip\n\nDay 1\n"
        );
    }

    #[test]
    fn test_clean_keeps_inline_headers() {
        let transcript = "local_agent (to chat_manager): Visit the market.\n";
        assert_eq!(clean_for_display(transcript, M).unwrap(), transcript);
    }

    #[test]
    fn test_clean_collapses_whitespace_lines() {
        let transcript = "a\n   \n\t\n\nb\n  indented\n";
        assert_eq!(clean_for_display(transcript, M).unwrap(), "a\n\nb\n  indented\n");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let transcript = "user_proxy (to chat_manager):\n\n\nPlan\n \n \n\
                          planner_agent (to chat_manager):\n\nDay 1\n\n\n\
                          local_agent (to chat_manager): inline\n\n\n";
        let once = clean_for_display(transcript, M).unwrap();
        let twice = clean_for_display(&once, M).unwrap();
        assert_eq!(once, twice);
        assert!(once.contains("local_agent (to chat_manager): inline"));
        assert!(!once.contains("planner_agent (to chat_manager)"));
    }
}
