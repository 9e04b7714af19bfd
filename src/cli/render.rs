//! Terminal rendering of a finished travel plan

use std::fmt::Write;

use crate::agent::TravelPlan;

/// One titled section of the rendered plan
struct Section<'a> {
    heading: &'a str,
    content: Option<&'a str>,
    placeholder: &'a str,
}

const RULE: &str = "─────────────────────────────────────────────";

/// Success line shown above the plan
pub fn success_line(plan: &TravelPlan) -> String {
    format!(
        "✅ Your {}-day travel plan for {} is ready!",
        plan.request.days, plan.request.destination
    )
}

/// Render every section of `plan`. The process log is only included when
/// `show_log` is set.
pub fn render_plan(plan: &TravelPlan, show_log: bool) -> String {
    let sections = [
        Section {
            heading: "## 📋 Final Travel Plan",
            content: plan.final_plan.as_deref(),
            placeholder: "No final plan was generated. Please try again.",
        },
        Section {
            heading: "## 🗓️ Itinerary Planning",
            content: plan.itinerary.as_deref(),
            placeholder: "No planner content was generated.",
        },
        Section {
            heading: "## 🏙️ Local Attractions & Activities",
            content: plan.local_activities.as_deref(),
            placeholder: "No local activities content was generated.",
        },
        Section {
            heading: "## 🗣️ Language Guide",
            content: plan.language_tips.as_deref(),
            placeholder: "No language tips were generated.",
        },
    ];

    let mut out = String::new();
    let _ = writeln!(out, "{}\n", success_line(plan));

    for section in &sections {
        let _ = writeln!(out, "{}\n", section.heading);
        match section.content {
            Some(content) => {
                let _ = writeln!(out, "{}\n", content);
            }
            None => {
                let _ = writeln!(out, "ℹ️  {}\n", section.placeholder);
            }
        }
        let _ = writeln!(out, "{}\n", RULE);
    }

    if show_log {
        let _ = writeln!(out, "## 🔄 AI Planning Process Log\n");
        let _ = writeln!(out, "{}", plan.process_log);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::TripRequest;
    use crate::core::config::TripConfig;
    use crate::transcript::{Transcript, TurnLog};

    fn plan(final_plan: Option<&str>) -> TravelPlan {
        TravelPlan {
            request: TripRequest::new("Kyoto", 2, &TripConfig::default()).unwrap(),
            final_plan: final_plan.map(String::from),
            itinerary: Some("Day 1: temples".to_string()),
            local_activities: None,
            language_tips: None,
            process_log: "user_proxy (to chat_manager):\n\nPlan a trip".to_string(),
            transcript: Transcript::new(""),
            turns: TurnLog::new(),
        }
    }

    #[test]
    fn test_render_uses_placeholders() {
        let text = render_plan(&plan(None), false);
        assert!(text.starts_with("✅ Your 2-day travel plan for Kyoto is ready!"));
        assert!(text.contains("No final plan was generated. Please try again."));
        assert!(text.contains("Day 1: temples"));
        assert!(text.contains("No language tips were generated."));
    }

    #[test]
    fn test_process_log_hidden_by_default() {
        let hidden = render_plan(&plan(Some("# Kyoto")), false);
        assert!(!hidden.contains("Process Log"));

        let shown = render_plan(&plan(Some("# Kyoto")), true);
        assert!(shown.contains("## 🔄 AI Planning Process Log"));
        assert!(shown.contains("user_proxy (to chat_manager):"));
    }
}
