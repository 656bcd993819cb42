//! Console and JSON rendering of a match result

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::models::{Dimension, MatchResult};
use colored::{Color, Colorize};

pub trait OutputFormatter {
    fn format_result(&self, result: &MatchResult) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Human-readable report with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Formatter for `format`, configured from the `[output]` section.
pub fn formatter_for(format: OutputFormat, config: &OutputConfig) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(config.color_output)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.pretty_json)),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    /// Tier from the unrounded score so it agrees with the match explanation.
    fn format_score_badge(&self, score: f32) -> String {
        let (badge, color) = if score >= 0.8 {
            ("EXCELLENT", Color::Green)
        } else if score >= 0.6 {
            ("GOOD", Color::BrightGreen)
        } else if score >= 0.4 {
            ("MODERATE", Color::Yellow)
        } else {
            ("LIMITED", Color::BrightRed)
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_dimension(&self, dimension: Dimension, score: Option<f32>) -> String {
        let label = match dimension {
            Dimension::Skills => "Skills",
            Dimension::Experience => "Experience",
            Dimension::Education => "Education",
            Dimension::Text => "Text similarity",
            Dimension::Culture => "Culture fit",
        };

        match score {
            Some(score) => format!("  {:<16} {:>5.1}%\n", label, score * 100.0),
            None => format!("  {:<16} {}\n", label, self.colorize("n/a", Color::BrightBlack)),
        }
    }

    fn format_list(&self, output: &mut String, title: &str, items: &[String], color: Color) {
        if items.is_empty() {
            return;
        }
        output.push_str(&self.format_header(title, 3));
        for item in items {
            output.push_str(&format!("  • {}\n", self.colorize(item, color)));
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_result(&self, result: &MatchResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("MATCH ASSESSMENT", 1));

        let percentage = (result.overall_score * 100.0).round().clamp(0.0, 100.0) as u8;
        output.push_str(&format!(
            "Overall Score: {}% {}\n",
            percentage,
            self.format_score_badge(result.overall_score)
        ));
        output.push_str(&format!("{}\n", self.colorize(&result.match_explanation, Color::Cyan)));

        output.push_str(&self.format_header("Score Breakdown", 2));
        let scores = result.dimension_scores();
        for dimension in Dimension::ALL {
            output.push_str(&self.format_dimension(dimension, scores.get(dimension)));
        }
        if result.fairness_adjustment > 0.0 || result.bias_score > 0.0 {
            output.push_str(&format!(
                "  Fairness adjustment +{:.2} (bias proxy {:.2})\n",
                result.fairness_adjustment, result.bias_score
            ));
        }

        if !result.skill_matches.is_empty() || !result.missing_skills.is_empty() {
            output.push_str(&self.format_header("Skills", 2));
            if !result.skill_matches.is_empty() {
                output.push_str(&format!(
                    "  Matched: {}\n",
                    self.colorize(&result.skill_matches.join(", "), Color::Green)
                ));
            }
            if !result.missing_skills.is_empty() {
                output.push_str(&format!(
                    "  Missing: {}\n",
                    self.colorize(&result.missing_skills.join(", "), Color::Red)
                ));
            }
        }
        if result.experience_gap > 0.0 {
            output.push_str(&format!("  Experience gap: {:.1} years\n", result.experience_gap));
        }

        self.format_list(&mut output, "Strengths", &result.strengths, Color::Green);
        self.format_list(&mut output, "Weaknesses", &result.weaknesses, Color::Yellow);
        self.format_list(&mut output, "Recommendations", &result.recommendations, Color::White);

        if let Some(reasoning) = result.culture_reasoning.as_deref().filter(|r| !r.is_empty()) {
            output.push_str(&self.format_header("Culture Analysis", 3));
            output.push_str(&format!("  {}\n", reasoning));
        }

        if !result.fallbacks.is_empty() {
            output.push_str(&self.format_header("Fallbacks", 4));
            for note in &result.fallbacks {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    self.colorize("!", Color::Yellow),
                    note.dimension,
                    note.reason
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, result: &MatchResult) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(result)?)
        } else {
            Ok(serde_json::to_string(result)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}
