//! Scores and the match result returned to the caller

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One scoring axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Skills,
    Experience,
    Education,
    Text,
    Culture,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Skills,
        Dimension::Experience,
        Dimension::Education,
        Dimension::Text,
        Dimension::Culture,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Skills => "skills",
            Dimension::Experience => "experience",
            Dimension::Education => "education",
            Dimension::Text => "text",
            Dimension::Culture => "culture",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a scorer produced: its own value, or a substitute after a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Computed(f32),
    Fallback { score: f32, reason: String },
}

impl ScoreOutcome {
    pub fn fallback(score: f32, reason: impl Into<String>) -> Self {
        ScoreOutcome::Fallback {
            score,
            reason: reason.into(),
        }
    }

    pub fn score(&self) -> f32 {
        match self {
            ScoreOutcome::Computed(score) => *score,
            ScoreOutcome::Fallback { score, .. } => *score,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            ScoreOutcome::Computed(_) => None,
            ScoreOutcome::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Per-dimension scores; `None` means the dimension was not computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub skills: Option<f32>,
    pub experience: Option<f32>,
    pub education: Option<f32>,
    pub text: Option<f32>,
    pub culture: Option<f32>,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> Option<f32> {
        match dimension {
            Dimension::Skills => self.skills,
            Dimension::Experience => self.experience,
            Dimension::Education => self.education,
            Dimension::Text => self.text,
            Dimension::Culture => self.culture,
        }
    }

    pub fn set(&mut self, dimension: Dimension, score: Option<f32>) {
        let slot = match dimension {
            Dimension::Skills => &mut self.skills,
            Dimension::Experience => &mut self.experience,
            Dimension::Education => &mut self.education,
            Dimension::Text => &mut self.text,
            Dimension::Culture => &mut self.culture,
        };
        *slot = score;
    }

    /// Present dimensions in declaration order.
    pub fn present(&self) -> impl Iterator<Item = (Dimension, f32)> + '_ {
        Dimension::ALL
            .into_iter()
            .filter_map(move |d| self.get(d).map(|score| (d, score)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackNote {
    pub dimension: Dimension,
    pub reason: String,
}

/// Full assessment returned for one candidate/job pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub overall_score: f32,
    pub skills_score: Option<f32>,
    pub experience_score: Option<f32>,
    pub education_score: Option<f32>,
    pub text_score: Option<f32>,
    pub culture_score: Option<f32>,
    pub skill_matches: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_gap: f32,
    pub match_explanation: String,
    /// Per-dimension explanations keyed by "overall", "skills", "experience".
    pub explanations: BTreeMap<String, String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub bias_score: f32,
    pub fairness_adjustment: f32,
    pub culture_reasoning: Option<String>,
    pub fallbacks: Vec<FallbackNote>,
}

impl MatchResult {
    pub fn dimension_scores(&self) -> DimensionScores {
        DimensionScores {
            skills: self.skills_score,
            experience: self.experience_score,
            education: self.education_score,
            text: self.text_score,
            culture: self.culture_score,
        }
    }
}
