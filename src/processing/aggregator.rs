//! Weighted combination of dimension scores

use crate::config::ScoringConfig;
use crate::models::{Dimension, DimensionScores};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionWeights {
    pub skills: f32,
    pub experience: f32,
    pub education: f32,
    pub text: f32,
    pub culture: f32,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl DimensionWeights {
    pub fn from_config(scoring: &ScoringConfig) -> Self {
        Self {
            skills: scoring.skills_weight,
            experience: scoring.experience_weight,
            education: scoring.education_weight,
            text: scoring.text_weight,
            culture: scoring.culture_weight,
        }
    }

    pub fn weight(&self, dimension: Dimension) -> f32 {
        match dimension {
            Dimension::Skills => self.skills,
            Dimension::Experience => self.experience,
            Dimension::Education => self.education,
            Dimension::Text => self.text,
            Dimension::Culture => self.culture,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    weights: DimensionWeights,
}

impl ScoreAggregator {
    pub fn new(weights: DimensionWeights) -> Self {
        Self { weights }
    }

    /// Weighted mean over the present dimensions only; weights of absent
    /// dimensions are dropped and the rest renormalized.
    pub fn aggregate(&self, scores: &DimensionScores) -> f32 {
        let (weighted, total_weight) = scores
            .present()
            .fold((0.0f32, 0.0f32), |(sum, total), (dimension, score)| {
                let weight = self.weights.weight(dimension);
                (sum + weight * score, total + weight)
            });

        if total_weight <= 0.0 {
            return 0.0;
        }

        (weighted / total_weight).clamp(0.0, 1.0)
    }
}
