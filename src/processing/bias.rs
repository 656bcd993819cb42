//! Location-proxy bias correction
//!
//! This is a placeholder heuristic, kept for parity with the scoring it
//! replaces. It has no demonstrated fairness validity.

use crate::error::{MatcherError, Result};
use crate::models::DimensionScores;
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const PROXY_LOCATIONS: [&str; 3] = ["new york", "san francisco", "london"];

const PROXY_WEIGHT: f32 = 0.05;
const MAX_BIAS: f32 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BiasAdjustment {
    pub bias_score: f32,
    pub fairness_adjustment: f32,
}

pub struct BiasMitigator {
    enabled: bool,
    locations: AhoCorasick,
}

impl BiasMitigator {
    pub fn new(enabled: bool) -> Result<Self> {
        let locations = AhoCorasick::new(PROXY_LOCATIONS).map_err(|e| {
            MatcherError::Configuration(format!("Failed to build location matcher: {}", e))
        })?;
        Ok(Self { enabled, locations })
    }

    /// Bias proxy for a location: 0.05 per distinct major city named, at most 0.1.
    pub fn assess(&self, location: &str) -> BiasAdjustment {
        if !self.enabled {
            return BiasAdjustment::default();
        }

        let lowered = location.to_lowercase();
        let hits: BTreeSet<usize> = self
            .locations
            .find_overlapping_iter(&lowered)
            .map(|m| m.pattern().as_usize())
            .collect();

        let bias_score = (hits.len() as f32 * PROXY_WEIGHT).min(MAX_BIAS);
        BiasAdjustment {
            bias_score,
            fairness_adjustment: (MAX_BIAS - bias_score).max(0.0),
        }
    }

    /// Lift every present score by the fairness adjustment, capped at 1.0.
    /// Absent dimensions stay absent.
    pub fn apply(&self, scores: DimensionScores, location: &str) -> (DimensionScores, BiasAdjustment) {
        let adjustment = self.assess(location);
        if adjustment.fairness_adjustment <= 0.0 {
            return (scores, adjustment);
        }

        let mut adjusted = scores;
        for (dimension, score) in scores.present() {
            adjusted.set(dimension, Some((score + adjustment.fairness_adjustment).min(1.0)));
        }

        log::debug!(
            "Bias proxy {:.2}, fairness adjustment {:.2}",
            adjustment.bias_score,
            adjustment.fairness_adjustment
        );
        (adjusted, adjustment)
    }
}
