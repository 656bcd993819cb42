//! Natural-language explanation of a match

use crate::models::{Dimension, DimensionScores};
use crate::processing::features::{CandidateFeatures, JobFeatures};
use std::collections::BTreeMap;

/// Score at or above which a dimension counts as a strength.
pub const STRENGTH_THRESHOLD: f32 = 0.7;
/// Culture score below which an interview assessment is recommended.
pub const CULTURE_REVIEW_THRESHOLD: f32 = 0.5;
const MAX_TRAINING_SKILLS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Explanation {
    pub match_explanation: String,
    pub explanations: BTreeMap<String, String>,
    pub skill_matches: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_gap: f32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExplanationGenerator;

impl ExplanationGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn explain(
        &self,
        overall: f32,
        scores: &DimensionScores,
        candidate: &CandidateFeatures,
        job: &JobFeatures,
    ) -> Explanation {
        let match_explanation = overall_tier(overall).to_string();

        let mut explanations = BTreeMap::new();
        explanations.insert("overall".to_string(), match_explanation.clone());
        if let Some(skills) = scores.skills {
            explanations.insert("skills".to_string(), skills_tier(skills).to_string());
        }
        if let Some(experience) = scores.experience {
            explanations.insert("experience".to_string(), experience_tier(experience).to_string());
        }

        // BTreeSet iteration keeps both lists sorted
        let job_skills = job.all_skills();
        let skill_matches: Vec<String> = job_skills.intersection(&candidate.skills).cloned().collect();
        let missing_skills: Vec<String> = job_skills.difference(&candidate.skills).cloned().collect();

        let experience_gap = (job.min_experience_years - candidate.experience_years).max(0.0);

        let (strengths, weaknesses) = strengths_and_weaknesses(scores);

        let mut recommendations = Vec::new();
        if !missing_skills.is_empty() {
            let first: Vec<&str> = missing_skills
                .iter()
                .take(MAX_TRAINING_SKILLS)
                .map(String::as_str)
                .collect();
            recommendations.push(format!("Consider training in: {}", first.join(", ")));
        }
        if experience_gap > 0.0 {
            recommendations.push(format!(
                "May need {} more years of experience",
                format_years(experience_gap)
            ));
        }
        if scores.culture.is_some_and(|c| c < CULTURE_REVIEW_THRESHOLD) {
            recommendations.push("Consider cultural fit assessment during interview".to_string());
        }

        Explanation {
            match_explanation,
            explanations,
            skill_matches,
            missing_skills,
            experience_gap,
            strengths,
            weaknesses,
            recommendations,
        }
    }
}

fn overall_tier(score: f32) -> &'static str {
    if score >= 0.8 {
        "Excellent match! This candidate has strong alignment with the job requirements."
    } else if score >= 0.6 {
        "Good match. The candidate meets most requirements with some areas for development."
    } else if score >= 0.4 {
        "Moderate match. The candidate has some relevant experience but may need additional training."
    } else {
        "Limited match. The candidate may not be the best fit for this position."
    }
}

fn skills_tier(score: f32) -> &'static str {
    if score >= 0.8 {
        "Strong skill alignment with the job requirements."
    } else if score >= 0.5 {
        "Partial skill match. Some key skills are present."
    } else {
        "Limited skill overlap with job requirements."
    }
}

fn experience_tier(score: f32) -> &'static str {
    if score >= 0.8 {
        "Experience level well-suited for the position."
    } else if score >= 0.5 {
        "Experience level is acceptable with some gaps."
    } else {
        "Experience level may be insufficient for the role."
    }
}

fn strengths_and_weaknesses(scores: &DimensionScores) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    let notes = [
        (Dimension::Skills, "Strong technical skills alignment", "Limited technical skills match"),
        (Dimension::Experience, "Adequate experience level", "May need additional experience"),
        (Dimension::Culture, "Good cultural fit indicators", "Cultural fit may need assessment"),
    ];

    for (dimension, strength, weakness) in notes {
        match scores.get(dimension) {
            Some(score) if score >= STRENGTH_THRESHOLD => strengths.push(strength.to_string()),
            Some(_) => weaknesses.push(weakness.to_string()),
            None => {}
        }
    }

    (strengths, weaknesses)
}

/// Whole years print without a fractional part.
fn format_years(years: f32) -> String {
    if (years - years.round()).abs() < 1e-4 {
        format!("{}", years.round() as i64)
    } else {
        format!("{:.1}", years)
    }
}
