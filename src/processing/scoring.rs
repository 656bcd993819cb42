//! The five dimension scorers
//!
//! Skills, experience and education are pure functions of the normalized
//! features. Text and culture go through the [`InferenceGateway`] and report
//! `None` when the free text they need is empty.

use crate::config::RequiredSkillSource;
use crate::llm::gateway::{CultureOutcome, InferenceGateway};
use crate::models::{EducationLevel, ScoreOutcome};
use crate::processing::features::{CandidateFeatures, JobFeatures};
use std::collections::BTreeSet;

/// The first `len / REQUIRED_PREFIX_DIVISOR` entries of the job's combined
/// skill list are treated as required for the skills boost.
pub const REQUIRED_PREFIX_DIVISOR: usize = 2;

/// Skills the boost treats as required.
pub fn required_skills(job: &JobFeatures, source: RequiredSkillSource) -> BTreeSet<String> {
    match source {
        RequiredSkillSource::CombinedPrefix => {
            let count = job.combined_skills.len() / REQUIRED_PREFIX_DIVISOR;
            job.combined_skills.iter().take(count).cloned().collect()
        }
        RequiredSkillSource::Declared => job.required_skills.clone(),
    }
}

/// Jaccard overlap of the skill sets, averaged with the share of required
/// skills the candidate holds.
pub fn score_skills(candidate: &CandidateFeatures, job: &JobFeatures, source: RequiredSkillSource) -> f32 {
    let job_skills = job.all_skills();

    let union = candidate.skills.union(&job_skills).count();
    if union == 0 {
        return 0.0;
    }

    let matches: BTreeSet<&String> = candidate.skills.intersection(&job_skills).collect();
    let jaccard = matches.len() as f32 / union as f32;

    let required = required_skills(job, source);
    let score = if required.is_empty() {
        jaccard
    } else {
        let required_matches = required.iter().filter(|s| matches.contains(s)).count();
        let required_boost = required_matches as f32 / required.len() as f32;
        (jaccard + required_boost) / 2.0
    };

    score.clamp(0.0, 1.0)
}

pub fn score_experience(years: f32, min_years: f32) -> f32 {
    if years >= min_years {
        if years <= min_years * 1.5 {
            1.0
        } else {
            // overqualified decays slowly and never below 0.7
            (1.0 - (years - min_years * 1.5) / 10.0).max(0.7)
        }
    } else {
        let gap = min_years - years;
        if gap <= 1.0 {
            0.8
        } else if gap <= 3.0 {
            0.5
        } else {
            0.2
        }
    }
}

pub fn score_education(candidate: EducationLevel, required: EducationLevel) -> f32 {
    let have = candidate.rank();
    let need = required.rank();
    if have >= need {
        1.0
    } else {
        (1.0 - f32::from(need - have) * 0.2).max(0.3)
    }
}

/// Semantic similarity of résumé and job text; `None` when either is empty.
pub async fn score_text(
    gateway: &InferenceGateway,
    candidate: &CandidateFeatures,
    job: &JobFeatures,
) -> Option<ScoreOutcome> {
    if candidate.text.trim().is_empty() || job.text.trim().is_empty() {
        return None;
    }
    Some(gateway.text_similarity(&candidate.text, &job.text).await)
}

/// Culture fit; `None` when the job has no free text to compare against.
pub async fn score_culture(
    gateway: &InferenceGateway,
    candidate: &CandidateFeatures,
    job: &JobFeatures,
) -> Option<CultureOutcome> {
    if job.text.trim().is_empty() {
        return None;
    }
    Some(gateway.analyze_culture(&candidate.text, &job.text).await)
}
