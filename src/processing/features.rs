//! Feature normalization: raw profile/job fields into comparable feature sets

use crate::models::{CandidateProfile, EducationEntry, EducationLevel, JobPosting};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFeatures {
    pub skills: BTreeSet<String>,
    pub experience_years: f32,
    pub education: EducationLevel,
    pub text: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobFeatures {
    pub required_skills: BTreeSet<String>,
    pub preferred_skills: BTreeSet<String>,
    /// Required then preferred, canonical and de-duplicated, in posting order.
    pub combined_skills: Vec<String>,
    pub min_experience_years: f32,
    pub education: EducationLevel,
    pub text: String,
}

impl JobFeatures {
    pub fn all_skills(&self) -> BTreeSet<String> {
        self.combined_skills.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureNormalizer;

impl FeatureNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn candidate(&self, profile: &CandidateProfile) -> CandidateFeatures {
        CandidateFeatures {
            skills: profile.skills.iter().filter_map(|s| canonical_skill(s)).collect(),
            experience_years: non_negative(profile.experience_years),
            education: highest_education(&profile.education),
            text: profile.resume_text.clone(),
            location: profile.location.clone(),
        }
    }

    pub fn job(&self, job: &JobPosting) -> JobFeatures {
        let mut seen = HashSet::new();
        let combined_skills = job
            .required_skills
            .iter()
            .chain(job.preferred_skills.iter())
            .filter_map(|s| canonical_skill(s))
            .filter(|s| seen.insert(s.clone()))
            .collect();

        JobFeatures {
            required_skills: job.required_skills.iter().filter_map(|s| canonical_skill(s)).collect(),
            preferred_skills: job.preferred_skills.iter().filter_map(|s| canonical_skill(s)).collect(),
            combined_skills,
            min_experience_years: non_negative(job.min_experience_years),
            education: job.education_level,
            text: job_text(job),
        }
    }
}

/// Lower-cased, trimmed skill; `None` for blank entries.
pub fn canonical_skill(skill: &str) -> Option<String> {
    let skill = skill.trim().to_lowercase();
    if skill.is_empty() {
        None
    } else {
        Some(skill)
    }
}

/// Highest level reached; unmatched entries are ignored, nothing matched means bachelor.
pub fn highest_education(entries: &[EducationEntry]) -> EducationLevel {
    entries
        .iter()
        .filter_map(|e| EducationLevel::from_degree(&e.degree))
        .max_by_key(|level| level.rank())
        .unwrap_or_default()
}

/// Prefix of at most `max_chars` characters, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn job_text(job: &JobPosting) -> String {
    let requirements: Vec<&str> = job
        .requirements
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();

    if requirements.is_empty() {
        return job.description.clone();
    }

    let mut text = job.description.clone();
    for line in requirements {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
    }
    text
}
