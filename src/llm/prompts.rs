//! Prompt templates for the culture-fit analysis

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub culture_system: String,
    pub culture_user: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            culture_system: CULTURE_SYSTEM_TEMPLATE.to_string(),
            culture_user: CULTURE_USER_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_excerpt: String,
    pub job_excerpt: String,
}

impl PromptTemplates {
    pub fn render_culture_user(&self, params: &PromptParams) -> String {
        log::debug!(
            "Rendering culture prompt: resume excerpt {} chars, job excerpt {} chars",
            params.resume_excerpt.chars().count(),
            params.job_excerpt.chars().count()
        );

        // only placeholders in the template expand, never ones inside the excerpts
        self.culture_user
            .split("{resume}")
            .map(|part| part.replace("{job}", &params.job_excerpt))
            .collect::<Vec<_>>()
            .join(&params.resume_excerpt)
    }
}

const CULTURE_SYSTEM_TEMPLATE: &str = "Analyze the cultural fit between a candidate's resume and a job description. \
Consider soft skills, work style, and values. \
Return a JSON with a 'score' field (0-1) and 'reasoning' field.";

const CULTURE_USER_TEMPLATE: &str = "Resume: {resume}\n\nJob Description: {job}";
