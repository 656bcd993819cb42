//! Culture-fit analysis: remote LLM grading and the local keyword baseline

use crate::error::{MatcherError, Result};
use crate::llm::prompts::{PromptParams, PromptTemplates};
use aho_corasick::AhoCorasick;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Soft skills the keyword baseline looks for.
pub const SOFT_SKILLS: [&str; 11] = [
    "teamwork",
    "leadership",
    "communication",
    "problem solving",
    "collaboration",
    "initiative",
    "adaptability",
    "creativity",
    "time management",
    "organization",
    "attention to detail",
];

/// Baseline score when the job text names no soft skill at all.
pub const NEUTRAL_CULTURE_SCORE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct CultureAssessment {
    pub score: f32,
    pub reasoning: String,
}

#[async_trait]
pub trait CultureAnalyzer: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, resume_excerpt: &str, job_excerpt: &str) -> Result<CultureAssessment>;
}

/// Deterministic soft-skill overlap between résumé and job text.
pub struct KeywordCultureAnalyzer {
    matcher: AhoCorasick,
}

impl KeywordCultureAnalyzer {
    pub fn new() -> Result<Self> {
        let matcher = AhoCorasick::new(SOFT_SKILLS).map_err(|e| {
            MatcherError::Configuration(format!("Failed to build soft-skill matcher: {}", e))
        })?;
        Ok(Self { matcher })
    }

    /// Soft skills mentioned anywhere in `text`, case-insensitively.
    pub fn soft_skills_in(&self, text: &str) -> BTreeSet<&'static str> {
        let lowered = text.to_lowercase();
        self.matcher
            .find_overlapping_iter(&lowered)
            .map(|m| SOFT_SKILLS[m.pattern().as_usize()])
            .collect()
    }

    pub fn assess(&self, resume_text: &str, job_text: &str) -> CultureAssessment {
        let job_skills = self.soft_skills_in(job_text);
        if job_skills.is_empty() {
            return CultureAssessment {
                score: NEUTRAL_CULTURE_SCORE,
                reasoning: "Job description names no soft skills; neutral score".to_string(),
            };
        }

        let resume_skills = self.soft_skills_in(resume_text);
        let shared = job_skills.intersection(&resume_skills).count();
        let score = (shared as f32 / job_skills.len() as f32).min(1.0);

        CultureAssessment {
            score,
            reasoning: format!(
                "{} of {} soft skills named in the job description appear in the resume",
                shared,
                job_skills.len()
            ),
        }
    }
}

#[async_trait]
impl CultureAnalyzer for KeywordCultureAnalyzer {
    fn name(&self) -> &str {
        "keyword-baseline"
    }

    async fn analyze(&self, resume_excerpt: &str, job_excerpt: &str) -> Result<CultureAssessment> {
        Ok(self.assess(resume_excerpt, job_excerpt))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAssessment {
    score: f64,
    #[serde(default)]
    reasoning: String,
}

/// LLM-graded culture fit over an OpenAI-compatible chat completions API.
pub struct RemoteCultureAnalyzer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    templates: PromptTemplates,
    json_object: Regex,
}

impl RemoteCultureAnalyzer {
    pub fn new(client: Client, api_url: &str, model: &str, api_key: String, temperature: f32) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", api_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
            temperature,
            templates: PromptTemplates::default(),
            json_object: Regex::new(r#"\{\s*""#).expect("Invalid JSON object regex"),
        }
    }

    /// Pull the assessment out of the assistant message, tolerating fences and prose.
    /// The first object that reads as an assessment wins; trailing text is ignored.
    fn parse_assessment(&self, content: &str) -> Result<CultureAssessment> {
        let text = strip_json_fences(content);
        let raw = self
            .json_object
            .find_iter(text)
            .find_map(|m| {
                serde_json::Deserializer::from_str(&text[m.start()..])
                    .into_iter::<RawAssessment>()
                    .next()
                    .and_then(|parsed| parsed.ok())
            })
            .ok_or_else(|| {
                MatcherError::Inference("culture response contained no JSON assessment".to_string())
            })?;

        if !raw.score.is_finite() || !(0.0..=1.0).contains(&raw.score) {
            return Err(MatcherError::Inference(format!(
                "culture score out of range: {}",
                raw.score
            )));
        }

        Ok(CultureAssessment {
            score: raw.score as f32,
            reasoning: raw.reasoning,
        })
    }
}

#[async_trait]
impl CultureAnalyzer for RemoteCultureAnalyzer {
    fn name(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, resume_excerpt: &str, job_excerpt: &str) -> Result<CultureAssessment> {
        let user_prompt = self.templates.render_culture_user(&PromptParams {
            resume_excerpt: resume_excerpt.to_string(),
            job_excerpt: job_excerpt.to_string(),
        });

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.templates.culture_system,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MatcherError::Inference(format!(
                "culture service returned {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| MatcherError::Inference("culture response had no content".to_string()))?;

        let assessment = self.parse_assessment(&content)?;
        log::debug!("Remote culture score {:.3} from {}", assessment.score, self.model);
        Ok(assessment)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped.strip_suffix("```").map(str::trim).unwrap_or(stripped)
        }
        None => text,
    }
}
