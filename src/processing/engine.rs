//! Match engine: runs the scoring pipeline for one candidate/job pair

use crate::config::{Config, RequiredSkillSource};
use crate::error::{MatcherError, Result};
use crate::llm::gateway::InferenceGateway;
use crate::models::{
    CandidateProfile, Dimension, DimensionScores, FallbackNote, JobPosting, MatchRequest, MatchResult,
    ScoreOutcome,
};
use crate::processing::aggregator::{DimensionWeights, ScoreAggregator};
use crate::processing::bias::BiasMitigator;
use crate::processing::explanation::ExplanationGenerator;
use crate::processing::features::{CandidateFeatures, FeatureNormalizer, JobFeatures};
use crate::processing::scoring;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Output of one scorer task.
struct ScorerOutput {
    dimension: Dimension,
    outcome: Option<ScoreOutcome>,
    reasoning: Option<String>,
}

/// Scoring pipeline with its read-only collaborators. Build once and share;
/// every call to [`MatchEngine::evaluate`] is independent.
pub struct MatchEngine {
    normalizer: FeatureNormalizer,
    gateway: Arc<InferenceGateway>,
    bias: BiasMitigator,
    aggregator: ScoreAggregator,
    explainer: ExplanationGenerator,
    enabled: BTreeSet<Dimension>,
    required_skills: RequiredSkillSource,
}

impl MatchEngine {
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway = InferenceGateway::from_config(config)?;
        Self::with_gateway(config, gateway)
    }

    /// Engine around an already-built gateway.
    pub fn with_gateway(config: &Config, gateway: InferenceGateway) -> Result<Self> {
        config.validate()?;

        let enabled = config
            .scoring
            .enabled_dimensions
            .iter()
            .filter_map(|name| Dimension::parse(name))
            .collect();

        info!(
            "Match engine ready: embeddings via {}, culture via {}",
            gateway.embedding_provider_name(),
            gateway.culture_provider_name()
        );

        Ok(Self {
            normalizer: FeatureNormalizer::new(),
            gateway: Arc::new(gateway),
            bias: BiasMitigator::new(config.bias.enabled)?,
            aggregator: ScoreAggregator::new(DimensionWeights::from_config(&config.scoring)),
            explainer: ExplanationGenerator::new(),
            enabled,
            required_skills: config.scoring.required_skills,
        })
    }

    /// Evaluate a request whose candidate or job may be missing.
    pub async fn evaluate_request(&self, request: &MatchRequest) -> Result<MatchResult> {
        let candidate = request
            .candidate
            .as_ref()
            .ok_or_else(|| MatcherError::InvalidInput("candidate profile is missing".to_string()))?;
        let job = request
            .job
            .as_ref()
            .ok_or_else(|| MatcherError::InvalidInput("job posting is missing".to_string()))?;

        Ok(self.evaluate(candidate, job).await)
    }

    /// Score, adjust, aggregate and explain one candidate/job pair.
    pub async fn evaluate(&self, candidate: &CandidateProfile, job: &JobPosting) -> MatchResult {
        let start_time = Instant::now();

        let candidate = Arc::new(self.normalizer.candidate(candidate));
        let job = Arc::new(self.normalizer.job(job));

        let (raw_scores, culture_reasoning, fallbacks) = self.run_scorers(&candidate, &job).await;

        let (scores, adjustment) = self.bias.apply(raw_scores, &candidate.location);
        let overall_score = self.aggregator.aggregate(&scores);
        let explanation = self.explainer.explain(overall_score, &scores, &candidate, &job);

        info!(
            "Match scored {:.1}% across {} dimensions in {:.2?} ({} fallbacks)",
            overall_score * 100.0,
            scores.present().count(),
            start_time.elapsed(),
            fallbacks.len()
        );

        MatchResult {
            overall_score,
            skills_score: scores.skills,
            experience_score: scores.experience,
            education_score: scores.education,
            text_score: scores.text,
            culture_score: scores.culture,
            skill_matches: explanation.skill_matches,
            missing_skills: explanation.missing_skills,
            experience_gap: explanation.experience_gap,
            match_explanation: explanation.match_explanation,
            explanations: explanation.explanations,
            strengths: explanation.strengths,
            weaknesses: explanation.weaknesses,
            recommendations: explanation.recommendations,
            bias_score: adjustment.bias_score,
            fairness_adjustment: adjustment.fairness_adjustment,
            culture_reasoning,
            fallbacks,
        }
    }

    /// Run every enabled scorer concurrently. Dropping the returned future
    /// drops the JoinSet, which aborts whatever is still in flight.
    async fn run_scorers(
        &self,
        candidate: &Arc<CandidateFeatures>,
        job: &Arc<JobFeatures>,
    ) -> (DimensionScores, Option<String>, Vec<FallbackNote>) {
        let mut tasks = JoinSet::new();
        for dimension in self.enabled.iter().copied() {
            let gateway = Arc::clone(&self.gateway);
            let candidate = Arc::clone(candidate);
            let job = Arc::clone(job);
            let required_skills = self.required_skills;

            tasks.spawn(async move {
                run_scorer(dimension, &gateway, &candidate, &job, required_skills).await
            });
        }

        let mut scores = DimensionScores::default();
        let mut culture_reasoning = None;
        let mut fallbacks = Vec::new();
        let mut finished = BTreeSet::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(output) => {
                    finished.insert(output.dimension);
                    if let Some(outcome) = &output.outcome {
                        debug!("{} scored {:.3}", output.dimension, outcome.score());
                        if let Some(reason) = outcome.fallback_reason() {
                            fallbacks.push(FallbackNote {
                                dimension: output.dimension,
                                reason: reason.to_string(),
                            });
                        }
                    }
                    if output.dimension == Dimension::Culture {
                        culture_reasoning = output.reasoning;
                    }
                    scores.set(output.dimension, output.outcome.map(|o| sanitize(o.score())));
                }
                Err(e) => warn!("Scorer task failed: {}", e),
            }
        }

        for dimension in self.enabled.difference(&finished) {
            warn!("No result from the {} scorer; defaulting to 0.0", dimension);
            scores.set(*dimension, Some(0.0));
            fallbacks.push(FallbackNote {
                dimension: *dimension,
                reason: "scorer failed to complete".to_string(),
            });
        }

        fallbacks.sort_by_key(|note| note.dimension);
        (scores, culture_reasoning, fallbacks)
    }
}

async fn run_scorer(
    dimension: Dimension,
    gateway: &InferenceGateway,
    candidate: &CandidateFeatures,
    job: &JobFeatures,
    required_skills: RequiredSkillSource,
) -> ScorerOutput {
    let (outcome, reasoning) = match dimension {
        Dimension::Skills => (
            Some(ScoreOutcome::Computed(scoring::score_skills(candidate, job, required_skills))),
            None,
        ),
        Dimension::Experience => (
            Some(ScoreOutcome::Computed(scoring::score_experience(
                candidate.experience_years,
                job.min_experience_years,
            ))),
            None,
        ),
        Dimension::Education => (
            Some(ScoreOutcome::Computed(scoring::score_education(candidate.education, job.education))),
            None,
        ),
        Dimension::Text => (scoring::score_text(gateway, candidate, job).await, None),
        Dimension::Culture => match scoring::score_culture(gateway, candidate, job).await {
            Some(culture) => (Some(culture.outcome), culture.reasoning),
            None => (None, None),
        },
    };

    ScorerOutput {
        dimension,
        outcome,
        reasoning,
    }
}

fn sanitize(score: f32) -> f32 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::culture::{CultureAnalyzer, CultureAssessment};
    use crate::models::{EducationEntry, EducationLevel};
    use async_trait::async_trait;

    struct PanickingAnalyzer;

    #[async_trait]
    impl CultureAnalyzer for PanickingAnalyzer {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn analyze(&self, _resume: &str, _job: &str) -> Result<CultureAssessment> {
            panic!("analyzer crashed");
        }
    }

    fn offline_config(bias: bool) -> Config {
        let mut config = Config::default();
        config.bias.enabled = bias;
        config
    }

    fn engine(config: &Config) -> MatchEngine {
        let gateway = InferenceGateway::local(config).unwrap();
        MatchEngine::with_gateway(config, gateway).unwrap()
    }

    fn candidate() -> CandidateProfile {
        CandidateProfile {
            skills: vec!["Python".into(), "SQL".into()],
            experience_years: 5.0,
            education: vec![EducationEntry {
                institution: "State University".into(),
                degree: "Bachelor of Science".into(),
                field: "Computer Science".into(),
            }],
            resume_text: String::new(),
            location: "Austin, TX".into(),
        }
    }

    fn job() -> JobPosting {
        JobPosting {
            title: "Data Engineer".into(),
            required_skills: vec!["python".into(), "sql".into()],
            min_experience_years: 3.0,
            education_level: EducationLevel::Bachelor,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_structured_only_match() {
        let result = engine(&offline_config(false)).evaluate(&candidate(), &job()).await;

        assert_eq!(result.skills_score, Some(1.0));
        assert!((result.experience_score.unwrap() - 0.95).abs() < 1e-6);
        assert_eq!(result.education_score, Some(1.0));
        assert_eq!(result.text_score, None);
        assert_eq!(result.culture_score, None);
        assert!((result.overall_score - 0.7375 / 0.75).abs() < 1e-5);
        assert!(result.missing_skills.is_empty());
        assert!(result.fallbacks.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_dimension_is_absent() {
        let mut config = offline_config(false);
        config.scoring.enabled_dimensions = vec!["skills".into(), "education".into()];
        let result = engine(&config).evaluate(&candidate(), &job()).await;

        assert_eq!(result.experience_score, None);
        assert!((result.overall_score - 1.0).abs() < 1e-6);
        assert!(!result.explanations.contains_key("experience"));
    }

    #[tokio::test]
    async fn test_bias_lifts_structured_scores() {
        let result = engine(&offline_config(true)).evaluate(&candidate(), &job()).await;
        assert!((result.fairness_adjustment - 0.1).abs() < 1e-6);
        assert_eq!(result.experience_score, Some(1.0));
        assert!((result.overall_score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_missing_job_is_invalid_input() {
        let request = MatchRequest {
            candidate: Some(candidate()),
            job: None,
        };
        let err = engine(&offline_config(false)).evaluate_request(&request).await.unwrap_err();
        assert!(matches!(err, MatcherError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_crashed_scorer_defaults_to_zero() {
        let config = offline_config(false);
        let gateway = InferenceGateway::local(&config)
            .unwrap()
            .with_culture_analyzer(Arc::new(PanickingAnalyzer));
        let engine = MatchEngine::with_gateway(&config, gateway).unwrap();
        let job = JobPosting {
            description: "Collaborative team that values communication.".into(),
            ..job()
        };

        let result = engine.evaluate(&candidate(), &job).await;

        assert_eq!(result.culture_score, Some(0.0));
        assert_eq!(result.skills_score, Some(1.0));
        assert!((result.experience_score.unwrap() - 0.95).abs() < 1e-6);
        assert_eq!(result.education_score, Some(1.0));
        assert_eq!(
            result.fallbacks,
            vec![FallbackNote {
                dimension: Dimension::Culture,
                reason: "scorer failed to complete".to_string(),
            }]
        );
        assert!(result.culture_reasoning.is_none());
    }

    #[tokio::test]
    async fn test_unrecognized_job_education_is_met_by_anyone() {
        let job: JobPosting = serde_json::from_value(serde_json::json!({
            "required_skills": ["python", "sql"],
            "min_experience_years": 3,
            "education_level": "diploma"
        }))
        .unwrap();
        let candidate = CandidateProfile {
            education: vec![],
            ..candidate()
        };

        let result = engine(&offline_config(false)).evaluate(&candidate, &job).await;
        assert_eq!(result.education_score, Some(1.0));
    }

    #[tokio::test]
    async fn test_capitalised_job_education_is_ranked() {
        let job: JobPosting = serde_json::from_value(serde_json::json!({
            "required_skills": ["python", "sql"],
            "min_experience_years": 3,
            "education_level": "Master"
        }))
        .unwrap();

        let result = engine(&offline_config(false)).evaluate(&candidate(), &job).await;
        // bachelor against master: one rank short
        assert!((result.education_score.unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f32::NAN), 0.0);
        assert_eq!(sanitize(1.4), 1.0);
        assert_eq!(sanitize(-0.2), 0.0);
    }
}
