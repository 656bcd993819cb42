//! Integration tests for the resume matcher

use httpmock::prelude::*;
use resume_matcher::config::ProviderKind;
use resume_matcher::llm::culture::RemoteCultureAnalyzer;
use resume_matcher::models::{Dimension, EducationEntry, EducationLevel};
use resume_matcher::processing::embeddings::RemoteEmbedder;
use resume_matcher::{
    CandidateProfile, Config, InferenceGateway, JobPosting, MatchEngine, MatchRequest, MatcherError,
};
use std::sync::Arc;
use std::time::Duration;

fn config(bias: bool) -> Config {
    let mut config = Config::default();
    config.bias.enabled = bias;
    config
}

fn local_engine(config: &Config) -> MatchEngine {
    let gateway = InferenceGateway::local(config).unwrap();
    MatchEngine::with_gateway(config, gateway).unwrap()
}

fn structured_candidate() -> CandidateProfile {
    CandidateProfile {
        skills: vec!["python".into(), "sql".into()],
        experience_years: 5.0,
        education: vec![EducationEntry {
            institution: "State University".into(),
            degree: "Bachelor of Science".into(),
            field: "Statistics".into(),
        }],
        resume_text: String::new(),
        location: "Columbus, OH".into(),
    }
}

fn structured_job() -> JobPosting {
    JobPosting {
        title: "Analytics Engineer".into(),
        required_skills: vec!["python".into(), "sql".into()],
        min_experience_years: 3.0,
        education_level: EducationLevel::Bachelor,
        ..Default::default()
    }
}

fn narrative_candidate() -> CandidateProfile {
    CandidateProfile {
        resume_text: "Data engineer who led teams with strong communication and leadership. \
                      Built Python and SQL pipelines on Airflow."
            .into(),
        ..structured_candidate()
    }
}

fn narrative_job() -> JobPosting {
    JobPosting {
        description: "We value leadership, communication and teamwork.".into(),
        requirements: vec!["Python and SQL pipelines".into()],
        preferred_skills: vec!["airflow".into(), "dbt".into()],
        ..structured_job()
    }
}

fn chat_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

fn remote_culture(server: &MockServer) -> Arc<RemoteCultureAnalyzer> {
    Arc::new(RemoteCultureAnalyzer::new(
        reqwest::Client::new(),
        &server.url("/v1"),
        "grok-beta",
        "test-key".to_string(),
        0.3,
    ))
}

#[tokio::test]
async fn test_structured_only_scenario() {
    let result = local_engine(&config(false))
        .evaluate(&structured_candidate(), &structured_job())
        .await;

    assert_eq!(result.skills_score, Some(1.0));
    assert!((result.experience_score.unwrap() - 0.95).abs() < 1e-6);
    assert_eq!(result.education_score, Some(1.0));
    assert_eq!(result.text_score, None);
    assert_eq!(result.culture_score, None);

    let expected = (1.0 * 0.35 + 0.95 * 0.25 + 1.0 * 0.15) / (0.35 + 0.25 + 0.15);
    assert!((result.overall_score - expected).abs() < 1e-5);
    assert!(result.missing_skills.is_empty());
    assert_eq!(result.skill_matches, vec!["python", "sql"]);
    assert_eq!(result.bias_score, 0.0);
    assert_eq!(result.fairness_adjustment, 0.0);
    assert!(result.match_explanation.starts_with("Excellent match"));
}

#[tokio::test]
async fn test_structured_scenario_with_fairness_adjustment() {
    let result = local_engine(&config(true))
        .evaluate(&structured_candidate(), &structured_job())
        .await;

    assert!((result.fairness_adjustment - 0.1).abs() < 1e-6);
    assert_eq!(result.experience_score, Some(1.0));
    assert!((result.overall_score - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_local_pipeline_is_deterministic() {
    let engine = local_engine(&config(true));
    let first = engine.evaluate(&narrative_candidate(), &narrative_job()).await;
    let second = engine.evaluate(&narrative_candidate(), &narrative_job()).await;

    assert_eq!(first, second);
    assert!(first.text_score.is_some());
    assert!(first.fallbacks.is_empty());
}

#[tokio::test]
async fn test_keyword_culture_baseline() {
    let result = local_engine(&config(false))
        .evaluate(&narrative_candidate(), &narrative_job())
        .await;

    // leadership + communication of {leadership, communication, teamwork}
    assert!((result.culture_score.unwrap() - 2.0 / 3.0).abs() < 1e-6);
    assert!(result.culture_reasoning.is_none());
    assert_eq!(result.missing_skills, vec!["airflow", "dbt"]);
    assert_eq!(result.recommendations[0], "Consider training in: airflow, dbt");
}

#[tokio::test]
async fn test_scores_stay_in_bounds() {
    let engine = local_engine(&config(true));
    let candidates = [
        CandidateProfile::default(),
        narrative_candidate(),
        CandidateProfile {
            experience_years: 40.0,
            location: "London".into(),
            ..narrative_candidate()
        },
    ];
    let jobs = [
        JobPosting::default(),
        narrative_job(),
        JobPosting {
            min_experience_years: 12.0,
            education_level: EducationLevel::Phd,
            ..narrative_job()
        },
    ];

    for candidate in &candidates {
        for job in &jobs {
            let result = engine.evaluate(candidate, job).await;
            assert!((0.0..=1.0).contains(&result.overall_score));
            for (_, score) in result.dimension_scores().present() {
                assert!((0.0..=1.0).contains(&score));
            }
            assert!(result.experience_gap >= 0.0);
            assert!((0.0..=0.1 + 1e-6).contains(&result.bias_score));
            assert!((0.0..=0.1 + 1e-6).contains(&result.fairness_adjustment));
        }
    }
}

#[tokio::test]
async fn test_fairness_never_lowers_scores() {
    let job = narrative_job();
    let mut candidate = narrative_candidate();
    candidate.location = "San Francisco, CA".into();

    let raw = local_engine(&config(false)).evaluate(&candidate, &job).await;
    let adjusted = local_engine(&config(true)).evaluate(&candidate, &job).await;

    assert!((adjusted.bias_score - 0.05).abs() < 1e-6);
    for dimension in Dimension::ALL {
        match (raw.dimension_scores().get(dimension), adjusted.dimension_scores().get(dimension)) {
            (Some(before), Some(after)) => assert!(after >= before && after <= 1.0),
            (None, None) => {}
            other => panic!("presence changed for {}: {:?}", dimension, other),
        }
    }
}

#[tokio::test]
async fn test_missing_candidate_is_rejected() {
    let request = MatchRequest {
        candidate: None,
        job: Some(structured_job()),
    };
    let err = local_engine(&config(false))
        .evaluate_request(&request)
        .await
        .unwrap_err();
    assert!(matches!(err, MatcherError::InvalidInput(_)));
}

#[tokio::test]
async fn test_remote_culture_success() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key")
            .body_contains("Resume: ")
            .body_contains("Job Description: ");
        then.status(200).json_body(chat_response(
            "```json\n{\"score\": 0.85, \"reasoning\": \"Shared emphasis on leadership\"}\n```",
        ));
    });

    let cfg = config(false);
    let gateway = InferenceGateway::local(&cfg)
        .unwrap()
        .with_culture_analyzer(remote_culture(&server));
    let result = MatchEngine::with_gateway(&cfg, gateway)
        .unwrap()
        .evaluate(&narrative_candidate(), &narrative_job())
        .await;

    mock.assert();
    assert!((result.culture_score.unwrap() - 0.85).abs() < 1e-6);
    assert_eq!(result.culture_reasoning.as_deref(), Some("Shared emphasis on leadership"));
    assert!(result.fallbacks.is_empty());
}

async fn culture_with_failing_server(respond: impl FnOnce(httpmock::Then)) -> resume_matcher::MatchResult {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        respond(then);
    });

    let cfg = config(false);
    let gateway = InferenceGateway::local(&cfg)
        .unwrap()
        .with_culture_analyzer(remote_culture(&server))
        .with_timeout(Duration::from_millis(300));
    MatchEngine::with_gateway(&cfg, gateway)
        .unwrap()
        .evaluate(&narrative_candidate(), &narrative_job())
        .await
}

fn assert_culture_fell_back(result: &resume_matcher::MatchResult) {
    assert!((result.culture_score.unwrap() - 2.0 / 3.0).abs() < 1e-6);
    assert!(result.culture_reasoning.is_none());
    assert_eq!(result.fallbacks.len(), 1);
    assert_eq!(result.fallbacks[0].dimension, Dimension::Culture);
}

#[tokio::test]
async fn test_remote_culture_server_error_falls_back() {
    let result = culture_with_failing_server(|then| {
        then.status(500).body("upstream exploded");
    })
    .await;
    assert_culture_fell_back(&result);
    assert!(result.fallbacks[0].reason.contains("500"));
}

#[tokio::test]
async fn test_remote_culture_malformed_content_falls_back() {
    let result = culture_with_failing_server(|then| {
        then.status(200).json_body(chat_response("I would rate this candidate highly."));
    })
    .await;
    assert_culture_fell_back(&result);
}

#[tokio::test]
async fn test_remote_culture_out_of_range_falls_back() {
    let result = culture_with_failing_server(|then| {
        then.status(200)
            .json_body(chat_response("{\"score\": 8.5, \"reasoning\": \"out of ten\"}"));
    })
    .await;
    assert_culture_fell_back(&result);
    assert!(result.fallbacks[0].reason.contains("out of range"));
}

#[tokio::test]
async fn test_remote_culture_timeout_falls_back() {
    let result = culture_with_failing_server(|then| {
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(chat_response("{\"score\": 0.9, \"reasoning\": \"late\"}"));
    })
    .await;
    assert_culture_fell_back(&result);
    assert!(result.fallbacks[0].reason.contains("Timed out"));
}

#[tokio::test]
async fn test_remote_embeddings_are_used() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/embeddings")
            .header("authorization", "Bearer test-key");
        then.status(200).json_body(serde_json::json!({
            "data": [{ "embedding": [0.6, 0.8, 0.0] }]
        }));
    });

    let cfg = config(false);
    let embedder = RemoteEmbedder::new(
        reqwest::Client::new(),
        &server.url("/v1"),
        "text-embedding-3-small",
        "test-key".to_string(),
    );
    let gateway = InferenceGateway::local(&cfg).unwrap().with_embedder(Arc::new(embedder));
    let result = MatchEngine::with_gateway(&cfg, gateway)
        .unwrap()
        .evaluate(&narrative_candidate(), &narrative_job())
        .await;

    mock.assert_hits(2);
    assert!((result.text_score.unwrap() - 1.0).abs() < 1e-5);
    assert!(result.fallbacks.is_empty());
}

#[tokio::test]
async fn test_remote_embedding_failure_uses_local_vectors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/embeddings");
        then.status(503);
    });

    let cfg = config(false);
    let embedder = RemoteEmbedder::new(
        reqwest::Client::new(),
        &server.url("/v1"),
        "text-embedding-3-small",
        "test-key".to_string(),
    );
    let gateway = InferenceGateway::local(&cfg).unwrap().with_embedder(Arc::new(embedder));
    let fallback = MatchEngine::with_gateway(&cfg, gateway)
        .unwrap()
        .evaluate(&narrative_candidate(), &narrative_job())
        .await;
    let local = local_engine(&cfg)
        .evaluate(&narrative_candidate(), &narrative_job())
        .await;

    assert_eq!(fallback.text_score, local.text_score);
    assert_eq!(fallback.fallbacks.len(), 1);
    assert_eq!(fallback.fallbacks[0].dimension, Dimension::Text);
}

#[tokio::test]
async fn test_remote_culture_from_config() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer configured-key")
            .body_contains("\"model\":\"grok-beta\"");
        then.status(200)
            .json_body(chat_response("{\"score\": 0.4, \"reasoning\": \"Different pace\"}"));
    });

    let key_var = "RESUME_MATCHER_IT_CULTURE_KEY";
    std::env::set_var(key_var, "configured-key");

    let mut cfg = config(false);
    cfg.inference.culture_provider = ProviderKind::Remote;
    cfg.inference.api_url = server.url("/v1");
    cfg.inference.api_key_env = key_var.to_string();
    cfg.inference.timeout_ms = 5_000;

    let result = MatchEngine::from_config(&cfg)
        .unwrap()
        .evaluate(&narrative_candidate(), &narrative_job())
        .await;

    mock.assert();
    assert!((result.culture_score.unwrap() - 0.4).abs() < 1e-6);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r == "Consider cultural fit assessment during interview"));
}
