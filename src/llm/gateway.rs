//! Inference gateway: the only path from scorers to embedding and LLM services.
//!
//! Every external call is bounded by the configured timeout and never fails
//! outward. On timeout, transport error, non-success status or a malformed
//! payload the gateway logs a warning and answers from its local,
//! deterministic baseline instead, reporting the outcome as a fallback.

use crate::config::{Config, ProviderKind};
use crate::error::{MatcherError, Result};
use crate::llm::culture::{CultureAnalyzer, KeywordCultureAnalyzer, RemoteCultureAnalyzer};
use crate::models::ScoreOutcome;
use crate::processing::embeddings::{cosine_similarity, EmbeddingProvider, HashingEmbedder, RemoteEmbedder};
use crate::processing::features::truncate_chars;
use log::{debug, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// An embedding plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    pub provider: String,
    pub fallback_reason: Option<String>,
}

/// Culture score plus the free-text reasoning behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct CultureOutcome {
    pub outcome: ScoreOutcome,
    pub reasoning: Option<String>,
}

pub struct InferenceGateway {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    local_embedder: HashingEmbedder,
    culture: Option<Arc<dyn CultureAnalyzer>>,
    keyword_culture: KeywordCultureAnalyzer,
    timeout: Duration,
    embedding_prefix_chars: usize,
    culture_excerpt_chars: usize,
}

impl InferenceGateway {
    /// Gateway that never leaves the process.
    pub fn local(config: &Config) -> Result<Self> {
        Ok(Self {
            embedder: None,
            local_embedder: HashingEmbedder::new(config.embedding.dimension),
            culture: None,
            keyword_culture: KeywordCultureAnalyzer::new()?,
            timeout: Duration::from_millis(config.inference.timeout_ms),
            embedding_prefix_chars: config.processing.embedding_prefix_chars,
            culture_excerpt_chars: config.processing.culture_excerpt_chars,
        })
    }

    /// Build the providers selected in `config`. Clients and models are created
    /// once here and shared read-only by every match call.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut gateway = Self::local(config)?;
        let api_key = config.api_key();

        let needs_http = config.embedding.provider == ProviderKind::Remote
            || config.inference.culture_provider == ProviderKind::Remote;
        let client = if needs_http {
            Some(
                reqwest::Client::builder()
                    .timeout(gateway.timeout)
                    .build()?,
            )
        } else {
            None
        };

        match (config.embedding.provider, &client, &api_key) {
            (ProviderKind::Local, _, _) => {}
            (ProviderKind::Remote, Some(client), Some(key)) => {
                gateway.embedder = Some(Arc::new(RemoteEmbedder::new(
                    client.clone(),
                    &config.embedding.api_url,
                    &config.embedding.model,
                    key.clone(),
                )));
            }
            (ProviderKind::Remote, _, _) => {
                warn!(
                    "Remote embeddings selected but {} is not set; using local embeddings",
                    config.inference.api_key_env
                );
            }
            (ProviderKind::Model2vec, _, _) => {
                gateway.embedder = load_model2vec(config);
            }
        }

        match (config.inference.culture_provider, &client, &api_key) {
            (ProviderKind::Remote, Some(client), Some(key)) => {
                gateway.culture = Some(Arc::new(RemoteCultureAnalyzer::new(
                    client.clone(),
                    &config.inference.api_url,
                    &config.inference.model,
                    key.clone(),
                    config.inference.temperature,
                )));
            }
            (ProviderKind::Remote, _, _) => {
                warn!(
                    "Remote culture analysis selected but {} is not set; using keyword baseline",
                    config.inference.api_key_env
                );
            }
            (ProviderKind::Model2vec, _, _) => {
                warn!("model2vec is not a culture provider; using keyword baseline");
            }
            (ProviderKind::Local, _, _) => {}
        }

        Ok(gateway)
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_culture_analyzer(mut self, analyzer: Arc<dyn CultureAnalyzer>) -> Self {
        self.culture = Some(analyzer);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn embedding_provider_name(&self) -> &str {
        self.embedder
            .as_ref()
            .map(|e| e.name())
            .unwrap_or_else(|| self.local_embedder.name())
    }

    pub fn culture_provider_name(&self) -> &str {
        self.culture
            .as_ref()
            .map(|c| c.name())
            .unwrap_or_else(|| self.keyword_culture.name())
    }

    /// Embed the bounded prefix of `text`.
    pub async fn embed(&self, text: &str) -> Embedding {
        let prefix = truncate_chars(text, self.embedding_prefix_chars);

        if let Some(embedder) = &self.embedder {
            match self.bounded(embedder.embed(prefix)).await {
                Ok(vector) => {
                    return Embedding {
                        vector,
                        provider: embedder.name().to_string(),
                        fallback_reason: None,
                    }
                }
                Err(e) => {
                    warn!("Embedding via {} failed, using local embeddings: {}", embedder.name(), e);
                    return Embedding {
                        vector: self.local_embedder.embed_sync(prefix),
                        provider: self.local_embedder.name().to_string(),
                        fallback_reason: Some(e.to_string()),
                    };
                }
            }
        }

        Embedding {
            vector: self.local_embedder.embed_sync(prefix),
            provider: self.local_embedder.name().to_string(),
            fallback_reason: None,
        }
    }

    /// Cosine similarity of the two texts' embeddings, negatives clamped to 0.
    ///
    /// Both texts are embedded by the same provider: if the primary fails for
    /// either one, both are re-embedded locally.
    pub async fn text_similarity(&self, candidate_text: &str, job_text: &str) -> ScoreOutcome {
        let candidate_prefix = truncate_chars(candidate_text, self.embedding_prefix_chars);
        let job_prefix = truncate_chars(job_text, self.embedding_prefix_chars);

        let fallback_reason = match &self.embedder {
            Some(embedder) => {
                let (a, b) = tokio::join!(
                    self.bounded(embedder.embed(candidate_prefix)),
                    self.bounded(embedder.embed(job_prefix)),
                );
                match (a, b) {
                    (Ok(a), Ok(b)) => match cosine_similarity(&a, &b) {
                        Ok(similarity) => return ScoreOutcome::Computed(clamp_unit(similarity)),
                        Err(e) => Some(e.to_string()),
                    },
                    (Err(e), _) | (_, Err(e)) => Some(e.to_string()),
                }
            }
            None => None,
        };

        let a = self.local_embedder.embed_sync(candidate_prefix);
        let b = self.local_embedder.embed_sync(job_prefix);
        // same embedder, same dimension
        let similarity = clamp_unit(cosine_similarity(&a, &b).unwrap_or(0.0));

        match fallback_reason {
            Some(reason) => {
                warn!("Text similarity fell back to local embeddings: {}", reason);
                ScoreOutcome::fallback(similarity, reason)
            }
            None => ScoreOutcome::Computed(similarity),
        }
    }

    /// Culture fit of the résumé against the job text.
    pub async fn analyze_culture(&self, resume_text: &str, job_text: &str) -> CultureOutcome {
        if let Some(analyzer) = &self.culture {
            let resume_excerpt = truncate_chars(resume_text, self.culture_excerpt_chars);
            let job_excerpt = truncate_chars(job_text, self.culture_excerpt_chars);

            match self.bounded(analyzer.analyze(resume_excerpt, job_excerpt)).await {
                Ok(assessment) => {
                    return CultureOutcome {
                        outcome: ScoreOutcome::Computed(clamp_unit(assessment.score)),
                        reasoning: Some(assessment.reasoning),
                    }
                }
                Err(e) => {
                    warn!("Culture analysis via {} failed, using keyword baseline: {}", analyzer.name(), e);
                    let baseline = self.keyword_culture.assess(resume_text, job_text);
                    return CultureOutcome {
                        outcome: ScoreOutcome::fallback(baseline.score, e.to_string()),
                        reasoning: None,
                    };
                }
            }
        }

        let baseline = self.keyword_culture.assess(resume_text, job_text);
        debug!("Keyword culture baseline: {}", baseline.reasoning);
        CultureOutcome {
            outcome: ScoreOutcome::Computed(baseline.score),
            reasoning: None,
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(MatcherError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(feature = "model2vec")]
fn load_model2vec(config: &Config) -> Option<Arc<dyn EmbeddingProvider>> {
    use crate::processing::embeddings::Model2VecEmbedder;

    match Model2VecEmbedder::load(&config.embedding.model_path) {
        Ok(model) => Some(Arc::new(model)),
        Err(e) => {
            warn!("{}; using local embeddings", e);
            None
        }
    }
}

#[cfg(not(feature = "model2vec"))]
fn load_model2vec(_config: &Config) -> Option<Arc<dyn EmbeddingProvider>> {
    warn!("Built without the `model2vec` feature; using local embeddings");
    None
}
