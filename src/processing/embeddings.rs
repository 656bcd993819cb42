//! Embedding providers and vector similarity

use crate::error::{MatcherError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};
use unicode_segmentation::UnicodeSegmentation;

/// Fixed SipHash keys. Changing them changes every local embedding.
const HASH_KEY_0: u64 = 0x0123_4567_89ab_cdef;
const HASH_KEY_1: u64 = 0xfedc_ba98_7654_3210;

/// Text-to-vector capability used by the semantic text scorer.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Deterministic feature-hashing embedder. Needs no model files or network.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_token(&self, token: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
        token.hash(&mut hasher);
        hasher.finish()
    }

    /// Signed hashing of lower-cased words, L2-normalized.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text.unicode_words() {
            let token = word.to_lowercase();
            let hash = self.hash_token(&token);
            let idx = (hash % self.dimension as u64) as usize;
            // top bit picks the sign so collisions tend to cancel
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "local-hash"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible `/embeddings` endpoint.
pub struct RemoteEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl RemoteEmbedder {
    pub fn new(client: Client, api_url: &str, model: &str, api_key: String) -> Self {
        Self {
            client,
            endpoint: format!("{}/embeddings", api_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MatcherError::Embedding(format!(
                "embedding service returned {}",
                status
            )));
        }

        let body: EmbeddingResponse = response.json().await?;
        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| MatcherError::Embedding("embedding response had no data".to_string()))?;

        if embedding.is_empty() || embedding.iter().any(|x| !x.is_finite()) {
            return Err(MatcherError::Embedding(
                "embedding response contained an empty or non-finite vector".to_string(),
            ));
        }
        Ok(embedding)
    }
}

/// Static Model2Vec model, loaded once at startup and shared read-only.
#[cfg(feature = "model2vec")]
pub struct Model2VecEmbedder {
    model: std::sync::Arc<model2vec_rs::model::StaticModel>,
    model_name: String,
}

#[cfg(feature = "model2vec")]
impl Model2VecEmbedder {
    pub fn load(model_path: &std::path::Path) -> Result<Self> {
        let start_time = std::time::Instant::now();
        log::info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = model2vec_rs::model::StaticModel::from_pretrained(model_path, None, None, None)
            .map_err(|e| MatcherError::Embedding(format!("Failed to load model: {}", e)))?;

        log::info!("Model loaded successfully in {:.2?}", start_time.elapsed());

        Ok(Self {
            model: std::sync::Arc::new(model),
            model_name: model_path.display().to_string(),
        })
    }
}

#[cfg(feature = "model2vec")]
#[async_trait]
impl EmbeddingProvider for Model2VecEmbedder {
    fn name(&self) -> &str {
        &self.model_name
    }

    /// Encoding is CPU-bound and runs on the blocking pool so the gateway
    /// timeout can still fire.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let model = std::sync::Arc::clone(&self.model);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || model.encode_single(&text))
            .await
            .map_err(|e| MatcherError::Embedding(format!("Embedding task failed: {}", e)))
    }
}

/// Cosine similarity between two embeddings.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(MatcherError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}
