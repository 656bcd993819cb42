//! Configuration management for the resume matcher

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub bias: BiasConfig,
    pub embedding: EmbeddingConfig,
    pub inference: InferenceConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub skills_weight: f32,
    pub experience_weight: f32,
    pub education_weight: f32,
    pub text_weight: f32,
    pub culture_weight: f32,
    /// Dimensions to compute; anything left out is absent from the result.
    pub enabled_dimensions: Vec<String>,
    pub required_skills: RequiredSkillSource,
}

/// Which job skills count as "required" for the skills boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredSkillSource {
    /// First half of the combined required + preferred list.
    #[default]
    CombinedPrefix,
    /// The posting's own `required_skills` list.
    Declared,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BiasConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: ProviderKind,
    /// Dimension of the local hashing embedder.
    pub dimension: usize,
    pub api_url: String,
    pub model: String,
    /// Local folder (or HF repo id) for the Model2Vec provider.
    pub model_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub culture_provider: ProviderKind,
    pub api_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Local,
    Remote,
    Model2vec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub embedding_prefix_chars: usize,
    pub culture_excerpt_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            skills_weight: 0.35,
            experience_weight: 0.25,
            education_weight: 0.15,
            text_weight: 0.15,
            culture_weight: 0.10,
            enabled_dimensions: ["skills", "experience", "education", "text", "culture"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            required_skills: RequiredSkillSource::CombinedPrefix,
        }
    }
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-matcher")
            .join("models");

        Self {
            provider: ProviderKind::Local,
            dimension: 256,
            api_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            model_path: models_dir.join("potion-base-8M"),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            culture_provider: ProviderKind::Local,
            api_url: "https://api.x.ai/v1".to_string(),
            model: "grok-beta".to_string(),
            api_key_env: "RESUME_MATCHER_API_KEY".to_string(),
            temperature: 0.3,
            timeout_ms: 30_000,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            embedding_prefix_chars: 512,
            culture_excerpt_chars: 1000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            pretty_json: true,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::from_path(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| MatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }

    /// Reject weights and limits the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        let weights = [
            ("skills_weight", s.skills_weight),
            ("experience_weight", s.experience_weight),
            ("education_weight", s.education_weight),
            ("text_weight", s.text_weight),
            ("culture_weight", s.culture_weight),
        ];

        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(MatcherError::Configuration(format!(
                    "scoring.{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        if weights.iter().map(|(_, w)| w).sum::<f32>() <= 0.0 {
            return Err(MatcherError::Configuration(
                "scoring weights must not all be zero".to_string(),
            ));
        }

        for name in &s.enabled_dimensions {
            if crate::models::Dimension::parse(name).is_none() {
                return Err(MatcherError::Configuration(format!(
                    "Unknown dimension in scoring.enabled_dimensions: {}",
                    name
                )));
            }
        }

        if self.inference.timeout_ms == 0 {
            return Err(MatcherError::Configuration(
                "inference.timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(MatcherError::Configuration(
                "embedding.dimension must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// API key for remote providers, read from the configured env var.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.inference.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Same configuration with every provider forced onto the local path.
    pub fn offline(mut self) -> Self {
        self.embedding.provider = ProviderKind::Local;
        self.inference.culture_provider = ProviderKind::Local;
        self
    }
}
