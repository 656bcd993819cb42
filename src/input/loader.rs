//! Reads candidate profiles and job postings from JSON files

use crate::error::{MatcherError, Result};
use crate::models::{CandidateProfile, JobPosting, MatchRequest};
use log::info;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;

pub async fn load_candidate(path: &Path) -> Result<CandidateProfile> {
    info!("Loading candidate profile: {}", path.display());
    read_json(path).await
}

pub async fn load_job(path: &Path) -> Result<JobPosting> {
    info!("Loading job posting: {}", path.display());
    read_json(path).await
}

/// A `{"candidate": ..., "job": ...}` envelope; either side may be missing.
pub async fn load_request(path: &Path) -> Result<MatchRequest> {
    info!("Loading match request: {}", path.display());
    read_json(path).await
}

/// Only `.json` files are accepted.
pub fn validate_json_extension(path: &Path) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(()),
        Some(ext) => Err(MatcherError::InvalidInput(format!(
            "Unsupported file extension: .{} ({}). Expected .json",
            ext,
            path.display()
        ))),
        None => Err(MatcherError::InvalidInput(format!(
            "File has no extension: {}",
            path.display()
        ))),
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(MatcherError::InvalidInput(format!(
            "File does not exist: {}",
            path.display()
        )));
    }
    validate_json_extension(path)?;

    let content = fs::read_to_string(path).await?;
    serde_json::from_str(&content).map_err(|e| {
        MatcherError::InvalidInput(format!("Failed to parse {}: {}", path.display(), e))
    })
}
