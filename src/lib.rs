//! Resume matcher library
//!
//! Scores a [`CandidateProfile`] against a [`JobPosting`] across five
//! dimensions, applies a bounded fairness adjustment and explains the result.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod models;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{MatcherError, Result};
pub use llm::InferenceGateway;
pub use models::{CandidateProfile, JobPosting, MatchRequest, MatchResult};
pub use processing::MatchEngine;
