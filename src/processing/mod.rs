//! Scoring pipeline: features, dimension scorers, bias correction, aggregation, explanation

pub mod aggregator;
pub mod bias;
pub mod embeddings;
pub mod engine;
pub mod explanation;
pub mod features;
pub mod scoring;

pub use engine::MatchEngine;
