//! Value objects exchanged with the engine's caller

pub mod profile;
pub mod result;

pub use profile::{CandidateProfile, EducationEntry, EducationLevel, JobPosting, MatchRequest};
pub use result::{Dimension, DimensionScores, FallbackNote, MatchResult, ScoreOutcome};
