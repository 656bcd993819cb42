//! Input loading
//! Candidate profiles and job postings arrive already extracted, as JSON

pub mod loader;
