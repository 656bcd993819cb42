//! External inference: embeddings, culture analysis and the gateway in front of them

pub mod culture;
pub mod gateway;
pub mod prompts;

pub use gateway::{CultureOutcome, Embedding, InferenceGateway};
