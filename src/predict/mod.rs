//! Inference over encoded datasets

pub mod inference;

pub use inference::Predictor;
