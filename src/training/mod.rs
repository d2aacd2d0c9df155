//! Classifier training and evaluation

pub mod metrics;
pub mod trainer;

pub use metrics::ClassificationReport;
pub use trainer::GbdtTrainer;
