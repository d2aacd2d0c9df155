//! Feature engineering for booking histories
//!
//! Turns variable-length trip histories into fixed-width aggregate rows and
//! encodes categoricals for the classifier.

pub mod aggregate;
pub mod encoding;

pub use aggregate::{aggregate_users, LabeledAggregate, UserAggregate};
pub use encoding::{LabelVocabulary, OrdinalEncoder};
