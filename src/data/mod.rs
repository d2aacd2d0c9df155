//! Data loading and dataset assembly
//!
//! Reads raw booking CSVs and builds model-ready encoded datasets.

pub mod dataset;
pub mod loader;

pub use dataset::EncodedDataset;
pub use loader::{drop_missing_destination, load_bookings};
