//! Fits the destination classifier from an encoded dataset

use crate::data::EncodedDataset;
use crate::features::LabelVocabulary;
use crate::model::OneVsRestGbdt;
use crate::{ModelConfig, NextstayError, Result};
use log::info;

/// Trains a one-vs-rest gradient-boosted-tree classifier on encoded
/// training aggregates
pub struct GbdtTrainer {
    params: ModelConfig,
}

impl GbdtTrainer {
    pub fn new(params: ModelConfig) -> Self {
        GbdtTrainer { params }
    }

    /// Fit the label vocabulary and the classifier.
    ///
    /// Returns the trained model together with the vocabulary mapping its
    /// class indices back to destination countries.
    pub fn train(&self, dataset: &EncodedDataset) -> Result<(OneVsRestGbdt, LabelVocabulary)> {
        if dataset.is_empty() {
            return Err(NextstayError::EmptyDataset(
                "training aggregate is empty".to_string(),
            ));
        }

        let labels = LabelVocabulary::fit(&dataset.labels);
        let classes = dataset
            .labels
            .iter()
            .map(|label| labels.encode(label))
            .collect::<Result<Vec<usize>>>()?;

        info!(
            "Training classifier on {} users, {} destination classes",
            dataset.len(),
            labels.len()
        );
        let model = OneVsRestGbdt::fit(&self.params, &dataset.features, &classes, labels.len())?;
        Ok((model, labels))
    }
}
