//! Destination prediction with a trained classifier

use crate::data::EncodedDataset;
use crate::features::LabelVocabulary;
use crate::model::OneVsRestGbdt;

/// A trained classifier paired with the label vocabulary that decodes its
/// class indices back to destination countries
pub struct Predictor {
    model: OneVsRestGbdt,
    labels: LabelVocabulary,
}

impl Predictor {
    pub fn new(model: OneVsRestGbdt, labels: LabelVocabulary) -> Self {
        debug_assert_eq!(model.n_classes(), labels.len());
        Predictor { model, labels }
    }

    /// Predict a destination country for every row of the dataset
    pub fn predict(&self, dataset: &EncodedDataset) -> Vec<String> {
        self.model
            .predict(&dataset.features)
            .into_iter()
            .map(|class| {
                // Class indices are bounded by the vocabulary the model
                // was trained against.
                self.labels.decode(class).unwrap_or_default().to_string()
            })
            .collect()
    }

    pub fn labels(&self) -> &LabelVocabulary {
        &self.labels
    }
}
