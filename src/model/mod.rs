//! Multi-class destination classifier
//!
//! A one-vs-rest ensemble over the `gbdt` crate's binary gradient-boosted
//! trees: one booster per destination class, trained with log-likelihood
//! loss, argmax of the per-class scores at predict time.

use crate::{ModelConfig, NextstayError, Result};
use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use log::debug;

/// Trained one-vs-rest gradient-boosted-tree classifier
pub struct OneVsRestGbdt {
    boosters: Vec<GBDT>,
    feature_dim: usize,
}

impl OneVsRestGbdt {
    /// Fit one booster per class.
    ///
    /// `classes` holds the class index of each feature row, in
    /// `0..n_classes`. Each booster is trained on the full matrix with
    /// labels +1 for its class and -1 otherwise.
    pub fn fit(
        params: &ModelConfig,
        features: &[Vec<f32>],
        classes: &[usize],
        n_classes: usize,
    ) -> Result<Self> {
        if features.is_empty() {
            return Err(NextstayError::EmptyDataset(
                "no feature rows to fit the classifier on".to_string(),
            ));
        }
        if features.len() != classes.len() {
            return Err(NextstayError::Parse(format!(
                "feature/label length mismatch: {} vs {}",
                features.len(),
                classes.len()
            )));
        }
        let feature_dim = features[0].len();

        let mut boosters = Vec::with_capacity(n_classes);
        for class in 0..n_classes {
            debug!("Fitting booster for class {}/{}", class + 1, n_classes);
            let mut train_data: DataVec = features
                .iter()
                .zip(classes)
                .map(|(row, &label)| {
                    let target = if label == class { 1.0 } else { -1.0 };
                    Data::new_training_data(row.clone(), 1.0, target, None)
                })
                .collect();

            let mut booster = GBDT::new(&gbdt_config(params, feature_dim));
            booster.fit(&mut train_data);
            boosters.push(booster);
        }

        Ok(OneVsRestGbdt {
            boosters,
            feature_dim,
        })
    }

    /// Predict a class index for each feature row
    pub fn predict(&self, features: &[Vec<f32>]) -> Vec<usize> {
        if features.is_empty() {
            return Vec::new();
        }
        let test_data: DataVec = features
            .iter()
            .map(|row| Data::new_test_data(row.clone(), None))
            .collect();

        let scores: Vec<Vec<f32>> = self
            .boosters
            .iter()
            .map(|booster| booster.predict(&test_data))
            .collect();

        (0..features.len())
            .map(|row| argmax(scores.iter().map(|class_scores| class_scores[row])))
            .collect()
    }

    pub fn n_classes(&self) -> usize {
        self.boosters.len()
    }

    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }
}

fn gbdt_config(params: &ModelConfig, feature_dim: usize) -> GbdtConfig {
    let mut config = GbdtConfig::new();
    config.set_feature_size(feature_dim);
    config.set_max_depth(params.max_depth);
    config.set_iterations(params.iterations);
    config.set_shrinkage(params.shrinkage);
    config.set_loss("LogLikelyhood");
    config.set_data_sample_ratio(params.data_sample_ratio);
    config.set_feature_sample_ratio(params.feature_sample_ratio);
    config
}

fn argmax(scores: impl Iterator<Item = f32>) -> usize {
    let mut best = 0;
    let mut best_score = f32::NEG_INFINITY;
    for (class, score) in scores.enumerate() {
        if score > best_score {
            best = class;
            best_score = score;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ModelConfig {
        ModelConfig {
            iterations: 10,
            max_depth: 3,
            shrinkage: 0.3,
            data_sample_ratio: 1.0,
            feature_sample_ratio: 1.0,
        }
    }

    /// Three well-separated clusters in a 2d feature space
    fn clustered_data() -> (Vec<Vec<f32>>, Vec<usize>) {
        let mut features = Vec::new();
        let mut classes = Vec::new();
        for i in 0..10 {
            let jitter = i as f32 * 0.01;
            features.push(vec![0.0 + jitter, 0.0 + jitter]);
            classes.push(0);
            features.push(vec![10.0 + jitter, 0.0 - jitter]);
            classes.push(1);
            features.push(vec![0.0 - jitter, 10.0 + jitter]);
            classes.push(2);
        }
        (features, classes)
    }

    #[test]
    fn test_fit_predict_separable_clusters() {
        let (features, classes) = clustered_data();
        let model = OneVsRestGbdt::fit(&params(), &features, &classes, 3).unwrap();

        assert_eq!(model.n_classes(), 3);
        assert_eq!(model.feature_dim(), 2);

        let predictions = model.predict(&features);
        let correct = predictions
            .iter()
            .zip(&classes)
            .filter(|(p, c)| p == c)
            .count();
        assert!(
            correct as f64 / classes.len() as f64 >= 0.9,
            "expected near-perfect fit on separable clusters, got {}/{}",
            correct,
            classes.len()
        );
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let result = OneVsRestGbdt::fit(&params(), &[], &[], 2);
        assert!(matches!(result, Err(NextstayError::EmptyDataset(_))));
    }

    #[test]
    fn test_predict_on_empty_input() {
        let (features, classes) = clustered_data();
        let model = OneVsRestGbdt::fit(&params(), &features, &classes, 3).unwrap();
        assert!(model.predict(&[]).is_empty());
    }
}
