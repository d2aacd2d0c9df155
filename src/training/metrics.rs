//! Classification report
//!
//! Per-class precision, recall, F1 and support over true/predicted label
//! sequences, with accuracy and macro/weighted averages.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Metrics for a single destination class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Occurrences of this class in the true labels
    pub support: usize,
}

/// Per-class report over a prediction run
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub total: usize,
}

impl ClassificationReport {
    /// Compute the report from parallel true/predicted label sequences.
    ///
    /// Classes are the sorted union of labels occurring in either sequence,
    /// so a held-out class the model never predicts still shows its support.
    pub fn compute(y_true: &[String], y_pred: &[String]) -> Self {
        debug_assert_eq!(y_true.len(), y_pred.len());

        let class_names: BTreeSet<&String> = y_true.iter().chain(y_pred.iter()).collect();

        let mut true_positives: HashMap<&String, usize> = HashMap::new();
        let mut predicted_counts: HashMap<&String, usize> = HashMap::new();
        let mut support_counts: HashMap<&String, usize> = HashMap::new();
        let mut correct = 0usize;

        for (truth, prediction) in y_true.iter().zip(y_pred) {
            *support_counts.entry(truth).or_default() += 1;
            *predicted_counts.entry(prediction).or_default() += 1;
            if truth == prediction {
                *true_positives.entry(truth).or_default() += 1;
                correct += 1;
            }
        }

        let classes = class_names
            .into_iter()
            .map(|label| {
                let tp = *true_positives.get(label).unwrap_or(&0);
                let predicted = *predicted_counts.get(label).unwrap_or(&0);
                let support = *support_counts.get(label).unwrap_or(&0);
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                ClassMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1: f1_score(precision, recall),
                    support,
                }
            })
            .collect();

        ClassificationReport {
            classes,
            accuracy: ratio(correct, y_true.len()),
            total: y_true.len(),
        }
    }

    /// Unweighted mean of (precision, recall, f1) over all classes
    pub fn macro_avg(&self) -> (f64, f64, f64) {
        if self.classes.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let n = self.classes.len() as f64;
        (
            self.classes.iter().map(|c| c.precision).sum::<f64>() / n,
            self.classes.iter().map(|c| c.recall).sum::<f64>() / n,
            self.classes.iter().map(|c| c.f1).sum::<f64>() / n,
        )
    }

    /// Support-weighted mean of (precision, recall, f1)
    pub fn weighted_avg(&self) -> (f64, f64, f64) {
        if self.total == 0 {
            return (0.0, 0.0, 0.0);
        }
        let total = self.total as f64;
        (
            self.classes
                .iter()
                .map(|c| c.precision * c.support as f64)
                .sum::<f64>()
                / total,
            self.classes
                .iter()
                .map(|c| c.recall * c.support as f64)
                .sum::<f64>()
                / total,
            self.classes.iter().map(|c| c.f1 * c.support as f64).sum::<f64>() / total,
        )
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .max()
            .unwrap_or(0)
            .max("weighted avg".len());

        writeln!(
            f,
            "{:>width$}  precision    recall  f1-score   support",
            "",
            width = width
        )?;
        writeln!(f)?;
        for class in &self.classes {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>8.2}  {:>8.2}  {:>8}",
                class.label,
                class.precision,
                class.recall,
                class.f1,
                class.support,
                width = width
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>8}  {:>8.2}  {:>8}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.total,
            width = width
        )?;
        let (macro_p, macro_r, macro_f1) = self.macro_avg();
        writeln!(
            f,
            "{:>width$}  {:>9.2}  {:>8.2}  {:>8.2}  {:>8}",
            "macro avg",
            macro_p,
            macro_r,
            macro_f1,
            self.total,
            width = width
        )?;
        let (weighted_p, weighted_r, weighted_f1) = self.weighted_avg();
        writeln!(
            f,
            "{:>width$}  {:>9.2}  {:>8.2}  {:>8.2}  {:>8}",
            "weighted avg",
            weighted_p,
            weighted_r,
            weighted_f1,
            self.total,
            width = width
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_perfect_predictions() {
        let y = labels(&["Gondal", "Borduria", "Gondal"]);
        let report = ClassificationReport::compute(&y, &y);

        assert_eq!(report.accuracy, 1.0);
        for class in &report.classes {
            assert_eq!(class.precision, 1.0);
            assert_eq!(class.recall, 1.0);
            assert_eq!(class.f1, 1.0);
        }
    }

    #[test]
    fn test_hand_computed_confusion() {
        // Truth:      G G B B
        // Predicted:  G B B B
        let y_true = labels(&["Gondal", "Gondal", "Borduria", "Borduria"]);
        let y_pred = labels(&["Gondal", "Borduria", "Borduria", "Borduria"]);
        let report = ClassificationReport::compute(&y_true, &y_pred);

        assert_eq!(report.accuracy, 0.75);

        let borduria = &report.classes[0];
        assert_eq!(borduria.label, "Borduria");
        assert!((borduria.precision - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(borduria.recall, 1.0);
        assert_eq!(borduria.support, 2);

        let gondal = &report.classes[1];
        assert_eq!(gondal.label, "Gondal");
        assert_eq!(gondal.precision, 1.0);
        assert_eq!(gondal.recall, 0.5);
        assert!((gondal.f1 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unpredicted_true_class_keeps_support() {
        // "Syldavia" appears in the truth but is never predicted.
        let y_true = labels(&["Gondal", "Syldavia"]);
        let y_pred = labels(&["Gondal", "Gondal"]);
        let report = ClassificationReport::compute(&y_true, &y_pred);

        let syldavia = report
            .classes
            .iter()
            .find(|c| c.label == "Syldavia")
            .unwrap();
        assert_eq!(syldavia.support, 1);
        assert_eq!(syldavia.recall, 0.0);
        assert_eq!(syldavia.precision, 0.0);
    }

    #[test]
    fn test_display_renders_all_sections() {
        let y_true = labels(&["Gondal", "Borduria"]);
        let y_pred = labels(&["Gondal", "Gondal"]);
        let report = ClassificationReport::compute(&y_true, &y_pred);
        let rendered = format!("{}", report);

        assert!(rendered.contains("precision"));
        assert!(rendered.contains("accuracy"));
        assert!(rendered.contains("macro avg"));
        assert!(rendered.contains("weighted avg"));
        assert!(rendered.contains("Borduria"));
    }
}
